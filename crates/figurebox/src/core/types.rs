//! Core type definitions for diagram region processing
//!
//! This module contains the fundamental types used throughout Figurebox:
//! pixel buffers, image dimensions, extracted regions, diagram types and the
//! bounding-box record shared by detection, validation and editing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DiagramError;

/// Bytes per pixel in a [`PixelBuffer`] (RGBA)
pub const BYTES_PER_PIXEL: usize = 4;

/// Decoded page image as a flat RGBA byte sequence
///
/// The engine only reads from the buffer and never keeps it past a call.
/// Fields are public so callers can wrap data they already own; use
/// [`PixelBuffer::new`] to get a length check up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, checking that `data` holds exactly `width * height` RGBA pixels
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DiagramError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| {
                DiagramError::invalid_buffer(format!("{width}x{height} overflows the address space"))
            })?;

        if expected != data.len() {
            return Err(DiagramError::invalid_buffer(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer filled with a single RGBA color
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width * height * BYTES_PER_PIXEL)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// True when the dimensions are non-zero and the byte count matches them
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self
                .width
                .checked_mul(self.height)
                .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
                == Some(self.data.len())
    }

    /// Get the RGBA value at `(x, y)`, if in range
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * BYTES_PER_PIXEL;
        let px = self.data.get(i..i + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Set the RGBA value at `(x, y)`; out-of-range writes are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * BYTES_PER_PIXEL;
        if let Some(px) = self.data.get_mut(i..i + BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Image dimensions of this buffer, if both sides are non-zero
    pub fn dimensions(&self) -> Option<ImageDimensions> {
        ImageDimensions::new(self.width as f64, self.height as f64).ok()
    }
}

/// Width and height of an image in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: f64,
    pub height: f64,
}

impl ImageDimensions {
    /// Create dimensions; both sides must be finite and greater than zero
    pub fn new(width: f64, height: f64) -> Result<Self, DiagramError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(DiagramError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Total area in square pixels
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when both sides are finite and positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A point in either canvas or image space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A connected group of edge pixels reduced to its bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Number of edge pixels in the component
    pub area: usize,
}

impl Region {
    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    /// Area of the bounding box (not the pixel count)
    pub fn bbox_area(&self) -> usize {
        self.width * self.height
    }

    /// Fraction of the bounding box covered by edge pixels
    pub fn density(&self) -> f64 {
        let bbox = self.bbox_area();
        if bbox == 0 {
            0.0
        } else {
            self.area as f64 / bbox as f64
        }
    }
}

/// Coarse kind of diagram held by a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    /// Plots and charts with axes
    Graph,
    /// Boxes connected by arrows
    Flowchart,
    /// Apparatus and experiment sketches
    Scientific,
    /// Shapes, angles and constructions
    Geometric,
    /// Tabular data
    Table,
    /// Electrical schematics
    Circuit,
    /// Maps and spatial layouts
    Map,
    #[default]
    Other,
}

impl DiagramType {
    /// All diagram types in declaration order
    pub const ALL: [DiagramType; 8] = [
        DiagramType::Graph,
        DiagramType::Flowchart,
        DiagramType::Scientific,
        DiagramType::Geometric,
        DiagramType::Table,
        DiagramType::Circuit,
        DiagramType::Map,
        DiagramType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Graph => "graph",
            DiagramType::Flowchart => "flowchart",
            DiagramType::Scientific => "scientific",
            DiagramType::Geometric => "geometric",
            DiagramType::Table => "table",
            DiagramType::Circuit => "circuit",
            DiagramType::Map => "map",
            DiagramType::Other => "other",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        DiagramType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| DiagramError::UnknownDiagramType {
                diagram_type: s.to_string(),
            })
    }
}

/// Bounding box of a diagram in image pixel space
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right one.
/// A well-formed box has `x2 > x1`, `y2 > y1`, lies inside the image and has
/// a confidence in `[0, 1]`; see [`crate::core::validate`] and
/// [`crate::core::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramCoordinates {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(rename = "type", default)]
    pub diagram_type: DiagramType,
    #[serde(default)]
    pub description: String,
}

impl DiagramCoordinates {
    /// Create a box of type [`DiagramType::Other`] with full confidence
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence: 1.0,
            diagram_type: DiagramType::Other,
            description: String::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_type(mut self, diagram_type: DiagramType) -> Self {
        self.diagram_type = diagram_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Area of the box, zero when inverted
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Width divided by height, or `None` for a box with no height
    pub fn aspect_ratio(&self) -> Option<f64> {
        let h = self.height();
        (h > 0.0).then(|| self.width() / h)
    }

    /// True if the point lies inside the box (edges included)
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// True if `other` lies entirely inside this box
    pub fn contains(&self, other: &DiagramCoordinates) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }

    /// True if all four corners and the confidence are finite numbers
    pub fn is_finite(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2, self.confidence]
            .iter()
            .all(|v| v.is_finite())
    }
}
