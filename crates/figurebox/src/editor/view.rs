//! Per-frame view transform between canvas and image space

use serde::{Deserialize, Serialize};

use crate::core::{transform, DiagramCoordinates, ImageDimensions, Point, Transform};

/// View context the host supplies with every pointer event
///
/// Canvas space is what the pointer reports; image space is where boxes
/// live. `canvas = image * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub zoom_level: f64,
    pub pan_offset: Point,
    pub canvas_size: ImageDimensions,
    pub image_size: ImageDimensions,
}

impl EditorState {
    /// Unzoomed, unpanned view with the canvas the same size as the image
    pub fn new(image_size: ImageDimensions) -> Self {
        Self {
            zoom_level: 1.0,
            pan_offset: Point::default(),
            canvas_size: image_size,
            image_size,
        }
    }

    pub fn with_zoom(mut self, zoom_level: f64) -> Self {
        self.zoom_level = zoom_level;
        self
    }

    pub fn with_pan(mut self, pan_offset: Point) -> Self {
        self.pan_offset = pan_offset;
        self
    }

    /// Zoom used for conversions; non-finite or non-positive zoom counts as 1
    pub fn effective_zoom(&self) -> f64 {
        if self.zoom_level.is_finite() && self.zoom_level > 0.0 {
            self.zoom_level
        } else {
            1.0
        }
    }

    /// Image to canvas mapping
    pub fn to_canvas_transform(&self) -> Transform {
        let zoom = self.effective_zoom();
        Transform {
            scale_x: zoom,
            scale_y: zoom,
            offset_x: self.pan_offset.x,
            offset_y: self.pan_offset.y,
        }
    }

    pub fn canvas_to_image(&self, p: Point) -> Point {
        let zoom = self.effective_zoom();
        Point::new(
            (p.x - self.pan_offset.x) / zoom,
            (p.y - self.pan_offset.y) / zoom,
        )
    }

    pub fn image_to_canvas(&self, p: Point) -> Point {
        self.to_canvas_transform().apply(p)
    }

    /// A box in canvas space, for hit testing and drawing
    pub fn coords_to_canvas(&self, coords: &DiagramCoordinates) -> DiagramCoordinates {
        transform(coords, &self.to_canvas_transform())
    }
}
