//! Sobel edge detection on RGBA page images
//!
//! Luma is the plain mean of R, G and B. The one-pixel image border is never
//! marked, so a 3x3 kernel always has a full neighbourhood.

use tracing::{debug, span, trace, warn, Level};

use crate::core::{PixelBuffer, BYTES_PER_PIXEL};

/// Boolean edge map, row-major, `width * height` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl EdgeMask {
    /// All-false mask of the given size
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width.saturating_mul(height)],
        }
    }

    /// Build a mask from rows of booleans; ragged rows are padded with `false`
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut mask = Self::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                mask.set(x, y, v);
            }
        }
        mask
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`; out of range reads as `false`
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Number of edge cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Row-major cells
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Copy out as `rows[y][x]`
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells.chunks(self.width).map(<[bool]>::to_vec).collect()
    }
}

/// Gradient-magnitude edge detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    threshold: f64,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    pub const DEFAULT_THRESHOLD: f64 = 50.0;

    pub fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Detect edges with this detector's threshold
    pub fn detect(&self, buffer: &PixelBuffer) -> EdgeMask {
        detect_edges(buffer, self.threshold)
    }
}

/// Largest all-false mask handed back for a malformed buffer (4096 x 4096)
const MAX_FALLBACK_CELLS: usize = 1 << 24;

/// Mark pixels whose Sobel gradient magnitude exceeds `threshold`
///
/// Never panics: a malformed or empty buffer yields an all-false mask of
/// `width x height`. Claimed sizes above 4096 x 4096 cells, or ones that
/// overflow, give a 0 x 0 mask instead.
pub fn detect_edges(buffer: &PixelBuffer, threshold: f64) -> EdgeMask {
    let edge_span = span!(
        Level::DEBUG,
        "detect_edges",
        width = buffer.width,
        height = buffer.height
    );
    let _enter = edge_span.enter();

    if !buffer.is_well_formed() {
        warn!(
            width = buffer.width,
            height = buffer.height,
            bytes = buffer.data.len(),
            "Malformed pixel buffer, returning empty edge mask"
        );
        return match buffer.width.checked_mul(buffer.height) {
            Some(n) if n <= buffer.data.len().max(MAX_FALLBACK_CELLS) => {
                EdgeMask::empty(buffer.width, buffer.height)
            }
            _ => EdgeMask::empty(0, 0),
        };
    }

    let (w, h) = (buffer.width, buffer.height);
    let mut mask = EdgeMask::empty(w, h);
    if w < 3 || h < 3 {
        trace!("Image too small for a 3x3 kernel");
        return mask;
    }

    let luma: Vec<f64> = buffer
        .data
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|px| (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0)
        .collect();

    for y in 1..h - 1 {
        let up = (y - 1) * w;
        let mid = y * w;
        let down = (y + 1) * w;
        for x in 1..w - 1 {
            let (l, r) = (x - 1, x + 1);

            // [-1 0 1; -2 0 2; -1 0 1]
            let gx = (luma[up + r] + 2.0 * luma[mid + r] + luma[down + r])
                - (luma[up + l] + 2.0 * luma[mid + l] + luma[down + l]);
            // [-1 -2 -1; 0 0 0; 1 2 1]
            let gy = (luma[down + l] + 2.0 * luma[down + x] + luma[down + r])
                - (luma[up + l] + 2.0 * luma[up + x] + luma[up + r]);

            if (gx * gx + gy * gy).sqrt() > threshold {
                mask.cells[mid + x] = true;
            }
        }
    }

    debug!(edge_pixels = mask.count(), "Edges detected");
    mask
}
