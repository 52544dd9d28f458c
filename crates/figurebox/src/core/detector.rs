//! Core detector trait for locating diagrams in page images
//!
//! The built-in [`LocalDiagramDetector`](crate::detection::LocalDiagramDetector)
//! implements it, and so can a caller's own detector (for example one backed
//! by a cloud vision service) so both can be chained in a
//! [`DetectionOrchestrator`](crate::detection::DetectionOrchestrator).

use super::error::DiagramError;
use super::types::{DiagramCoordinates, PixelBuffer};

/// Core trait for diagram region detectors
///
/// # Example
/// ```
/// use figurebox::core::{Detector, PixelBuffer};
/// use figurebox::detection::LocalDiagramDetector;
///
/// let detector = LocalDiagramDetector::new();
/// let page = PixelBuffer::filled(100, 100, [255, 255, 255, 255]);
/// assert!(detector.detect(&page).unwrap().is_empty());
/// ```
pub trait Detector: Send + Sync {
    /// Locate diagram boxes in `buffer`, in image pixel coordinates
    ///
    /// `Err` means the detector could not run (service down, bad response);
    /// an image without diagrams is `Ok` with an empty list.
    fn detect(&self, buffer: &PixelBuffer) -> Result<Vec<DiagramCoordinates>, DiagramError>;

    /// Short name used in logs and detection outcomes
    fn name(&self) -> &'static str;
}
