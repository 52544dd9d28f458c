//! Figurebox - Find and correct diagram regions on rendered pages
//!
//! A library for locating rectangular diagram regions in a page image,
//! validating and repairing their boxes, and editing them interactively.
//!
//! # Quick Start
//!
//! ```rust
//! use figurebox::{detect_diagrams, PixelBuffer};
//!
//! let page = PixelBuffer::filled(100, 100, [255, 255, 255, 255]);
//! assert!(detect_diagrams(&page).is_empty());
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use figurebox::prelude::*;
//!
//! let image = ImageDimensions::new(100.0, 100.0).unwrap();
//!
//! // Repair a box that leaks off the page
//! let fixed = sanitize(&DiagramCoordinates::new(-5.0, -5.0, 150.0, 150.0), Some(image));
//! assert!(validate(&fixed, image).is_valid);
//!
//! // Move it with the editor
//! let editor = InteractiveEditor::new();
//! let view = EditorState::new(image);
//! let drag = editor.start_drag(Point::new(50.0, 50.0), &fixed, &view);
//! assert_eq!(drag.handle, Handle::Move);
//! ```

pub mod core;
pub mod detection;
pub mod editor;
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        batch_validate, merge, overlap_percentage, sanitize, transform, validate,
        validate_for_diagram_type, DetectionConfig, Detector, DiagramCoordinates, DiagramError,
        DiagramType, EditorConfig, ImageDimensions, PixelBuffer, Point, Transform,
        ValidationOptions, ValidationResult,
    };
    pub use crate::detection::{DetectionOrchestrator, LocalDiagramDetector};
    pub use crate::editor::{CursorStyle, DragState, EditorState, Handle, InteractiveEditor};
}

/// Detect diagram boxes on a page with the default settings
///
/// This is the simplest way to run the local detector. Malformed buffers
/// yield an empty list rather than an error.
///
/// # Example
/// ```rust
/// use figurebox::{detect_diagrams, PixelBuffer};
///
/// let page = PixelBuffer::filled(64, 64, [0, 0, 0, 255]);
/// assert!(detect_diagrams(&page).is_empty());
/// ```
pub fn detect_diagrams(buffer: &PixelBuffer) -> Vec<DiagramCoordinates> {
    detection::LocalDiagramDetector::new().detect_diagrams(buffer)
}

/// Detect diagram boxes from raw RGBA bytes
///
/// Returns an empty list, with a warning logged, if `rgba` does not hold
/// exactly `width * height * 4` bytes.
pub fn detect_diagrams_raw(width: usize, height: usize, rgba: &[u8]) -> Vec<DiagramCoordinates> {
    match PixelBuffer::new(width, height, rgba.to_vec()) {
        Ok(buffer) => detect_diagrams(&buffer),
        Err(err) => {
            tracing::warn!(error = %err, "Rejected pixel buffer");
            Vec::new()
        }
    }
}
