//! Core error types for diagram region processing
//!
//! Only construction-time problems are errors. Malformed image data and bad
//! boxes are handled as data: empty detection results or a list of
//! [`ValidationError`](crate::core::ValidationError)s.

use thiserror::Error;

/// Core error types for diagram region processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Invalid pixel buffer: {message}")]
    InvalidBuffer { message: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Detection error: {message}")]
    DetectionError { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unknown diagram type: {diagram_type}")]
    UnknownDiagramType { diagram_type: String },
}

impl DiagramError {
    /// Create a new invalid buffer error
    pub fn invalid_buffer(message: String) -> Self {
        Self::InvalidBuffer { message }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(message: String) -> Self {
        Self::InvalidConfig { message }
    }

    /// Create a new detection error
    pub fn detection_error(message: String) -> Self {
        Self::DetectionError { message }
    }
}
