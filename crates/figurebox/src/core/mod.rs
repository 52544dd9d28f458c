//! Core abstractions for diagram region processing
//!
//! This module holds the shared data model, configuration, error types and
//! the pure box geometry used by both detection and the interactive editor.

mod config;
mod detector;
mod error;
mod geometry;
pub mod logging;
mod types;
mod validation;

pub use config::*;
pub use detector::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use types::*;
pub use validation::*;
