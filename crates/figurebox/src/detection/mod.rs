//! Local diagram detection from raw page pixels
//!
//! The pipeline is split into small stages so each can be tuned and tested
//! on its own: [`edges`] builds a Sobel edge mask, [`regions`] groups it into
//! connected components, [`classifier`] filters and scores them, and
//! [`detector`] ties the stages together behind the [`Detector`] trait.
//! [`orchestrator`] chains several detectors with fallback.
//!
//! [`Detector`]: crate::core::Detector

pub mod classifier;
pub mod detector;
pub mod edges;
pub mod orchestrator;
pub mod regions;

pub use classifier::{filter_and_classify, RegionClassifier};
pub use detector::LocalDiagramDetector;
pub use edges::{detect_edges, EdgeDetector, EdgeMask};
pub use orchestrator::{DetectionOrchestrator, DetectionOutcome};
pub use regions::{extract_regions, RegionExtractor};
