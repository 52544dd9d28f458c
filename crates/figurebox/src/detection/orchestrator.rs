//! Detection orchestrator for chaining detectors with fallback
//!
//! Detectors run in registration order. The first one that returns at least
//! one usable box wins; errors and empty results fall through to the next.
//! Whatever a detector returns is sanitized and validated before it leaves
//! the orchestrator, so hosts never see out-of-bounds boxes.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, trace, warn, Level};

use super::detector::LocalDiagramDetector;
use crate::core::{
    sanitize_with_min_size, validate_with_options, Detector, DiagramCoordinates, PixelBuffer,
    ValidationOptions,
};

/// Result of one orchestrated detection run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Name of the detector that produced the boxes, if any did
    pub source: Option<String>,
    pub diagrams: Vec<DiagramCoordinates>,
}

impl DetectionOutcome {
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }
}

/// Runs registered detectors in order until one finds diagrams
pub struct DetectionOrchestrator {
    detectors: Vec<(String, Box<dyn Detector>)>,
    options: ValidationOptions,
}

impl Default for DetectionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionOrchestrator {
    /// Create an orchestrator with no detectors
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            options: ValidationOptions::default(),
        }
    }

    /// Create an orchestrator with only the local edge-based detector
    pub fn with_local_fallback() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register_detector("local".to_string(), Box::new(LocalDiagramDetector::new()));
        orchestrator
    }

    /// Replace the options used to screen detector output
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Register a detector; re-registering a name replaces it in place
    pub fn register_detector(&mut self, name: String, detector: Box<dyn Detector>) {
        if let Some(slot) = self.detectors.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = detector;
        } else {
            self.detectors.push((name, detector));
        }
    }

    /// Detector names in the order they are tried
    pub fn get_detectors(&self) -> Vec<String> {
        self.detectors.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Run detectors in order and return the first non-empty, screened result
    pub fn detect(&self, buffer: &PixelBuffer) -> DetectionOutcome {
        let detect_span = span!(
            Level::INFO,
            "orchestrate_detection",
            detectors = self.detectors.len()
        );
        let _enter = detect_span.enter();

        let Some(image) = buffer.dimensions() else {
            warn!(
                width = buffer.width,
                height = buffer.height,
                "Image has no area, skipping detection"
            );
            return DetectionOutcome::default();
        };

        for (name, detector) in &self.detectors {
            trace!(detector = %name, "Trying detector");
            let raw = match detector.detect(buffer) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(detector = %name, error = %err, "Detector failed, falling back");
                    continue;
                }
            };

            let diagrams: Vec<DiagramCoordinates> = raw
                .iter()
                .map(|c| sanitize_with_min_size(c, Some(image), self.options.min_size))
                .filter(|c| validate_with_options(c, image, &self.options).is_valid)
                .collect();
            debug!(
                detector = %name,
                raw = raw.len(),
                kept = diagrams.len(),
                "Detector output screened"
            );

            if !diagrams.is_empty() {
                info!(detector = %name, count = diagrams.len(), "Diagrams detected");
                return DetectionOutcome {
                    source: Some(name.clone()),
                    diagrams,
                };
            }
        }

        info!("No detector found any diagrams");
        DetectionOutcome::default()
    }
}
