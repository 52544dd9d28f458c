//! Local diagram detector
//!
//! Runs the whole fallback pipeline on one page:
//! edges, regions, filter/classify, merge, then sanitize/validate.

use tracing::{debug, info, span, trace, warn, Level};

use super::classifier::RegionClassifier;
use super::edges::detect_edges;
use super::regions::extract_regions;
use crate::core::{
    merge_overlapping, sanitize_with_min_size, validate_with_options, DetectionConfig, Detector,
    DiagramCoordinates, DiagramError, PixelBuffer, ValidationOptions,
};

/// Edge-based detector that needs nothing but the pixels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalDiagramDetector {
    classifier: RegionClassifier,
}

impl LocalDiagramDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with custom settings, rejecting impossible ones
    pub fn with_config(config: DetectionConfig) -> Result<Self, DiagramError> {
        config.validate()?;
        Ok(Self {
            classifier: RegionClassifier::with_config(config),
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        self.classifier.config()
    }

    /// Detect diagram boxes; malformed buffers give an empty list
    pub fn detect_diagrams(&self, buffer: &PixelBuffer) -> Vec<DiagramCoordinates> {
        let detect_span = span!(
            Level::INFO,
            "detect_diagrams",
            width = buffer.width,
            height = buffer.height
        );
        let _enter = detect_span.enter();

        let Some(image) = buffer.dimensions().filter(|_| buffer.is_well_formed()) else {
            warn!(
                width = buffer.width,
                height = buffer.height,
                bytes = buffer.data.len(),
                "Unusable pixel buffer, no diagrams detected"
            );
            return Vec::new();
        };

        let config = self.config();

        let mask = detect_edges(buffer, config.edge_threshold);
        let regions = extract_regions(&mask, config.min_region_area);
        debug!(regions = regions.len(), "Candidate regions");

        let candidates = self.classifier.filter_and_classify(&regions, image);
        // A thick outline yields an inner and an outer edge ring.
        let candidates = merge_overlapping(&candidates, config.merge_overlap_threshold);
        debug!(candidates = candidates.len(), "Candidates after merging");

        let options = ValidationOptions {
            min_size: config.min_box_size,
            ..ValidationOptions::default()
        };
        let diagrams: Vec<DiagramCoordinates> = candidates
            .iter()
            .map(|c| sanitize_with_min_size(c, Some(image), config.min_box_size))
            .filter(|c| {
                let result = validate_with_options(c, image, &options);
                if !result.is_valid {
                    trace!(errors = ?result.errors, "Dropping invalid candidate");
                }
                result.is_valid
            })
            .take(config.max_diagrams)
            .collect();

        info!(count = diagrams.len(), "Diagram detection completed");
        diagrams
    }
}

impl Detector for LocalDiagramDetector {
    fn detect(&self, buffer: &PixelBuffer) -> Result<Vec<DiagramCoordinates>, DiagramError> {
        Ok(self.detect_diagrams(buffer))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
