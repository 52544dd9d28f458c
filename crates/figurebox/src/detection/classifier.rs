//! Region filtering, coarse typing and confidence scoring
//!
//! The heuristics only look at box geometry. They are deliberately rough:
//! this path is a fallback for when a vision model is unavailable.

use tracing::{debug, span, trace, Level};

use crate::core::{DetectionConfig, DiagramCoordinates, DiagramType, ImageDimensions, Region};

/// Turns raw regions into candidate diagram boxes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionClassifier {
    config: DetectionConfig,
}

impl RegionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// True if the region passes every size and shape filter
    pub fn accepts(&self, region: &Region, image: ImageDimensions) -> bool {
        let c = &self.config;
        let (w, h) = (region.width as f64, region.height as f64);
        let aspect = region.aspect_ratio();
        let area_ratio = region.bbox_area() as f64 / image.area();

        in_range(aspect, (c.min_aspect_ratio, c.max_aspect_ratio))
            && in_range(area_ratio, (c.min_area_ratio, c.max_area_ratio))
            && w >= c.min_region_size
            && h >= c.min_region_size
            && w <= image.width * c.max_dimension_ratio
            && h <= image.height * c.max_dimension_ratio
    }

    /// Coarse type from the aspect ratio alone
    pub fn classify(&self, region: &Region) -> DiagramType {
        let c = &self.config;
        let aspect = region.aspect_ratio();
        if aspect > c.table_aspect_ratio {
            DiagramType::Table
        } else if aspect < c.flowchart_aspect_ratio {
            DiagramType::Flowchart
        } else if in_range(aspect, c.graph_aspect_range) {
            DiagramType::Graph
        } else {
            DiagramType::Other
        }
    }

    /// Heuristic confidence in `[0, 1]`, already dampened
    pub fn confidence(&self, region: &Region, image: ImageDimensions) -> f64 {
        let c = &self.config;
        let aspect = region.aspect_ratio();
        let area_ratio = region.bbox_area() as f64 / image.area();

        let mut score = c.base_confidence;
        if in_range(aspect, c.aspect_bonus_range) {
            score += c.aspect_bonus;
        }
        if in_range(area_ratio, c.area_bonus_range) {
            score += c.area_bonus;
        }
        if region.density() >= c.min_density {
            score += c.density_bonus;
        }

        (score * c.confidence_multiplier).clamp(0.0, 1.0)
    }

    /// Filter regions, then emit a padded, typed and scored box for each survivor
    ///
    /// Output keeps the input order.
    pub fn filter_and_classify(
        &self,
        regions: &[Region],
        image: ImageDimensions,
    ) -> Vec<DiagramCoordinates> {
        let classify_span = span!(Level::DEBUG, "filter_and_classify", candidates = regions.len());
        let _enter = classify_span.enter();

        let pad = self.config.padding;
        let out: Vec<DiagramCoordinates> = regions
            .iter()
            .filter(|region| {
                let keep = self.accepts(region, image);
                trace!(?region, keep, "Region filtered");
                keep
            })
            .map(|region| {
                let diagram_type = self.classify(region);
                let confidence = self.confidence(region, image);
                DiagramCoordinates {
                    x1: (region.x as f64 - pad).max(0.0),
                    y1: (region.y as f64 - pad).max(0.0),
                    x2: ((region.x + region.width) as f64 + pad).min(image.width),
                    y2: ((region.y + region.height) as f64 + pad).min(image.height),
                    confidence,
                    diagram_type,
                    description: format!(
                        "Detected {} region ({}x{} px)",
                        diagram_type, region.width, region.height
                    ),
                }
            })
            .collect();

        debug!(accepted = out.len(), "Regions classified");
        out
    }
}

/// Filter and classify with the default configuration
pub fn filter_and_classify(regions: &[Region], image: ImageDimensions) -> Vec<DiagramCoordinates> {
    RegionClassifier::new().filter_and_classify(regions, image)
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}
