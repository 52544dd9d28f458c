//! Tunable settings for detection, validation and editing
//!
//! Every heuristic constant lives here so callers and tests can reach the
//! boundaries directly. All structs deserialize with `#[serde(default)]`,
//! so a host only needs to send the fields it wants to change.

use serde::{Deserialize, Serialize};

use super::error::DiagramError;

/// Default minimum side length of a box, in pixels
pub const DEFAULT_MIN_SIZE: f64 = 10.0;

/// Settings for the local (edge based) diagram detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Sobel magnitude above which a pixel counts as an edge
    pub edge_threshold: f64,
    /// Smallest connected component kept, in edge pixels
    pub min_region_area: usize,

    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    /// Bounding box area over image area
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Smallest region side, in pixels
    pub min_region_size: f64,
    /// Largest region side as a fraction of the image side
    pub max_dimension_ratio: f64,

    /// Aspect ratio above which a region is a table
    pub table_aspect_ratio: f64,
    /// Aspect ratio below which a region is a flowchart
    pub flowchart_aspect_ratio: f64,
    /// Inclusive aspect ratio band classified as a graph
    pub graph_aspect_range: (f64, f64),

    pub base_confidence: f64,
    pub aspect_bonus: f64,
    pub aspect_bonus_range: (f64, f64),
    pub area_bonus: f64,
    pub area_bonus_range: (f64, f64),
    pub density_bonus: f64,
    pub min_density: f64,
    /// Multiplier applied to every confidence; the local path is trusted less
    /// than a cloud model
    pub confidence_multiplier: f64,

    /// Padding added around each emitted box
    pub padding: f64,
    /// Overlap percentage above which two candidates merge into one box
    pub merge_overlap_threshold: f64,
    /// Maximum number of boxes returned per image
    pub max_diagrams: usize,
    /// Minimum side length enforced when sanitizing emitted boxes
    pub min_box_size: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 50.0,
            min_region_area: 400,
            min_aspect_ratio: 0.2,
            max_aspect_ratio: 5.0,
            min_area_ratio: 0.01,
            max_area_ratio: 0.8,
            min_region_size: 50.0,
            max_dimension_ratio: 0.9,
            table_aspect_ratio: 2.0,
            flowchart_aspect_ratio: 0.5,
            graph_aspect_range: (1.2, 1.8),
            base_confidence: 0.3,
            aspect_bonus: 0.2,
            aspect_bonus_range: (0.5, 2.0),
            area_bonus: 0.2,
            area_bonus_range: (0.05, 0.4),
            density_bonus: 0.1,
            min_density: 0.1,
            confidence_multiplier: 0.6,
            padding: 10.0,
            merge_overlap_threshold: 30.0,
            max_diagrams: 10,
            min_box_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl DetectionConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never accept a region
    pub fn validate(&self) -> Result<(), DiagramError> {
        let finite = [
            self.edge_threshold,
            self.min_aspect_ratio,
            self.max_aspect_ratio,
            self.min_area_ratio,
            self.max_area_ratio,
            self.min_region_size,
            self.max_dimension_ratio,
            self.confidence_multiplier,
            self.padding,
            self.merge_overlap_threshold,
            self.min_box_size,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(DiagramError::invalid_config(
                "detection settings must be finite numbers".to_string(),
            ));
        }
        check_range("aspect ratio", self.min_aspect_ratio, self.max_aspect_ratio)?;
        check_range("area ratio", self.min_area_ratio, self.max_area_ratio)?;
        check_range(
            "graph aspect range",
            self.graph_aspect_range.0,
            self.graph_aspect_range.1,
        )?;
        if self.min_aspect_ratio <= 0.0 {
            return Err(DiagramError::invalid_config(format!(
                "min_aspect_ratio must be positive, got {}",
                self.min_aspect_ratio
            )));
        }
        if self.confidence_multiplier < 0.0 || self.padding < 0.0 || self.min_box_size < 0.0 {
            return Err(DiagramError::invalid_config(
                "confidence_multiplier, padding and min_box_size must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for single and batch validation of boxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Minimum width and height of a box
    pub min_size: f64,
    /// Skip the pairwise overlap check in batch validation
    pub allow_overlap: bool,
    /// Overlap percentage above which two boxes conflict
    pub overlap_threshold: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            allow_overlap: false,
            overlap_threshold: 10.0,
        }
    }
}

impl ValidationOptions {
    pub fn validate(&self) -> Result<(), DiagramError> {
        if !(self.min_size.is_finite() && self.min_size >= 0.0) {
            return Err(DiagramError::invalid_config(format!(
                "min_size must not be negative, got {}",
                self.min_size
            )));
        }
        if !(self.overlap_threshold.is_finite() && (0.0..=100.0).contains(&self.overlap_threshold))
        {
            return Err(DiagramError::invalid_config(format!(
                "overlap_threshold must be a percentage between 0 and 100, got {}",
                self.overlap_threshold
            )));
        }
        Ok(())
    }
}

/// Settings for the interactive box editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Side of the square corner handles, in canvas pixels
    pub handle_size: f64,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    /// Minimum width and height kept while resizing, in image pixels
    pub min_size: f64,
    /// Keep the drag-start aspect ratio while resizing
    pub lock_aspect_ratio: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            snap_to_grid: false,
            grid_size: 10.0,
            min_size: DEFAULT_MIN_SIZE,
            lock_aspect_ratio: false,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<(), DiagramError> {
        if !(self.handle_size.is_finite() && self.handle_size > 0.0) {
            return Err(DiagramError::invalid_config(format!(
                "handle_size must be positive, got {}",
                self.handle_size
            )));
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(DiagramError::invalid_config(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !(self.min_size.is_finite() && self.min_size >= 0.0) {
            return Err(DiagramError::invalid_config(format!(
                "min_size must not be negative, got {}",
                self.min_size
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), DiagramError> {
    if min > max {
        return Err(DiagramError::invalid_config(format!(
            "{name}: minimum {min} is greater than maximum {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_defaults_are_valid() {
        assert!(DetectionConfig::default().validate().is_ok());
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DetectionConfig::from_json(r#"{"edge_threshold": 80.0}"#).unwrap();
        assert_eq!(config.edge_threshold, 80.0);
        assert_eq!(config.min_region_area, 400);
        assert_eq!(config.confidence_multiplier, 0.6);
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let config = DetectionConfig {
            min_aspect_ratio: 3.0,
            max_aspect_ratio: 1.0,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DetectionConfig {
            min_area_ratio: 0.9,
            ..DetectionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_options_reject_non_finite() {
        assert!(ValidationOptions::default().validate().is_ok());
        for options in [
            ValidationOptions {
                overlap_threshold: f64::NAN,
                ..ValidationOptions::default()
            },
            ValidationOptions {
                overlap_threshold: 150.0,
                ..ValidationOptions::default()
            },
            ValidationOptions {
                min_size: f64::NAN,
                ..ValidationOptions::default()
            },
            ValidationOptions {
                min_size: -1.0,
                ..ValidationOptions::default()
            },
        ] {
            assert!(options.validate().is_err(), "{options:?} should be rejected");
        }
    }

    #[test]
    fn test_editor_rejects_zero_grid() {
        let config = EditorConfig {
            grid_size: 0.0,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
