//! Rule-based validation of diagram boxes
//!
//! Validation never fails fast: every violated rule is reported so a UI can
//! show all problems at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use super::config::ValidationOptions;
use super::geometry::overlap_percentage;
use super::types::{DiagramCoordinates, DiagramType, ImageDimensions};

/// How many aggregated rules [`batch_validate`] reports
const COMMON_ERROR_LIMIT: usize = 5;

/// A single validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// A corner or the confidence is NaN or infinite
    NonFinite,
    /// `x2 <= x1`
    InvertedX,
    /// `y2 <= y1`
    InvertedY,
    /// The box leaves the image
    OutOfBounds,
    /// Width or height below the minimum
    TooSmall,
    /// Confidence outside `[0, 1]`
    ConfidenceRange,
    /// Aspect ratio outside the range allowed for the diagram type
    AspectRatio,
    /// Confidence below the minimum for the diagram type
    LowConfidence,
    /// Overlaps another box in the same batch
    Overlap,
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationRule::NonFinite => "coordinates must be finite numbers",
            ValidationRule::InvertedX => "x2 must be greater than x1",
            ValidationRule::InvertedY => "y2 must be greater than y1",
            ValidationRule::OutOfBounds => "coordinates must lie within the image",
            ValidationRule::TooSmall => "diagram is smaller than the minimum size",
            ValidationRule::ConfidenceRange => "confidence must be between 0 and 1",
            ValidationRule::AspectRatio => "aspect ratio is unusual for the diagram type",
            ValidationRule::LowConfidence => "confidence is too low for the diagram type",
            ValidationRule::Overlap => "diagram overlaps another diagram",
        };
        f.write_str(text)
    }
}

/// One violated rule with a message naming the offending values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub rule: ValidationRule,
    pub message: String,
}

impl ValidationError {
    pub fn new(rule: ValidationRule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of validating one box
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn has_rule(&self, rule: ValidationRule) -> bool {
        self.errors.iter().any(|e| e.rule == rule)
    }

    fn remove_rule(&mut self, rule: ValidationRule) {
        self.errors.retain(|e| e.rule != rule);
        self.is_valid = self.errors.is_empty();
    }

    fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.is_valid = false;
    }
}

/// Per-type limits used by [`validate_for_diagram_type`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeConstraints {
    /// Minimum (width, height)
    pub min_size: (f64, f64),
    /// Inclusive (min, max) width / height
    pub aspect_ratio_range: (f64, f64),
    pub min_confidence: f64,
}

impl DiagramType {
    /// Geometric limits a box of this type is expected to meet
    pub fn constraints(&self) -> TypeConstraints {
        let (min_size, aspect_ratio_range, min_confidence) = match self {
            DiagramType::Graph => ((50.0, 50.0), (0.5, 3.0), 0.3),
            DiagramType::Flowchart => ((80.0, 80.0), (0.3, 3.0), 0.3),
            DiagramType::Scientific => ((50.0, 50.0), (0.2, 5.0), 0.3),
            DiagramType::Geometric => ((40.0, 40.0), (0.3, 3.0), 0.3),
            DiagramType::Table => ((100.0, 50.0), (0.5, 10.0), 0.4),
            DiagramType::Circuit => ((60.0, 60.0), (0.3, 4.0), 0.3),
            DiagramType::Map => ((100.0, 100.0), (0.5, 2.0), 0.3),
            DiagramType::Other => ((30.0, 30.0), (0.1, 10.0), 0.2),
        };
        TypeConstraints {
            min_size,
            aspect_ratio_range,
            min_confidence,
        }
    }
}

/// Validate a box with the default options
pub fn validate(coords: &DiagramCoordinates, image: ImageDimensions) -> ValidationResult {
    validate_with_options(coords, image, &ValidationOptions::default())
}

/// Check a box against every geometric rule and report all violations
pub fn validate_with_options(
    coords: &DiagramCoordinates,
    image: ImageDimensions,
    options: &ValidationOptions,
) -> ValidationResult {
    let mut errors = Vec::new();

    if !coords.is_finite() {
        errors.push(ValidationError::new(
            ValidationRule::NonFinite,
            format!(
                "coordinates must be finite numbers (x1={}, y1={}, x2={}, y2={}, confidence={})",
                coords.x1, coords.y1, coords.x2, coords.y2, coords.confidence
            ),
        ));
        // Every later comparison would be meaningless.
        return ValidationResult::from_errors(errors);
    }

    if coords.x2 <= coords.x1 {
        errors.push(ValidationError::new(
            ValidationRule::InvertedX,
            format!("x2 ({}) must be greater than x1 ({})", coords.x2, coords.x1),
        ));
    }
    if coords.y2 <= coords.y1 {
        errors.push(ValidationError::new(
            ValidationRule::InvertedY,
            format!("y2 ({}) must be greater than y1 ({})", coords.y2, coords.y1),
        ));
    }

    if coords.x1 < 0.0 || coords.y1 < 0.0 || coords.x2 > image.width || coords.y2 > image.height {
        errors.push(ValidationError::new(
            ValidationRule::OutOfBounds,
            format!(
                "box ({}, {})-({}, {}) extends outside the {}x{} image",
                coords.x1, coords.y1, coords.x2, coords.y2, image.width, image.height
            ),
        ));
    }

    let (w, h) = (coords.width(), coords.height());
    if w > 0.0 && h > 0.0 && (w < options.min_size || h < options.min_size) {
        errors.push(ValidationError::new(
            ValidationRule::TooSmall,
            format!(
                "box is {w}x{h}, minimum is {min}x{min}",
                min = options.min_size
            ),
        ));
    }

    if !(0.0..=1.0).contains(&coords.confidence) {
        errors.push(ValidationError::new(
            ValidationRule::ConfidenceRange,
            format!("confidence {} is outside [0, 1]", coords.confidence),
        ));
    }

    ValidationResult::from_errors(errors)
}

/// Validate a box, then apply the limits of its [`DiagramType`]
pub fn validate_for_diagram_type(
    coords: &DiagramCoordinates,
    image: ImageDimensions,
) -> ValidationResult {
    let mut result = validate(coords, image);
    if result.has_rule(ValidationRule::NonFinite) {
        return result;
    }

    let limits = coords.diagram_type.constraints();
    let (w, h) = (coords.width(), coords.height());
    let base_min = ValidationOptions::default().min_size;
    let (min_w, min_h) = (limits.min_size.0.max(base_min), limits.min_size.1.max(base_min));

    // One size error per box, stated against the stricter limit.
    result.remove_rule(ValidationRule::TooSmall);
    if w > 0.0 && h > 0.0 && (w < min_w || h < min_h) {
        result.push(ValidationError::new(
            ValidationRule::TooSmall,
            format!("{} is {w}x{h}, minimum is {min_w}x{min_h}", coords.diagram_type),
        ));
    }

    if let Some(ratio) = coords.aspect_ratio() {
        let (lo, hi) = limits.aspect_ratio_range;
        if ratio < lo || ratio > hi {
            result.push(ValidationError::new(
                ValidationRule::AspectRatio,
                format!(
                    "{} aspect ratio {ratio:.2} is outside [{lo}, {hi}]",
                    coords.diagram_type
                ),
            ));
        }
    }

    if coords.confidence < limits.min_confidence {
        result.push(ValidationError::new(
            ValidationRule::LowConfidence,
            format!(
                "{} confidence {:.2} is below {}",
                coords.diagram_type, coords.confidence, limits.min_confidence
            ),
        ));
    }

    result
}

/// Two boxes in a batch whose overlap exceeds the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapConflict {
    pub first: usize,
    pub second: usize,
    pub percentage: f64,
}

/// Outcome of [`batch_validate`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchValidationReport {
    /// One result per input box, in input order
    pub results: Vec<ValidationResult>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub overlaps: Vec<OverlapConflict>,
    /// Most frequent violated rules with their counts, most frequent first
    pub common_errors: Vec<(ValidationRule, usize)>,
}

impl BatchValidationReport {
    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

/// Validate each box, then flag overlapping pairs on both sides
pub fn batch_validate(
    coords: &[DiagramCoordinates],
    image: ImageDimensions,
    options: &ValidationOptions,
) -> BatchValidationReport {
    let batch_span = span!(Level::DEBUG, "batch_validate", count = coords.len());
    let _enter = batch_span.enter();

    let mut results: Vec<ValidationResult> = coords
        .iter()
        .map(|c| validate_with_options(c, image, options))
        .collect();

    let mut overlaps = Vec::new();
    if !options.allow_overlap {
        for i in 0..coords.len() {
            for j in (i + 1)..coords.len() {
                let percentage = overlap_percentage(&coords[i], &coords[j]);
                if percentage > options.overlap_threshold {
                    results[i].push(ValidationError::new(
                        ValidationRule::Overlap,
                        format!("overlaps diagram {j} by {percentage:.1}%"),
                    ));
                    results[j].push(ValidationError::new(
                        ValidationRule::Overlap,
                        format!("overlaps diagram {i} by {percentage:.1}%"),
                    ));
                    overlaps.push(OverlapConflict {
                        first: i,
                        second: j,
                        percentage,
                    });
                }
            }
        }
    }

    let mut counts: BTreeMap<ValidationRule, usize> = BTreeMap::new();
    for error in results.iter().flat_map(|r| &r.errors) {
        *counts.entry(error.rule).or_default() += 1;
    }
    let mut common_errors: Vec<(ValidationRule, usize)> = counts.into_iter().collect();
    // Stable sort keeps rule order for equal counts.
    common_errors.sort_by(|a, b| b.1.cmp(&a.1));
    common_errors.truncate(COMMON_ERROR_LIMIT);

    let valid_count = results.iter().filter(|r| r.is_valid).count();
    let invalid_count = results.len() - valid_count;
    debug!(valid_count, invalid_count, overlaps = overlaps.len(), "Batch validated");

    BatchValidationReport {
        results,
        valid_count,
        invalid_count,
        overlaps,
        common_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageDimensions {
        ImageDimensions::new(100.0, 100.0).unwrap()
    }

    #[test]
    fn test_valid_box() {
        let c = DiagramCoordinates::new(10.0, 10.0, 60.0, 60.0).with_confidence(0.8);
        let result = validate(&c, image());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_reports_every_violation() {
        let c = DiagramCoordinates::new(50.0, 50.0, 40.0, 120.0).with_confidence(1.5);
        let result = validate(&c, image());
        assert!(!result.is_valid);
        assert!(result.has_rule(ValidationRule::InvertedX));
        assert!(result.has_rule(ValidationRule::OutOfBounds));
        assert!(result.has_rule(ValidationRule::ConfidenceRange));
        assert!(!result.has_rule(ValidationRule::InvertedY));
    }

    #[test]
    fn test_too_small() {
        let c = DiagramCoordinates::new(10.0, 10.0, 15.0, 60.0);
        let result = validate(&c, image());
        assert!(result.has_rule(ValidationRule::TooSmall));
    }

    #[test]
    fn test_non_finite_short_circuits() {
        let c = DiagramCoordinates::new(f64::NAN, 0.0, 10.0, 10.0);
        let result = validate(&c, image());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].rule, ValidationRule::NonFinite);
    }

    #[test]
    fn test_type_constraints() {
        let table = DiagramCoordinates::new(0.0, 0.0, 60.0, 60.0)
            .with_type(DiagramType::Table)
            .with_confidence(0.2);
        let result = validate_for_diagram_type(&table, image());
        assert!(result.has_rule(ValidationRule::TooSmall));
        assert!(result.has_rule(ValidationRule::LowConfidence));
        assert!(!result.has_rule(ValidationRule::AspectRatio));

        let sliver = DiagramCoordinates::new(0.0, 0.0, 100.0, 8.0)
            .with_type(DiagramType::Other)
            .with_confidence(0.9);
        let result = validate_for_diagram_type(&sliver, image());
        assert!(result.has_rule(ValidationRule::AspectRatio));
    }

    #[test]
    fn test_type_check_reports_size_once() {
        // 5x5 fails both the base minimum and the per-type minimum.
        let speck = DiagramCoordinates::new(0.0, 0.0, 5.0, 5.0)
            .with_type(DiagramType::Table)
            .with_confidence(0.9);
        let result = validate_for_diagram_type(&speck, image());
        let size_errors: Vec<&ValidationError> = result
            .errors
            .iter()
            .filter(|e| e.rule == ValidationRule::TooSmall)
            .collect();
        assert_eq!(size_errors.len(), 1);
        assert!(size_errors[0].message.contains("minimum is 100x50"));
        assert!(!result.is_valid);

        // Large enough for the base check, too small for a map.
        let map = DiagramCoordinates::new(0.0, 0.0, 60.0, 60.0)
            .with_type(DiagramType::Map)
            .with_confidence(0.9);
        let result = validate_for_diagram_type(&map, image());
        assert_eq!(result.errors.len(), 1);
        assert!(result.has_rule(ValidationRule::TooSmall));
    }

    #[test]
    fn test_batch_flags_overlapping_pairs() {
        let boxes = vec![
            DiagramCoordinates::new(0.0, 0.0, 50.0, 50.0).with_confidence(0.9),
            DiagramCoordinates::new(25.0, 25.0, 75.0, 75.0).with_confidence(0.9),
            DiagramCoordinates::new(80.0, 80.0, 95.0, 95.0).with_confidence(0.9),
        ];
        let report = batch_validate(&boxes, image(), &ValidationOptions::default());
        assert_eq!(report.valid_count, 1);
        assert_eq!(report.invalid_count, 2);
        assert_eq!(report.overlaps.len(), 1);
        assert_eq!((report.overlaps[0].first, report.overlaps[0].second), (0, 1));
        assert!(report.results[0].has_rule(ValidationRule::Overlap));
        assert!(report.results[1].has_rule(ValidationRule::Overlap));
        assert!(report.results[2].is_valid);
        assert_eq!(report.common_errors, vec![(ValidationRule::Overlap, 2)]);
    }

    #[test]
    fn test_batch_allows_overlap_when_asked() {
        let boxes = vec![
            DiagramCoordinates::new(0.0, 0.0, 50.0, 50.0),
            DiagramCoordinates::new(0.0, 0.0, 50.0, 50.0),
        ];
        let options = ValidationOptions {
            allow_overlap: true,
            ..ValidationOptions::default()
        };
        let report = batch_validate(&boxes, image(), &options);
        assert!(report.all_valid());
        assert!(report.overlaps.is_empty());
    }
}
