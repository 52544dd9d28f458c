//! Box geometry: sanitizing, coordinate-space transforms, overlap and merge
//!
//! Everything here is a pure function over [`DiagramCoordinates`]; nothing
//! is cached between calls.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::DEFAULT_MIN_SIZE;
use super::types::{DiagramCoordinates, ImageDimensions, Point};

/// Affine map between two coordinate spaces: `p' = p * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn scale(scale_x: f64, scale_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            ..Self::identity()
        }
    }

    /// Scale that maps an image of size `from` onto one of size `to`
    pub fn between(from: ImageDimensions, to: ImageDimensions) -> Self {
        Self::scale(to.width / from.width, to.height / from.height)
    }

    /// The reverse mapping, or `None` if either scale is zero
    pub fn inverse(&self) -> Option<Self> {
        if self.scale_x == 0.0 || self.scale_y == 0.0 {
            return None;
        }
        Some(Self {
            scale_x: 1.0 / self.scale_x,
            scale_y: 1.0 / self.scale_y,
            offset_x: -self.offset_x / self.scale_x,
            offset_y: -self.offset_y / self.scale_y,
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.offset_x,
            p.y * self.scale_y + self.offset_y,
        )
    }
}

/// Sanitize a box with the default minimum size
///
/// See [`sanitize_with_min_size`].
pub fn sanitize(coords: &DiagramCoordinates, image: Option<ImageDimensions>) -> DiagramCoordinates {
    sanitize_with_min_size(coords, image, DEFAULT_MIN_SIZE)
}

/// Turn any box into a drawable one
///
/// Floors `x1`/`y1` (never below 0), ceils `x2`/`y2`, clamps the confidence
/// to `[0, 1]`, clamps to the image when given, pushes a collapsed far edge
/// one pixel past the near edge, then grows the box to `min_size` from its
/// top-left corner (sliding back inside the image if that overflows).
/// Non-finite corners fall back to 0 for the near edge and to the near edge
/// for the far one.
///
/// The result is a fixed point: sanitizing it again returns it unchanged.
/// An image side smaller than `min_size` yields a box spanning that whole side.
pub fn sanitize_with_min_size(
    coords: &DiagramCoordinates,
    image: Option<ImageDimensions>,
    min_size: f64,
) -> DiagramCoordinates {
    let min_size = if min_size.is_finite() { min_size.max(0.0).ceil() } else { DEFAULT_MIN_SIZE };
    let image = image.filter(ImageDimensions::is_valid);

    let (x1, x2) = sanitize_axis(coords.x1, coords.x2, image.map(|d| d.width), min_size);
    let (y1, y2) = sanitize_axis(coords.y1, coords.y2, image.map(|d| d.height), min_size);

    let confidence = if coords.confidence.is_finite() {
        coords.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let out = DiagramCoordinates {
        x1,
        y1,
        x2,
        y2,
        confidence,
        diagram_type: coords.diagram_type,
        description: coords.description.clone(),
    };
    trace!(?out, "sanitized coordinates");
    out
}

fn sanitize_axis(lo: f64, hi: f64, limit: Option<f64>, min_size: f64) -> (f64, f64) {
    let mut lo = if lo.is_finite() { lo.floor().max(0.0) } else { 0.0 };
    let mut hi = if hi.is_finite() { hi.ceil() } else { lo };

    if let Some(limit) = limit {
        // Fractional image sizes would make the bound itself non-integral.
        let limit = limit.floor().max(1.0);
        lo = lo.min(limit);
        hi = hi.clamp(0.0, limit);

        if hi <= lo {
            hi = lo + 1.0;
        }
        if hi - lo < min_size {
            hi = lo + min_size;
        }
        if hi > limit {
            hi = limit;
            lo = (limit - min_size.max(1.0)).max(0.0);
        }
    } else {
        if hi <= lo {
            hi = lo + 1.0;
        }
        if hi - lo < min_size {
            hi = lo + min_size;
        }
    }

    (lo, hi)
}

/// Map all four corners through `transform`
///
/// Corners are re-ordered afterwards so a negative scale still yields
/// `x1 <= x2` and `y1 <= y2`.
pub fn transform(coords: &DiagramCoordinates, transform: &Transform) -> DiagramCoordinates {
    let a = transform.apply(Point::new(coords.x1, coords.y1));
    let b = transform.apply(Point::new(coords.x2, coords.y2));
    DiagramCoordinates {
        x1: a.x.min(b.x),
        y1: a.y.min(b.y),
        x2: a.x.max(b.x),
        y2: a.y.max(b.y),
        confidence: coords.confidence,
        diagram_type: coords.diagram_type,
        description: coords.description.clone(),
    }
}

/// Rescale a box found on an image of size `from` to an image of size `to`
pub fn scale_to_dimensions(
    coords: &DiagramCoordinates,
    from: ImageDimensions,
    to: ImageDimensions,
) -> DiagramCoordinates {
    transform(coords, &Transform::between(from, to))
}

/// Intersection of two boxes, if they share a region of positive area
pub fn intersection(a: &DiagramCoordinates, b: &DiagramCoordinates) -> Option<(f64, f64, f64, f64)> {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);
    (x1 < x2 && y1 < y2).then_some((x1, y1, x2, y2))
}

/// Intersection over union of two boxes, as a percentage
///
/// Returns 0 for boxes that do not overlap. The result is symmetric in its
/// arguments and a box overlaps itself by exactly 100.
pub fn overlap_percentage(a: &DiagramCoordinates, b: &DiagramCoordinates) -> f64 {
    let Some((x1, y1, x2, y2)) = intersection(a, b) else {
        return 0.0;
    };
    let inter = (x2 - x1) * (y2 - y1);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    (inter / union * 100.0).clamp(0.0, 100.0)
}

/// Smallest box containing both `a` and `b`
///
/// Takes the higher confidence of the two; type and description come from `a`.
pub fn merge(a: &DiagramCoordinates, b: &DiagramCoordinates) -> DiagramCoordinates {
    DiagramCoordinates {
        x1: a.x1.min(b.x1),
        y1: a.y1.min(b.y1),
        x2: a.x2.max(b.x2),
        y2: a.y2.max(b.y2),
        confidence: a.confidence.max(b.confidence),
        diagram_type: a.diagram_type,
        description: a.description.clone(),
    }
}

/// Collapse boxes that nest or overlap by more than `threshold` percent
///
/// Earlier boxes absorb later ones, so with input sorted by importance the
/// surviving box keeps the most important metadata. Repeats until no pair
/// qualifies, since a grown box can reach boxes it missed before.
pub fn merge_overlapping(boxes: &[DiagramCoordinates], threshold: f64) -> Vec<DiagramCoordinates> {
    let mut merged: Vec<DiagramCoordinates> = boxes.to_vec();
    loop {
        let mut out: Vec<DiagramCoordinates> = Vec::with_capacity(merged.len());
        for candidate in merged.iter() {
            let target = out.iter_mut().find(|kept| {
                kept.contains(candidate)
                    || candidate.contains(kept)
                    || overlap_percentage(kept, candidate) > threshold
            });
            match target {
                Some(kept) => *kept = merge(kept, candidate),
                None => out.push(candidate.clone()),
            }
        }
        if out.len() == merged.len() {
            return out;
        }
        merged = out;
    }
}
