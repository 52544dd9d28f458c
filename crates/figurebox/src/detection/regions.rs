//! Connected-component extraction from an edge mask
//!
//! Uses an 8-connected flood fill driven by an explicit stack, so memory is
//! bounded by the mask size rather than by recursion depth.

use tracing::{debug, span, Level};

use super::edges::EdgeMask;
use crate::core::Region;

/// Groups edge pixels into connected regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionExtractor {
    min_area: usize,
}

impl Default for RegionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionExtractor {
    pub const DEFAULT_MIN_AREA: usize = 400;

    pub fn new() -> Self {
        Self {
            min_area: Self::DEFAULT_MIN_AREA,
        }
    }

    pub fn with_min_area(min_area: usize) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> usize {
        self.min_area
    }

    pub fn extract(&self, mask: &EdgeMask) -> Vec<Region> {
        extract_regions(mask, self.min_area)
    }
}

/// Find every 8-connected group of edge cells with at least `min_area` cells
///
/// Regions come back sorted by pixel area, largest first; equal areas keep
/// their scan order (top-to-bottom, left-to-right by seed cell).
pub fn extract_regions(mask: &EdgeMask, min_area: usize) -> Vec<Region> {
    let region_span = span!(
        Level::DEBUG,
        "extract_regions",
        width = mask.width(),
        height = mask.height(),
        min_area
    );
    let _enter = region_span.enter();

    let (w, h) = (mask.width(), mask.height());
    let cells = mask.cells();
    let mut visited = vec![false; cells.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut regions = Vec::new();
    let mut components = 0usize;

    for seed in 0..cells.len() {
        if !cells[seed] || visited[seed] {
            continue;
        }
        components += 1;

        visited[seed] = true;
        stack.push(seed);

        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);
        let mut area = 0usize;

        while let Some(idx) = stack.pop() {
            let x = idx % w;
            let y = idx / w;
            area += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(h - 1);
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);

            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    let nidx = ny * w + nx;
                    if cells[nidx] && !visited[nidx] {
                        visited[nidx] = true;
                        stack.push(nidx);
                    }
                }
            }
        }

        if area >= min_area {
            regions.push(Region {
                x: min_x,
                y: min_y,
                width: max_x - min_x + 1,
                height: max_y - min_y + 1,
                area,
            });
        }
    }

    regions.sort_by(|a, b| b.area.cmp(&a.area));
    debug!(components, kept = regions.len(), "Regions extracted");
    regions
}
