//! Drag, resize and move state machine for a single box
//!
//! The editor is a pure reducer: every call takes the pointer, the current
//! [`DragState`] and the per-frame [`EditorState`] and returns a new value.
//! Deltas are always measured from the drag start, so dropped or repeated
//! pointer events never accumulate error.

use serde::{Deserialize, Serialize};
use tracing::{debug, span, trace, Level};

use super::handles::{cursor_for_position, handle_at_position, CursorStyle, Handle};
use super::overlay::{overlay_primitives, OverlayPrimitive};
use super::view::EditorState;
use crate::core::{
    sanitize_with_min_size, DiagramCoordinates, DiagramError, EditorConfig, ImageDimensions, Point,
};

/// State of one pointer gesture
///
/// Created by [`InteractiveEditor::start_drag`], advanced by
/// [`InteractiveEditor::drag_to`] and consumed by
/// [`InteractiveEditor::end_drag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub is_dragging: bool,
    pub handle: Handle,
    /// Pointer position at drag start, in canvas space
    pub start_position: Point,
    pub start_coordinates: DiagramCoordinates,
    pub current_coordinates: DiagramCoordinates,
}

impl DragState {
    /// A gesture that grabbed nothing
    pub fn idle(coords: &DiagramCoordinates) -> Self {
        Self {
            is_dragging: false,
            handle: Handle::None,
            start_position: Point::default(),
            start_coordinates: coords.clone(),
            current_coordinates: coords.clone(),
        }
    }
}

/// Interactive box editor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractiveEditor {
    config: EditorConfig,
}

impl InteractiveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Result<Self, DiagramError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn handle_at_position(
        &self,
        pointer: Point,
        coords: &DiagramCoordinates,
        view: &EditorState,
    ) -> Handle {
        handle_at_position(pointer, coords, view, self.config.handle_size)
    }

    pub fn cursor_for_position(
        &self,
        pointer: Point,
        coords: &DiagramCoordinates,
        view: &EditorState,
    ) -> CursorStyle {
        cursor_for_position(pointer, coords, view, self.config.handle_size)
    }

    /// Drawing instructions for `coords`, highlighting the handle being dragged
    pub fn overlay(
        &self,
        coords: &DiagramCoordinates,
        view: &EditorState,
        drag: Option<&DragState>,
    ) -> Vec<OverlayPrimitive> {
        let active = drag
            .filter(|d| d.is_dragging)
            .map_or(Handle::None, |d| d.handle);
        overlay_primitives(coords, view, active, self.config.handle_size)
    }

    /// Begin a gesture at a canvas-space pointer position
    pub fn start_drag(
        &self,
        pointer: Point,
        coords: &DiagramCoordinates,
        view: &EditorState,
    ) -> DragState {
        let handle = self.handle_at_position(pointer, coords, view);
        debug!(%handle, x = pointer.x, y = pointer.y, "Drag started");
        DragState {
            is_dragging: handle != Handle::None,
            handle,
            start_position: pointer,
            start_coordinates: coords.clone(),
            current_coordinates: coords.clone(),
        }
    }

    /// Box for the current pointer position of an ongoing gesture
    pub fn update_drag(
        &self,
        pointer: Point,
        drag: &DragState,
        view: &EditorState,
    ) -> DiagramCoordinates {
        if !drag.is_dragging || drag.handle == Handle::None {
            return drag.current_coordinates.clone();
        }

        let update_span = span!(Level::TRACE, "update_drag", handle = %drag.handle);
        let _enter = update_span.enter();

        let zoom = view.effective_zoom();
        let dx = (pointer.x - drag.start_position.x) / zoom;
        let dy = (pointer.y - drag.start_position.y) / zoom;

        let start = &drag.start_coordinates;
        let mut next = start.clone();
        match drag.handle {
            Handle::TopLeft => {
                next.x1 += dx;
                next.y1 += dy;
            }
            Handle::TopRight => {
                next.x2 += dx;
                next.y1 += dy;
            }
            Handle::BottomLeft => {
                next.x1 += dx;
                next.y2 += dy;
            }
            Handle::BottomRight => {
                next.x2 += dx;
                next.y2 += dy;
            }
            Handle::Move => {
                next.x1 += dx;
                next.x2 += dx;
                next.y1 += dy;
                next.y2 += dy;
            }
            Handle::None => {}
        }
        trace!(dx, dy, ?next, "Delta applied");

        let locked_ratio = start
            .aspect_ratio()
            .filter(|_| self.config.lock_aspect_ratio && drag.handle.is_corner());
        if let Some(ratio) = locked_ratio {
            next = maintain_aspect_ratio(&next, start, ratio, drag.handle);
        }

        let mut next = self.constrain(&next, drag.handle, view.image_size);
        if let Some(ratio) = locked_ratio {
            next = lock_within(&next, ratio, drag.handle, view.image_size, self.config.min_size);
        }
        // Grid lines take precedence over the locked ratio.
        if self.config.snap_to_grid {
            next = snap_within(
                &next,
                self.config.grid_size,
                view.image_size,
                self.config.min_size,
                drag.handle,
            );
        }
        next
    }

    /// Reducer form of [`update_drag`](Self::update_drag)
    pub fn drag_to(&self, pointer: Point, mut drag: DragState, view: &EditorState) -> DragState {
        drag.current_coordinates = self.update_drag(pointer, &drag, view);
        drag
    }

    /// Finish the gesture and hand back the final box
    pub fn end_drag(&self, drag: DragState) -> DiagramCoordinates {
        debug!(
            handle = %drag.handle,
            moved = drag.current_coordinates != drag.start_coordinates,
            "Drag ended"
        );
        drag.current_coordinates
    }

    /// Keep a dragged box inside the image and at least `min_size` on each side
    ///
    /// A moved box keeps its size and slides back inside. A resized box is
    /// clamped, then regrown from the edge the handle does not move.
    pub fn constrain(
        &self,
        coords: &DiagramCoordinates,
        handle: Handle,
        image: ImageDimensions,
    ) -> DiagramCoordinates {
        let min_size = self.config.min_size;
        if !image.is_valid() {
            return coords.clone();
        }
        if !coords.is_finite() {
            return sanitize_with_min_size(coords, Some(image), min_size);
        }
        let mut out = coords.clone();
        if handle == Handle::Move {
            (out.x1, out.x2) = slide_axis(coords.x1, coords.x2, image.width);
            (out.y1, out.y2) = slide_axis(coords.y1, coords.y2, image.height);
        } else {
            (out.x1, out.x2) =
                resize_axis(coords.x1, coords.x2, image.width, min_size, handle.moves_left());
            (out.y1, out.y2) =
                resize_axis(coords.y1, coords.y2, image.height, min_size, handle.moves_top());
        }
        out
    }
}

fn slide_axis(lo: f64, hi: f64, limit: f64) -> (f64, f64) {
    let span = (hi - lo).clamp(0.0, limit);
    let lo = lo.clamp(0.0, limit - span);
    (lo, lo + span)
}

/// `moves_lo` says whether the gesture drags the near edge; the other edge
/// is the anchor the minimum size grows from.
fn resize_axis(lo: f64, hi: f64, limit: f64, min_size: f64, moves_lo: bool) -> (f64, f64) {
    let min_size = min_size.min(limit);
    let mut lo = lo.clamp(0.0, limit);
    let mut hi = hi.clamp(0.0, limit);

    if hi - lo < min_size {
        if moves_lo {
            lo = hi - min_size;
            if lo < 0.0 {
                lo = 0.0;
                hi = min_size;
            }
        } else {
            hi = lo + min_size;
            if hi > limit {
                hi = limit;
                lo = limit - min_size;
            }
        }
    }
    (lo, hi)
}

/// Round every corner to the nearest multiple of `grid`
///
/// A side that collapses to zero is pushed one grid step past its near edge.
/// Non-positive or non-finite grids leave the box unchanged.
pub fn snap_to_grid(coords: &DiagramCoordinates, grid: f64) -> DiagramCoordinates {
    if !(grid.is_finite() && grid > 0.0) {
        return coords.clone();
    }
    let snap = |v: f64| (v / grid).round() * grid;
    let mut out = coords.clone();
    out.x1 = snap(coords.x1);
    out.y1 = snap(coords.y1);
    out.x2 = snap(coords.x2);
    out.y2 = snap(coords.y2);
    if out.x2 <= out.x1 {
        out.x2 = out.x1 + grid;
    }
    if out.y2 <= out.y1 {
        out.y2 = out.y1 + grid;
    }
    out
}

/// Snap, then keep the box on grid lines inside the image and at least
/// `min_size` rounded up to whole grid cells
///
/// A short side regrows from the edge the handle does not move. An image
/// side with fewer grid cells than that yields a box spanning all of them.
fn snap_within(
    coords: &DiagramCoordinates,
    grid: f64,
    image: ImageDimensions,
    min_size: f64,
    handle: Handle,
) -> DiagramCoordinates {
    let mut out = snap_to_grid(coords, grid);
    if !(grid.is_finite() && grid > 0.0) || !image.is_valid() {
        return out;
    }
    let span = ((min_size / grid).ceil() * grid).max(grid);
    (out.x1, out.x2) = fit_axis(out.x1, out.x2, grid, span, image.width, handle.moves_left());
    (out.y1, out.y2) = fit_axis(out.y1, out.y2, grid, span, image.height, handle.moves_top());
    out
}

fn fit_axis(lo: f64, hi: f64, grid: f64, span: f64, limit: f64, moves_lo: bool) -> (f64, f64) {
    // Last grid line inside the image
    let top = (limit / grid).floor() * grid;
    if top < span {
        return (0.0, if top > 0.0 { top } else { grid });
    }
    let mut lo = lo.clamp(0.0, top);
    let mut hi = hi.clamp(0.0, top);
    if hi - lo < span {
        if moves_lo {
            lo = hi - span;
            if lo < 0.0 {
                lo = 0.0;
                hi = span;
            }
        } else {
            hi = lo + span;
            if hi > top {
                hi = top;
                lo = top - span;
            }
        }
    }
    (lo, hi)
}

/// Restore `ratio` on a constrained corner resize
///
/// Clamping to the image can shorten one side after the ratio was applied.
/// The shorter side then drives the other one, growing from the corner the
/// handle does not move, and the result is held inside the image and above
/// `min_size`. When no box with that ratio fits, `coords` is returned as is.
fn lock_within(
    coords: &DiagramCoordinates,
    ratio: f64,
    handle: Handle,
    image: ImageDimensions,
    min_size: f64,
) -> DiagramCoordinates {
    if !(ratio.is_finite() && ratio > 0.0) || !handle.is_corner() || !image.is_valid() {
        return coords.clone();
    }
    let (w, h) = (coords.width(), coords.height());
    if h > 0.0 && ((w / h) - ratio).abs() <= ratio * 1e-9 {
        return coords.clone();
    }

    let anchor_x = if handle.moves_left() { coords.x2 } else { coords.x1 };
    let anchor_y = if handle.moves_top() { coords.y2 } else { coords.y1 };
    let room_w = if handle.moves_left() { anchor_x } else { image.width - anchor_x };
    let room_h = if handle.moves_top() { anchor_y } else { image.height - anchor_y };

    let min_h = min_size.max(min_size / ratio);
    let max_h = room_h.min(room_w / ratio);
    if min_h > max_h {
        trace!(min_h, max_h, "Locked ratio does not fit, keeping clamped box");
        return coords.clone();
    }

    let height = h.min(w / ratio).clamp(min_h, max_h);
    let width = (height * ratio).max(min_size);
    let height = height.max(min_size);

    let mut out = coords.clone();
    if handle.moves_left() {
        out.x1 = (anchor_x - width).max(0.0);
        out.x2 = anchor_x;
    } else {
        out.x1 = anchor_x;
        out.x2 = (anchor_x + width).min(image.width);
    }
    if handle.moves_top() {
        out.y1 = (anchor_y - height).max(0.0);
        out.y2 = anchor_y;
    } else {
        out.y1 = anchor_y;
        out.y2 = (anchor_y + height).min(image.height);
    }
    out
}

/// Restore `target_ratio` (width / height) after a corner resize
///
/// Whichever side moved further from `reference` wins; the other side is
/// recomputed, keeping the edge opposite `handle` fixed. Non-corner handles
/// and unusable ratios return the box unchanged.
pub fn maintain_aspect_ratio(
    coords: &DiagramCoordinates,
    reference: &DiagramCoordinates,
    target_ratio: f64,
    handle: Handle,
) -> DiagramCoordinates {
    if !(target_ratio.is_finite() && target_ratio > 0.0) || !handle.is_corner() {
        return coords.clone();
    }

    let mut out = coords.clone();
    let width_change = (coords.width() - reference.width()).abs();
    let height_change = (coords.height() - reference.height()).abs();

    if width_change >= height_change {
        let height = coords.width() / target_ratio;
        if handle.moves_top() {
            out.y1 = out.y2 - height;
        } else {
            out.y2 = out.y1 + height;
        }
    } else {
        let width = coords.height() * target_ratio;
        if handle.moves_left() {
            out.x1 = out.x2 - width;
        } else {
            out.x2 = out.x1 + width;
        }
    }
    out
}
