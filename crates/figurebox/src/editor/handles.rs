//! Handle hit testing and cursor queries
//!
//! All queries are pure: they read the pointer, the box and the view and
//! return a value. Hit testing happens in canvas space so handles keep the
//! same on-screen size at every zoom level.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::view::EditorState;
use crate::core::{DiagramCoordinates, Point};

/// The part of a box a gesture grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handle {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
    #[serde(rename = "move")]
    Move,
    #[default]
    #[serde(rename = "none")]
    None,
}

impl Handle {
    /// Corner handles in hit-test order
    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopRight => "tr",
            Handle::BottomLeft => "bl",
            Handle::BottomRight => "br",
            Handle::Move => "move",
            Handle::None => "none",
        }
    }

    pub fn is_corner(&self) -> bool {
        Self::CORNERS.contains(self)
    }

    /// True if this handle drags `x1` (otherwise `x2` is dragged, or neither)
    pub fn moves_left(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    /// True if this handle drags `y1`
    pub fn moves_top(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// Canvas-space corner this handle sits on, if it is a corner
    fn anchor(&self, canvas_box: &DiagramCoordinates) -> Option<Point> {
        let c = canvas_box;
        match self {
            Handle::TopLeft => Some(Point::new(c.x1, c.y1)),
            Handle::TopRight => Some(Point::new(c.x2, c.y1)),
            Handle::BottomLeft => Some(Point::new(c.x1, c.y2)),
            Handle::BottomRight => Some(Point::new(c.x2, c.y2)),
            Handle::Move | Handle::None => None,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer cursor to show, named after the CSS cursor keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Default,
    Move,
    NwseResize,
    NeswResize,
}

impl CursorStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Move => "move",
            CursorStyle::NwseResize => "nwse-resize",
            CursorStyle::NeswResize => "nesw-resize",
        }
    }
}

impl From<Handle> for CursorStyle {
    fn from(handle: Handle) -> Self {
        match handle {
            Handle::TopLeft | Handle::BottomRight => CursorStyle::NwseResize,
            Handle::TopRight | Handle::BottomLeft => CursorStyle::NeswResize,
            Handle::Move => CursorStyle::Move,
            Handle::None => CursorStyle::Default,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    /// Square of side `size` centred on `center`
    pub fn centered(center: Point, size: f64) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Canvas-space squares for the four corner handles, in hit-test order
pub fn handle_rects(
    coords: &DiagramCoordinates,
    view: &EditorState,
    handle_size: f64,
) -> Vec<(Handle, CanvasRect)> {
    let canvas_box = view.coords_to_canvas(coords);
    Handle::CORNERS
        .iter()
        .filter_map(|h| {
            h.anchor(&canvas_box)
                .map(|center| (*h, CanvasRect::centered(center, handle_size)))
        })
        .collect()
}

/// Which handle a canvas-space pointer is over
///
/// Corners win over the interior, so a pointer near a corner of a tiny box
/// still resizes it.
pub fn handle_at_position(
    pointer: Point,
    coords: &DiagramCoordinates,
    view: &EditorState,
    handle_size: f64,
) -> Handle {
    if let Some((handle, _)) = handle_rects(coords, view, handle_size)
        .into_iter()
        .find(|(_, rect)| rect.contains(pointer))
    {
        return handle;
    }
    if view.coords_to_canvas(coords).contains_point(pointer) {
        Handle::Move
    } else {
        Handle::None
    }
}

pub fn cursor_for_position(
    pointer: Point,
    coords: &DiagramCoordinates,
    view: &EditorState,
    handle_size: f64,
) -> CursorStyle {
    handle_at_position(pointer, coords, view, handle_size).into()
}
