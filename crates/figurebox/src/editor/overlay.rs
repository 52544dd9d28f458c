//! Geometric drawing instructions for the box being edited
//!
//! The host turns these into canvas or DOM calls; nothing here knows how to
//! draw. Everything is in canvas space.

use serde::{Deserialize, Serialize};

use super::handles::{handle_rects, CanvasRect, Handle};
use super::view::EditorState;
use crate::core::{DiagramCoordinates, Point};

/// Gap between the label anchor and the top of the outline, in canvas pixels
const LABEL_OFFSET: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayPrimitive {
    Outline {
        rect: CanvasRect,
    },
    Handle {
        handle: Handle,
        rect: CanvasRect,
        active: bool,
    },
    /// Baseline-left anchor for the box label
    Label {
        anchor: Point,
        text: String,
    },
}

/// Outline, four corner handles and a label, in that order
pub fn overlay_primitives(
    coords: &DiagramCoordinates,
    view: &EditorState,
    active: Handle,
    handle_size: f64,
) -> Vec<OverlayPrimitive> {
    let canvas_box = view.coords_to_canvas(coords);
    let mut out = Vec::with_capacity(6);

    out.push(OverlayPrimitive::Outline {
        rect: CanvasRect {
            x: canvas_box.x1,
            y: canvas_box.y1,
            width: canvas_box.width(),
            height: canvas_box.height(),
        },
    });
    out.extend(
        handle_rects(coords, view, handle_size)
            .into_iter()
            .map(|(handle, rect)| OverlayPrimitive::Handle {
                handle,
                rect,
                active: handle == active,
            }),
    );
    out.push(OverlayPrimitive::Label {
        anchor: Point::new(canvas_box.x1, canvas_box.y1 - LABEL_OFFSET),
        text: format!(
            "{} ({:.0}%)",
            coords.diagram_type,
            coords.confidence.clamp(0.0, 1.0) * 100.0
        ),
    });
    out
}
