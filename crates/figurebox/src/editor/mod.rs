//! Interactive correction of detected boxes
//!
//! One box is edited at a time. A gesture goes Idle → Dragging(handle) →
//! Idle, with the caller owning the [`DragState`] in between.

pub mod drag;
pub mod handles;
pub mod overlay;
pub mod view;

pub use drag::{maintain_aspect_ratio, snap_to_grid, DragState, InteractiveEditor};
pub use handles::{
    cursor_for_position, handle_at_position, handle_rects, CanvasRect, CursorStyle, Handle,
};
pub use overlay::{overlay_primitives, OverlayPrimitive};
pub use view::EditorState;
