//! Property-based invariant tests for box geometry and the drag reducer.
//!
//! 1. Sanitized boxes are ordered, inside the image and at least min size.
//! 2. Sanitize is idempotent.
//! 3. Overlap is symmetric and a box overlaps itself by exactly 100.
//! 4. Merge contains both inputs.
//! 5. Grid snap lands on exact multiples of the grid.
//! 6. A bottom-right drag never moves the top-left corner.
//! 7. Every drag result stays inside the image at min size.
//! 8. Snapping and aspect lock keep those bounds, and the lock keeps the ratio.
//! 9. Uniform images have no edges and no regions.

use figurebox::core::{
    merge, overlap_percentage, sanitize, validate, DiagramCoordinates, EditorConfig,
    ImageDimensions, Point, DEFAULT_MIN_SIZE,
};
use figurebox::detection::{detect_edges, extract_regions};
use figurebox::editor::{snap_to_grid, EditorState, Handle, InteractiveEditor};
use figurebox::PixelBuffer;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn any_coords() -> impl Strategy<Value = DiagramCoordinates> {
    (
        -5_000.0f64..5_000.0,
        -5_000.0f64..5_000.0,
        -5_000.0f64..5_000.0,
        -5_000.0f64..5_000.0,
        -2.0f64..3.0,
    )
        .prop_map(|(x1, y1, x2, y2, c)| DiagramCoordinates::new(x1, y1, x2, y2).with_confidence(c))
}

fn positive_box() -> impl Strategy<Value = DiagramCoordinates> {
    (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0, 0.5f64..500.0, 0.5f64..500.0)
        .prop_map(|(x, y, w, h)| DiagramCoordinates::new(x, y, x + w, y + h))
}

fn image_strategy() -> impl Strategy<Value = ImageDimensions> {
    (10.0f64..2_000.0, 10.0f64..2_000.0).prop_map(|(w, h)| ImageDimensions { width: w, height: h })
}

/// Integer-valued box fully inside a 400x400 image
fn valid_box() -> impl Strategy<Value = DiagramCoordinates> {
    (0i32..=300, 0i32..=300, 10i32..=100, 10i32..=100).prop_map(|(x, y, w, h)| {
        DiagramCoordinates::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64)
    })
}

/// Integer-valued box at least 30 pixels a side, fully inside a 400x400 image
fn roomy_box() -> impl Strategy<Value = DiagramCoordinates> {
    (0i32..=300, 0i32..=300, 30i32..=100, 30i32..=100).prop_map(|(x, y, w, h)| {
        DiagramCoordinates::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64)
    })
}

fn editor_config() -> impl Strategy<Value = EditorConfig> {
    (
        any::<bool>(),
        prop::sample::select(vec![5.0, 10.0, 25.0]),
        prop::sample::select(vec![10.0, 25.0]),
        any::<bool>(),
    )
        .prop_map(|(snap_to_grid, grid_size, min_size, lock_aspect_ratio)| EditorConfig {
            snap_to_grid,
            grid_size,
            min_size,
            lock_aspect_ratio,
            ..EditorConfig::default()
        })
}

fn page_view() -> EditorState {
    EditorState::new(ImageDimensions {
        width: 400.0,
        height: 400.0,
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Sanitized boxes are well formed
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sanitize_output_is_well_formed(c in any_coords(), image in image_strategy()) {
        let s = sanitize(&c, Some(image));
        prop_assert!(s.x2 > s.x1 && s.y2 > s.y1, "not ordered: {:?}", s);
        prop_assert!(s.x1 >= 0.0 && s.y1 >= 0.0, "negative corner: {:?}", s);
        prop_assert!(s.x2 <= image.width && s.y2 <= image.height, "outside {:?}: {:?}", image, s);
        prop_assert!(s.width() >= DEFAULT_MIN_SIZE && s.height() >= DEFAULT_MIN_SIZE);
        prop_assert!((0.0..=1.0).contains(&s.confidence));
        prop_assert!(validate(&s, image).is_valid, "sanitized box failed validation: {:?}", s);
    }
}

proptest! {
    #[test]
    fn sanitize_without_image_still_orders(c in any_coords()) {
        let s = sanitize(&c, None);
        prop_assert!(s.x2 - s.x1 >= DEFAULT_MIN_SIZE);
        prop_assert!(s.y2 - s.y1 >= DEFAULT_MIN_SIZE);
        prop_assert!(s.x1 >= 0.0 && s.y1 >= 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Sanitize is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sanitize_idempotent(c in any_coords(), image in image_strategy()) {
        let once = sanitize(&c, Some(image));
        let twice = sanitize(&once, Some(image));
        prop_assert_eq!(once, twice);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Overlap symmetry and self-overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overlap_symmetric(a in positive_box(), b in positive_box()) {
        let ab = overlap_percentage(&a, &b);
        prop_assert_eq!(ab, overlap_percentage(&b, &a));
        prop_assert!((0.0..=100.0).contains(&ab));
    }

    #[test]
    fn overlap_with_self_is_100(a in positive_box()) {
        prop_assert_eq!(overlap_percentage(&a, &a), 100.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Merge contains both inputs
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merge_contains_both(a in positive_box(), b in positive_box()) {
        let m = merge(&a, &b);
        prop_assert!(m.contains(&a), "{:?} does not contain {:?}", m, a);
        prop_assert!(m.contains(&b), "{:?} does not contain {:?}", m, b);
        prop_assert_eq!(m.diagram_type, a.diagram_type);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Grid snap lands on multiples
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn snap_gives_exact_multiples(c in any_coords(), grid in prop::sample::select(vec![1.0, 2.0, 5.0, 10.0, 25.0])) {
        let s = snap_to_grid(&c, grid);
        for v in [s.x1, s.y1, s.x2, s.y2] {
            prop_assert_eq!(v % grid, 0.0, "{} is not a multiple of {}", v, grid);
        }
        prop_assert!(s.x2 > s.x1 && s.y2 > s.y1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Bottom-right drag keeps the top-left corner
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn br_drag_only_moves_far_edges(start in valid_box(), dx in -500i32..500, dy in -500i32..500) {
        let editor = InteractiveEditor::new();
        let view = page_view();
        let grab = Point::new(start.x2, start.y2);
        let drag = editor.start_drag(grab, &start, &view);
        prop_assert_eq!(drag.handle, Handle::BottomRight);

        let out = editor.update_drag(Point::new(grab.x + dx as f64, grab.y + dy as f64), &drag, &view);
        prop_assert_eq!(out.x1, start.x1);
        prop_assert_eq!(out.y1, start.y1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Drag results stay inside the image
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drag_output_in_bounds(
        start in valid_box(),
        gx in 0i32..400,
        gy in 0i32..400,
        dx in -800i32..800,
        dy in -800i32..800,
    ) {
        let editor = InteractiveEditor::new();
        let view = page_view();
        let grab = Point::new(gx as f64, gy as f64);
        let drag = editor.start_drag(grab, &start, &view);
        let out = editor.update_drag(Point::new(grab.x + dx as f64, grab.y + dy as f64), &drag, &view);

        prop_assert!(out.x1 >= 0.0 && out.y1 >= 0.0, "{:?}", out);
        prop_assert!(out.x2 <= 400.0 && out.y2 <= 400.0, "{:?}", out);
        prop_assert!(out.width() >= DEFAULT_MIN_SIZE && out.height() >= DEFAULT_MIN_SIZE, "{:?}", out);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Snapping and aspect lock respect the same bounds
// ═════════════════════════════════════════════════════════════════════════

/// Slack for the locked ratio, which is rebuilt in floating point
const EPS: f64 = 1e-6;

proptest! {
    #[test]
    fn configured_drag_output_in_bounds(
        config in editor_config(),
        start in roomy_box(),
        gx in 0i32..400,
        gy in 0i32..400,
        dx in -800i32..800,
        dy in -800i32..800,
    ) {
        let editor = InteractiveEditor::with_config(config.clone()).unwrap();
        let view = page_view();
        let grab = Point::new(gx as f64, gy as f64);
        let drag = editor.start_drag(grab, &start, &view);
        let out = editor.update_drag(Point::new(grab.x + dx as f64, grab.y + dy as f64), &drag, &view);

        prop_assert!(out.x1 >= 0.0 && out.y1 >= 0.0, "{:?} with {:?}", out, config);
        prop_assert!(out.x2 <= 400.0 && out.y2 <= 400.0, "{:?} with {:?}", out, config);
        prop_assert!(out.width() >= config.min_size - EPS, "{:?} with {:?}", out, config);
        prop_assert!(out.height() >= config.min_size - EPS, "{:?} with {:?}", out, config);

        if config.snap_to_grid && drag.is_dragging {
            for v in [out.x1, out.y1, out.x2, out.y2] {
                prop_assert_eq!(v % config.grid_size, 0.0, "{:?} off grid with {:?}", out, config);
            }
        } else if config.lock_aspect_ratio && drag.handle.is_corner() {
            let want = start.width() / start.height();
            let got = out.width() / out.height();
            prop_assert!((got - want).abs() <= want * EPS, "ratio {} != {} for {:?}", got, want, out);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Uniform images are featureless
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn uniform_image_has_no_edges(w in 1usize..40, h in 1usize..40, rgba in any::<[u8; 4]>()) {
        let page = PixelBuffer::filled(w, h, rgba);
        let mask = detect_edges(&page, 0.0);
        prop_assert_eq!(mask.count(), 0);
        prop_assert!(extract_regions(&mask, 1).is_empty());
    }
}
