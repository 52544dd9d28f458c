//! Tests for Display and serde names of core types

use figurebox::core::{DiagramCoordinates, DiagramType, ValidationRule};
use figurebox::editor::{CursorStyle, Handle};
use std::str::FromStr;

#[test]
fn test_diagram_type_display() {
    assert_eq!(DiagramType::Graph.to_string(), "graph");
    assert_eq!(DiagramType::Flowchart.to_string(), "flowchart");
    assert_eq!(DiagramType::Scientific.to_string(), "scientific");
    assert_eq!(DiagramType::Geometric.to_string(), "geometric");
    assert_eq!(DiagramType::Table.to_string(), "table");
    assert_eq!(DiagramType::Circuit.to_string(), "circuit");
    assert_eq!(DiagramType::Map.to_string(), "map");
    assert_eq!(DiagramType::Other.to_string(), "other");
}

#[test]
fn test_diagram_type_parses_its_display() {
    for t in DiagramType::ALL {
        assert_eq!(DiagramType::from_str(&t.to_string()).unwrap(), t);
    }
    assert_eq!(DiagramType::from_str(" Table ").unwrap(), DiagramType::Table);
}

#[test]
fn test_handle_display() {
    assert_eq!(Handle::TopLeft.to_string(), "tl");
    assert_eq!(Handle::TopRight.to_string(), "tr");
    assert_eq!(Handle::BottomLeft.to_string(), "bl");
    assert_eq!(Handle::BottomRight.to_string(), "br");
    assert_eq!(Handle::Move.to_string(), "move");
    assert_eq!(Handle::None.to_string(), "none");
}

#[test]
fn test_cursor_css_names() {
    assert_eq!(CursorStyle::from(Handle::TopLeft).as_css(), "nwse-resize");
    assert_eq!(CursorStyle::from(Handle::BottomLeft).as_css(), "nesw-resize");
    assert_eq!(CursorStyle::from(Handle::Move).as_css(), "move");
    assert_eq!(CursorStyle::from(Handle::None).as_css(), "default");
}

#[test]
fn test_validation_rule_display() {
    assert_eq!(
        ValidationRule::InvertedX.to_string(),
        "x2 must be greater than x1"
    );
    assert_eq!(
        ValidationRule::OutOfBounds.to_string(),
        "coordinates must lie within the image"
    );
}

#[test]
fn test_coordinates_json_uses_type_key() {
    let coords = DiagramCoordinates::new(1.0, 2.0, 30.0, 40.0)
        .with_type(DiagramType::Circuit)
        .with_confidence(0.5)
        .with_description("amplifier");
    let json = serde_json::to_value(&coords).unwrap();
    assert_eq!(json["type"], "circuit");
    assert_eq!(json["description"], "amplifier");

    let parsed: DiagramCoordinates =
        serde_json::from_str(r#"{"x1": 0, "y1": 0, "x2": 5, "y2": 5}"#).unwrap();
    assert_eq!(parsed.diagram_type, DiagramType::Other);
    assert_eq!(parsed.confidence, 0.0);
}
