//! JSON bridge for browser hosts
//!
//! Every entry point takes and returns JSON strings so the host never has to
//! mirror Rust types. On `wasm32` the functions are exported through
//! `wasm-bindgen`; natively they are plain functions, which is how the tests
//! drive them.
//!
//! Failures never throw across the boundary. A bad request yields
//! `{"error": "..."}` with the full context chain.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::core::{
    batch_validate, sanitize_with_min_size, validate_for_diagram_type, validate_with_options,
    BatchValidationReport, DetectionConfig, DiagramCoordinates, EditorConfig, ImageDimensions,
    PixelBuffer, Point, ValidationOptions, ValidationResult, DEFAULT_MIN_SIZE,
};
use crate::detection::LocalDiagramDetector;
use crate::editor::{DragState, EditorState, InteractiveEditor};

/// Initialize the module in the browser
///
/// Sets up the panic hook and routes tracing events to the console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

#[derive(Serialize)]
struct ErrorReply {
    error: String,
}

fn reply<T: Serialize>(result: Result<T>) -> String {
    let encoded = result.and_then(|value| {
        serde_json::to_string(&value).context("Failed to serialize response")
    });
    match encoded {
        Ok(json) => json,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "JSON bridge request failed");
            let body = ErrorReply {
                error: format!("{err:#}"),
            };
            serde_json::to_string(&body)
                .unwrap_or_else(|_| r#"{"error":"unserializable error"}"#.to_string())
        }
    }
}

fn parse<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T> {
    serde_json::from_str(json).with_context(|| format!("Invalid {what} JSON"))
}

/// An empty string means "use the defaults"
fn parse_or_default<'a, T: Deserialize<'a> + Default>(json: &'a str, what: &str) -> Result<T> {
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    parse(json, what)
}

fn image(width: f64, height: f64) -> Result<ImageDimensions> {
    ImageDimensions::new(width, height).context("Invalid image dimensions")
}

fn detect(width: u32, height: u32, rgba: &[u8], config_json: &str) -> Result<Vec<DiagramCoordinates>> {
    let config: DetectionConfig = parse_or_default(config_json, "detection config")?;
    let detector =
        LocalDiagramDetector::with_config(config).context("Invalid detection config")?;
    let buffer = PixelBuffer {
        width: width as usize,
        height: height as usize,
        data: rgba.to_vec(),
    };
    let diagrams = detector.detect_diagrams(&buffer);
    debug!(count = diagrams.len(), "Bridge detection finished");
    Ok(diagrams)
}

/// Detect diagram boxes in an RGBA page image
///
/// `config_json` may be empty or a partial `DetectionConfig`.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn detect_diagrams_json(width: u32, height: u32, rgba: &[u8], config_json: &str) -> String {
    reply(detect(width, height, rgba, config_json))
}

fn sanitize_request(coords_json: &str, width: f64, height: f64) -> Result<DiagramCoordinates> {
    let coords: DiagramCoordinates = parse(coords_json, "coordinates")?;
    let image = image(width, height)?;
    Ok(sanitize_with_min_size(&coords, Some(image), DEFAULT_MIN_SIZE))
}

/// Sanitize a box against an image of the given size
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn sanitize_json(coords_json: &str, width: f64, height: f64) -> String {
    reply(sanitize_request(coords_json, width, height))
}

fn validate_request(
    coords_json: &str,
    width: f64,
    height: f64,
    strict: bool,
) -> Result<ValidationResult> {
    let coords: DiagramCoordinates = parse(coords_json, "coordinates")?;
    let image = image(width, height)?;
    Ok(if strict {
        validate_for_diagram_type(&coords, image)
    } else {
        validate_with_options(&coords, image, &ValidationOptions::default())
    })
}

/// Validate a box; with `strict` the per-type limits apply as well
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn validate_json(coords_json: &str, width: f64, height: f64, strict: bool) -> String {
    reply(validate_request(coords_json, width, height, strict))
}

fn batch_request(
    coords_json: &str,
    width: f64,
    height: f64,
    options_json: &str,
) -> Result<BatchValidationReport> {
    let coords: Vec<DiagramCoordinates> = parse(coords_json, "coordinate list")?;
    let image = image(width, height)?;
    let options: ValidationOptions = parse_or_default(options_json, "validation options")?;
    options.validate().context("Invalid validation options")?;
    Ok(batch_validate(&coords, image, &options))
}

/// Validate a list of boxes and flag overlapping pairs
///
/// `options_json` may be empty or a partial `ValidationOptions`.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn batch_validate_json(coords_json: &str, width: f64, height: f64, options_json: &str) -> String {
    reply(batch_request(coords_json, width, height, options_json))
}

fn editor(config_json: &str) -> Result<InteractiveEditor> {
    let config: EditorConfig = parse_or_default(config_json, "editor config")?;
    InteractiveEditor::with_config(config).context("Invalid editor config")
}

fn start_drag_request(
    pointer: Point,
    coords_json: &str,
    view_json: &str,
    config_json: &str,
) -> Result<DragState> {
    let coords: DiagramCoordinates = parse(coords_json, "coordinates")?;
    let view: EditorState = parse(view_json, "editor state")?;
    Ok(editor(config_json)?.start_drag(pointer, &coords, &view))
}

/// Begin a gesture; returns the `DragState` the host keeps until pointer-up
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn start_drag_json(
    x: f64,
    y: f64,
    coords_json: &str,
    view_json: &str,
    config_json: &str,
) -> String {
    reply(start_drag_request(Point::new(x, y), coords_json, view_json, config_json))
}

fn drag_to_request(
    pointer: Point,
    drag_json: &str,
    view_json: &str,
    config_json: &str,
) -> Result<DragState> {
    let drag: DragState = parse(drag_json, "drag state")?;
    let view: EditorState = parse(view_json, "editor state")?;
    Ok(editor(config_json)?.drag_to(pointer, drag, &view))
}

/// Advance a gesture; returns the updated `DragState`
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn drag_to_json(x: f64, y: f64, drag_json: &str, view_json: &str, config_json: &str) -> String {
    reply(drag_to_request(Point::new(x, y), drag_json, view_json, config_json))
}

/// Finish a gesture; returns the final box
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn end_drag_json(drag_json: &str) -> String {
    reply(
        parse::<DragState>(drag_json, "drag state")
            .map(|drag| InteractiveEditor::new().end_drag(drag)),
    )
}

fn cursor_request(
    pointer: Point,
    coords_json: &str,
    view_json: &str,
    config_json: &str,
) -> Result<&'static str> {
    let coords: DiagramCoordinates = parse(coords_json, "coordinates")?;
    let view: EditorState = parse(view_json, "editor state")?;
    Ok(editor(config_json)?
        .cursor_for_position(pointer, &coords, &view)
        .as_css())
}

/// CSS cursor keyword for a pointer over a box
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn cursor_json(x: f64, y: f64, coords_json: &str, view_json: &str, config_json: &str) -> String {
    reply(cursor_request(Point::new(x, y), coords_json, view_json, config_json))
}
