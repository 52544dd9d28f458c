//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use figurebox::core::logging::{init_logging, LogFormat, LogSettings};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants.len(), 3);
    assert!(variants.contains(&"pretty"));
}

#[test]
fn test_explicit_settings_win() {
    let settings = LogSettings::resolve(Some("figurebox::detection=trace"), Some("json")).unwrap();
    assert_eq!(settings.level, "figurebox::detection=trace");
    assert_eq!(settings.format, LogFormat::Json);
}

#[test]
fn test_init_logging_with_levels_and_formats() {
    // Only the first call can install the subscriber; the rest must fail
    // gracefully rather than panic.
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("warn"), Some("json"));
    let _ = init_logging(Some("off"), None);
    let _ = init_logging(Some("not a level"), Some("compact"));
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}
