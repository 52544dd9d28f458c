//! Logging infrastructure for diagram region processing
//!
//! This module provides structured logging using the `tracing` crate.
//! It supports configurable log levels and formats. In the browser the same
//! entry point routes events to the console through `tracing-wasm`.
//!
//! # Usage
//!
//! ```rust
//! use figurebox::core::logging::init_logging;
//!
//! // Initialize with default settings (info, compact)
//! let _ = init_logging(None, None);
//! ```
//!
//! # Log Levels
//!
//! - `trace`: Very detailed information, typically only interesting when debugging
//! - `debug`: Detailed information for debugging
//! - `info`: General informational messages (default)
//! - `warn`: Warning messages
//! - `error`: Error messages
//!
//! # Log Formats
//!
//! - `compact`: Single-line format, good for production
//! - `pretty`: Multi-line format with colors, good for development
//! - `json`: JSON format, good for log aggregation systems
//!
//! # Environment Variables
//!
//! Logging can be configured via environment variables:
//! - `FIGUREBOX_LOG_LEVEL`: Set log level (trace|debug|info|warn|error)
//! - `RUST_LOG`: Alternative way to set log level (tracing-subscriber standard)
//!
//! # Adding Tracing to Custom Detectors
//!
//! A caller-provided [`Detector`](crate::core::Detector) should follow the
//! same span layout as the built-in one so fallback decisions are readable:
//!
//! ```rust,ignore
//! use tracing::{debug, info, span, warn, Level};
//!
//! impl Detector for CloudDetector {
//!     fn detect(&self, buffer: &PixelBuffer) -> Result<Vec<DiagramCoordinates>, DiagramError> {
//!         let detect_span = span!(Level::INFO, "detect_cloud", width = buffer.width);
//!         let _enter = detect_span.enter();
//!
//!         let boxes = self.client.request(buffer).map_err(|e| {
//!             warn!(error = %e, "Cloud request failed");
//!             DiagramError::detection_error(e.to_string())
//!         })?;
//!         debug!(count = boxes.len(), "Cloud boxes received");
//!         info!("Cloud detection completed");
//!         Ok(boxes)
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "cloud"
//!     }
//! }
//! ```
//!
//! # Filtering Logs
//!
//! You can filter logs by component using the log level syntax:
//!
//! ```bash
//! # Show the per-stage counts of the local detector
//! RUST_LOG="figurebox::detection=debug" cargo test
//!
//! # Trace every candidate region, keep the rest at info
//! RUST_LOG="info,figurebox::detection::classifier=trace" cargo test
//! ```

use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Log level and format after applying parameters, env vars and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings: explicit value, then `FIGUREBOX_LOG_*`, then
    /// `RUST_LOG` (level only), then `info` / `compact`
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, String> {
        let level = level
            .map(str::to_string)
            .or_else(|| std::env::var("FIGUREBOX_LOG_LEVEL").ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());

        let format = format
            .map(str::to_string)
            .or_else(|| std::env::var("FIGUREBOX_LOG_FORMAT").ok())
            .unwrap_or_else(|| "compact".to_string());
        let format =
            LogFormat::from_str(&format).map_err(|e| format!("Invalid log format: {}", e))?;

        Ok(Self { level, format })
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn filter(&self) -> EnvFilter {
        if self.level == "off" {
            return EnvFilter::new("off");
        }
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given log level and format
///
/// # Arguments
///
/// * `level` - Optional log level or filter directive (trace|debug|info|warn|error|off,
///            or e.g. `info,figurebox::detection=trace`).
///            If None, uses `FIGUREBOX_LOG_LEVEL` or `RUST_LOG`, or defaults to `info`.
/// * `format` - Optional log format (compact|pretty|json).
///             If None, uses `FIGUREBOX_LOG_FORMAT`, or defaults to `compact`.
///
/// # Returns
///
/// Returns an error for an unknown format or if a global subscriber is
/// already installed.
///
/// # Example
///
/// ```rust
/// use figurebox::core::logging::init_logging;
///
/// // Fails if a subscriber is already installed, which is fine here
/// let _ = init_logging(Some("debug"), Some("pretty"));
/// ```
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        // The browser console is the only sink. tracing-wasm 0.1 has no
        // level filter in its config, so level and format are both ignored.
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());

        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let settings = LogSettings::resolve(level, format)?;

        let layer = match settings.format {
            LogFormat::Compact => fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
                .boxed(),
            LogFormat::Json => fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .json()
                .boxed(),
        };

        Registry::default()
            .with(settings.filter())
            .with(layer)
            .try_init()?;

        Ok(())
    }
}

/// Initialize logging with default settings (info level, compact format)
///
/// This is a convenience function that calls `init_logging(None, None)`.
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_explicit_settings_win() {
        let settings = LogSettings::resolve(Some("debug"), Some("pretty")).unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, LogFormat::Pretty);
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let err = LogSettings::resolve(Some("info"), Some("yaml")).unwrap_err();
        assert!(err.contains("Invalid log format"));
    }
}
