//! Configuration loader and validator
//!
//! Loads driver configuration from TOML. Only an unreadable or non-TOML file
//! is an error; a bad `device` or `calibration` entry is logged and the
//! corresponding feature is disabled.
//!
//! ```toml
//! device = "FT5406"
//! calibration = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
//! screen_size = [800, 480]
//! retry_delay_ms = 400
//! ```

use log::{debug, error, info, warn};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use toml::Value;

use crate::device::resolver::RetryPolicy;
use crate::touch::calibration::CalibrationMatrix;
use crate::touch::constants::RESOLVE_RETRY_DELAY_MS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// File layout. Fields that must degrade instead of failing are kept as
/// untyped values and validated by hand.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    device: Option<Value>,

    #[serde(default)]
    calibration: Option<Value>,

    #[serde(default)]
    screen_size: Option<Value>,

    #[serde(default = "default_retry_delay_ms")]
    retry_delay_ms: u64,

    #[serde(default)]
    max_resolve_attempts: Option<u32>,
}

fn default_retry_delay_ms() -> u64 { RESOLVE_RETRY_DELAY_MS }

/// Validated driver configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverConfig {
    /// Name fragment of the touch device; `None` leaves the driver idle
    pub device: Option<String>,

    /// Raw-to-display transform; `None` is identity
    pub calibration: Option<CalibrationMatrix>,

    /// Target display size (informational)
    pub screen_size: Option<(u32, u32)>,

    /// Device discovery retry policy
    pub retry: RetryPolicy,
}

impl DriverConfig {
    /// Configuration targeting a device, everything else default
    pub fn new(device: impl Into<String>) -> Self {
        Self { device: Some(device.into()), ..Self::default() }
    }

    /// Set the calibration matrix
    pub fn with_calibration(mut self, calibration: CalibrationMatrix) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading configuration from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref)?;
        Self::from_toml_str(&content)
    }

    /// Load default configuration from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let config = Self {
            device: raw.device.as_ref().and_then(parse_device),
            calibration: raw.calibration.as_ref().and_then(parse_calibration),
            screen_size: raw.screen_size.as_ref().and_then(parse_screen_size),
            retry: RetryPolicy {
                delay: Duration::from_millis(raw.retry_delay_ms),
                max_attempts: raw.max_resolve_attempts,
            },
        };

        if raw.device.is_none() {
            error!("No touch device configured (`device` missing), touch input disabled");
        }

        info!("✓ Config parsed successfully");
        debug!("  - Device: {:?}", config.device);
        debug!("  - Calibration: {:?}", config.calibration);
        debug!("  - Screen size: {:?}", config.screen_size);
        debug!("  - Retry: {:?}", config.retry);

        Ok(config)
    }
}

fn parse_device(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        other => {
            error!("`device` must be a string, got {}; touch input disabled", other.type_str());
            None
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn parse_row(value: &Value) -> Option<[f64; 3]> {
    match value.as_array()?.as_slice() {
        [a, b, c] => Some([as_number(a)?, as_number(b)?, as_number(c)?]),
        _ => None,
    }
}

fn parse_calibration(value: &Value) -> Option<CalibrationMatrix> {
    let matrix = value
        .as_array()
        .and_then(|rows| match rows.as_slice() {
            [x_row, y_row] => Some([parse_row(x_row)?, parse_row(y_row)?]),
            _ => None,
        })
        .and_then(CalibrationMatrix::from_rows);

    if matrix.is_none() {
        error!("Invalid `calibration` {}, expected [[ax, bx, dx], [ay, by, dy]] of finite numbers; calibration disabled", value);
    }
    matrix
}

fn parse_screen_size(value: &Value) -> Option<(u32, u32)> {
    let size = value.as_array().and_then(|dims| match dims.as_slice() {
        [Value::Integer(w), Value::Integer(h)] => {
            Some((u32::try_from(*w).ok()?, u32::try_from(*h).ok()?))
        }
        _ => None,
    });

    if size.is_none() {
        warn!("Ignoring invalid `screen_size` {}, expected [width, height]", value);
    }
    size
}
