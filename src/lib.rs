//! touch-cursor: Touch panel to single-pointer cursor bridge
//!
//! This library reads a multitouch panel through the Linux input subsystem,
//! reduces it to one simulated pointer, applies an optional calibration and
//! hands press/release/move events to a host presentation layer.

pub mod backend;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod manager;
pub mod touch;

// Re-export commonly used items
pub use backend::{CursorBackend, CursorEvent};
pub use config::{ConfigError, DriverConfig};
pub use device::{DeviceInfo, InputSource, RetryPolicy};
pub use manager::{DriverHandle, DriverMessage, TouchDriver};
pub use touch::{project, CalibrationMatrix, RawEvent};
