//! Touch translation core
//!
//! This module turns raw multitouch panel events into a single simulated
//! pointer:
//! - Raw event decoding (evdev type/code/value triples)
//! - Frame grouping at `SYN_REPORT`
//! - Per-slot finger tracking
//! - Batch reduction into press/release/move transitions
//! - Affine calibration of raw coordinates

pub mod constants;
pub mod types;
pub mod frame;
pub mod tracker;
pub mod simulator;
pub mod calibration;

// Re-export commonly used items
pub use types::*;
pub use frame::FrameBatcher;
pub use tracker::FingerTracker;
pub use simulator::{BatchShape, MouseEvent, MouseSimulator};
pub use calibration::{project, CalibrationMatrix};
