//! Touch input constants
//!
//! This module contains the constants needed to decode the Linux input
//! event stream and to drive the touch state machine:
//! - Event types and codes (from `linux/input-event-codes.h`)
//! - Multitouch thresholds
//! - Device discovery timing

// ============================================================================
// Event Types
// ============================================================================

/// Synchronization events (frame boundaries)
pub const EV_SYN: u16 = 0x00;

/// Key and button state changes
pub const EV_KEY: u16 = 0x01;

/// Absolute axis changes
pub const EV_ABS: u16 = 0x03;

// ============================================================================
// Event Codes
// ============================================================================

/// End of one event frame
pub const SYN_REPORT: u16 = 0x00;

/// Legacy (type A) multitouch contact separator
pub const SYN_MT_REPORT: u16 = 0x02;

/// Kernel buffer overrun; the current frame is incomplete
pub const SYN_DROPPED: u16 = 0x03;

/// Finger touching the panel (value 1 = down, 0 = up)
pub const BTN_TOUCH: u16 = 0x14a;

/// Single-touch X position
pub const ABS_X: u16 = 0x00;

/// Single-touch Y position
pub const ABS_Y: u16 = 0x01;

/// Currently addressed multitouch slot
pub const ABS_MT_SLOT: u16 = 0x2f;

/// Multitouch X position of the addressed slot
pub const ABS_MT_POSITION_X: u16 = 0x35;

/// Multitouch Y position of the addressed slot
pub const ABS_MT_POSITION_Y: u16 = 0x36;

/// Tracking id of the addressed slot (-1 = contact lifted)
pub const ABS_MT_TRACKING_ID: u16 = 0x39;

// ============================================================================
// State Machine Tuning
// ============================================================================

/// A batch ending in a finger-count marker below this value comes from a
/// secondary touch point and produces no pointer transition.
pub const SECONDARY_FINGER_THRESHOLD: i32 = 5;

/// Delay between device discovery attempts (milliseconds)
pub const RESOLVE_RETRY_DELAY_MS: u64 = 400;
