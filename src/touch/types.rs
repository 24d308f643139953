//! Touch type definitions
//!
//! This module defines the raw input events consumed by the translation
//! core and the per-finger state kept by the tracker.

use serde::{Deserialize, Serialize};

use crate::touch::constants::*;

/// One raw event from the touch panel, already classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawEvent {
    /// Slot assignment (`ABS_MT_TRACKING_ID`). Negative ids mark a lifted contact.
    TrackingId(i32),

    /// Horizontal position in raw device units
    AxisX(i32),

    /// Vertical position in raw device units
    AxisY(i32),

    /// Touch button state (`true` = finger down)
    Touch(bool),

    /// Finger-count marker (`ABS_MT_SLOT`), used for multitouch bookkeeping only
    FingerCount(i32),

    /// Anything the translation core does not interpret
    Other { kind: u16, code: u16, value: i32 },
}

impl RawEvent {
    /// Classify a raw evdev `(type, code, value)` triple.
    ///
    /// Synchronization events are not classified here; the reader uses them
    /// to delimit batches and never forwards them.
    pub fn from_raw(kind: u16, code: u16, value: i32) -> Self {
        match (kind, code) {
            (EV_ABS, ABS_MT_TRACKING_ID) => RawEvent::TrackingId(value),
            (EV_ABS, ABS_X) | (EV_ABS, ABS_MT_POSITION_X) => RawEvent::AxisX(value),
            (EV_ABS, ABS_Y) | (EV_ABS, ABS_MT_POSITION_Y) => RawEvent::AxisY(value),
            (EV_ABS, ABS_MT_SLOT) => RawEvent::FingerCount(value),
            (EV_KEY, BTN_TOUCH) => RawEvent::Touch(value != 0),
            _ => RawEvent::Other { kind, code, value },
        }
    }

    /// Check if this is a tracking-id marker
    pub fn is_tracking_id(&self) -> bool {
        matches!(self, RawEvent::TrackingId(_))
    }

    /// Check if this signals the end of a touch
    pub fn is_touch_end(&self) -> bool {
        matches!(self, RawEvent::Touch(false))
    }
}

/// State of one tracked finger (slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Finger {
    /// Slot id assigned by the tracking-id event
    pub id: i32,

    /// Last observed X, if any
    pub x: Option<i32>,

    /// Last observed Y, if any
    pub y: Option<i32>,
}

impl Finger {
    /// Create a finger with no observed position yet
    pub fn new(id: i32) -> Self {
        Self { id, x: None, y: None }
    }
}
