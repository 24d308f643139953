//! Single-pointer simulation
//!
//! Reduces one batch of raw events (one evdev frame) into at most one
//! pointer transition. Multitouch bookkeeping batches are recognised by
//! their shape first and never move the pointer:
//!
//! 1. A lone finger-count marker is a keepalive and is ignored.
//! 2. A batch led by a finger-count marker only raises the finger estimate.
//! 3. A batch carrying a tracking id together with a touch-end lowers it.
//! 4. A batch trailed by a low finger-count marker belongs to a secondary
//!    finger and is suppressed.
//! 5. Anything else is folded event by event into the pointer state.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::touch::constants::SECONDARY_FINGER_THRESHOLD;
use crate::touch::tracker::FingerTracker;
use crate::touch::types::RawEvent;

/// Simulated pointer transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEvent {
    Down,
    Up,
    Move,
}

/// How a batch was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchShape {
    /// Lone finger-count marker
    Keepalive,
    /// Leading finger-count marker with the given value
    FingerCount(i32),
    /// Tracking id plus touch-end
    Lift,
    /// Trailing finger-count marker below the secondary threshold
    Secondary,
    /// Folded into the pointer state
    Pointer,
}

impl BatchShape {
    /// Classify a batch, in priority order.
    pub fn classify(batch: &[RawEvent]) -> Self {
        if let [RawEvent::FingerCount(_)] = batch {
            return BatchShape::Keepalive;
        }

        if let Some(RawEvent::FingerCount(v)) = batch.first() {
            return BatchShape::FingerCount(*v);
        }

        let has_tracking_id = batch.iter().any(RawEvent::is_tracking_id);
        let has_touch_end = batch.iter().any(RawEvent::is_touch_end);
        if has_tracking_id && has_touch_end {
            return BatchShape::Lift;
        }

        if let Some(RawEvent::FingerCount(v)) = batch.last() {
            if *v < SECONDARY_FINGER_THRESHOLD {
                return BatchShape::Secondary;
            }
        }

        BatchShape::Pointer
    }
}

/// Simulated pointer state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseSimulator {
    /// Best-effort concurrent finger estimate (diagnostics only)
    pub finger_count: u32,

    /// Last known X in raw device units
    pub mouse_x: Option<i32>,

    /// Last known Y in raw device units
    pub mouse_y: Option<i32>,

    /// Transition recorded for the current batch
    pub mouse_event: Option<MouseEvent>,
}

impl MouseSimulator {
    /// Create an idle simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce one batch. Only `BatchShape::Pointer` batches touch the
    /// tracker or record a transition.
    pub fn reduce(&mut self, tracker: &mut FingerTracker, batch: &[RawEvent]) -> BatchShape {
        let shape = BatchShape::classify(batch);

        match shape {
            BatchShape::Keepalive => {
                trace!("keepalive batch ignored");
            }
            BatchShape::FingerCount(v) => {
                if i64::from(v) + 1 > i64::from(self.finger_count) {
                    self.finger_count += 1;
                    debug!("finger count raised to {}", self.finger_count);
                }
            }
            BatchShape::Lift => {
                // NOTE: a primary release and a secondary lift are counted the same way.
                self.finger_count = self.finger_count.saturating_sub(1);
                debug!("finger lifted, count now {}", self.finger_count);
            }
            BatchShape::Secondary => {
                trace!("secondary finger batch suppressed");
            }
            BatchShape::Pointer => {
                for event in batch {
                    tracker.apply(event);
                    self.fold(event);
                }
            }
        }

        shape
    }

    fn fold(&mut self, event: &RawEvent) {
        match *event {
            RawEvent::Touch(false) => self.record(MouseEvent::Up),
            RawEvent::Touch(true) => self.record(MouseEvent::Down),
            RawEvent::AxisX(x) => {
                self.mouse_x = Some(x);
                self.record(MouseEvent::Move);
            }
            RawEvent::AxisY(y) => {
                self.mouse_y = Some(y);
                self.record(MouseEvent::Move);
            }
            _ => {}
        }
    }

    /// Down/Up replace a pending Move but never each other; Move only fills
    /// an empty slot.
    fn record(&mut self, event: MouseEvent) {
        self.mouse_event = match (self.mouse_event, event) {
            (None, next) => Some(next),
            (Some(MouseEvent::Move), MouseEvent::Down | MouseEvent::Up) => Some(event),
            (current, _) => current,
        };
    }

    /// Check if both coordinates are known
    pub fn position(&self) -> Option<(i32, i32)> {
        self.mouse_x.zip(self.mouse_y)
    }

    /// Forget the last known position and any pending transition
    pub fn clear_position(&mut self) {
        self.mouse_x = None;
        self.mouse_y = None;
        self.mouse_event = None;
    }
}
