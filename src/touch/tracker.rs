//! Per-slot finger tracking
//!
//! Folds raw events one at a time into the set of fingers currently on the
//! panel. Out-of-order input (an axis value before any slot exists, a lift
//! for an unknown slot) is ignored rather than reported.

use log::trace;
use std::collections::BTreeMap;

use crate::touch::types::{Finger, RawEvent};

/// Finger state for every active slot
#[derive(Debug, Clone, Default)]
pub struct FingerTracker {
    active_slot: i32,
    fingers: BTreeMap<i32, Finger>,
    touching: bool,
}

impl FingerTracker {
    /// Create an empty tracker (slot 0 addressed, nothing touching)
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw event into the tracked state.
    pub fn apply(&mut self, event: &RawEvent) {
        match *event {
            RawEvent::TrackingId(id) if id >= 0 => {
                self.fingers.entry(id).or_insert_with(|| Finger::new(id));
                self.active_slot = id;
                trace!("slot {} active ({} fingers)", id, self.fingers.len());
            }
            RawEvent::AxisX(x) => {
                if let Some(finger) = self.active_finger_mut() {
                    finger.x = Some(x);
                }
            }
            RawEvent::AxisY(y) => {
                if let Some(finger) = self.active_finger_mut() {
                    finger.y = Some(y);
                }
            }
            RawEvent::Touch(true) => {
                self.touching = true;
            }
            RawEvent::Touch(false) => {
                self.fingers.remove(&self.active_slot);
                self.touching = false;
                trace!("slot {} lifted ({} fingers)", self.active_slot, self.fingers.len());
            }
            _ => {}
        }
    }

    fn active_finger_mut(&mut self) -> Option<&mut Finger> {
        if self.fingers.is_empty() {
            return None;
        }
        self.fingers.get_mut(&self.active_slot)
    }

    /// Currently addressed slot
    pub fn active_slot(&self) -> i32 {
        self.active_slot
    }

    /// Look up a finger by slot id
    pub fn finger(&self, slot: i32) -> Option<&Finger> {
        self.fingers.get(&slot)
    }

    /// All tracked fingers, ordered by slot id
    pub fn fingers(&self) -> impl Iterator<Item = &Finger> {
        self.fingers.values()
    }

    /// Number of tracked fingers
    pub fn len(&self) -> usize {
        self.fingers.len()
    }

    /// Check if no finger is tracked
    pub fn is_empty(&self) -> bool {
        self.fingers.is_empty()
    }

    /// Check if at least one finger is down
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Forget every finger (device detached)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_id_creates_and_activates_slot() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::TrackingId(3));

        assert_eq!(tracker.active_slot(), 3);
        assert_eq!(tracker.finger(3), Some(&Finger::new(3)));

        // Re-announcing an existing slot keeps its position
        tracker.apply(&RawEvent::AxisX(40));
        tracker.apply(&RawEvent::TrackingId(3));
        assert_eq!(tracker.finger(3).unwrap().x, Some(40));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn negative_tracking_id_never_creates_a_slot() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::TrackingId(-1));
        assert!(tracker.is_empty());
        assert_eq!(tracker.active_slot(), 0);
    }

    #[test]
    fn axis_updates_active_slot_only() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::TrackingId(0));
        tracker.apply(&RawEvent::TrackingId(1));
        tracker.apply(&RawEvent::AxisX(10));
        tracker.apply(&RawEvent::AxisY(20));

        assert_eq!(tracker.finger(1), Some(&Finger { id: 1, x: Some(10), y: Some(20) }));
        assert_eq!(tracker.finger(0), Some(&Finger::new(0)));
    }

    #[test]
    fn axis_before_any_finger_is_ignored() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::AxisX(10));
        tracker.apply(&RawEvent::AxisY(20));
        assert!(tracker.is_empty());
    }

    #[test]
    fn touch_end_removes_active_slot() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::TrackingId(2));
        tracker.apply(&RawEvent::Touch(true));
        assert!(tracker.is_touching());

        tracker.apply(&RawEvent::Touch(false));
        assert!(!tracker.is_touching());
        assert!(tracker.finger(2).is_none());
    }

    #[test]
    fn unrelated_events_are_noops() {
        let mut tracker = FingerTracker::new();
        tracker.apply(&RawEvent::TrackingId(0));
        let before: Vec<Finger> = tracker.fingers().copied().collect();

        tracker.apply(&RawEvent::FingerCount(4));
        tracker.apply(&RawEvent::Other { kind: 3, code: 0x18, value: 9 });

        let after: Vec<Finger> = tracker.fingers().copied().collect();
        assert_eq!(before, after);
        assert_eq!(tracker.active_slot(), 0);
    }
}
