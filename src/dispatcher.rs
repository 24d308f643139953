//! Dispatcher - turns a pointer transition into an outbound cursor event
//!
//! Runs once per reduced batch. A release always forgets the last known
//! position so a stale coordinate cannot leak into the next touch; a press
//! or move keeps it so a press-then-move sequence can reuse it.

use log::{debug, warn};

use crate::backend::{CursorBackend, CursorEvent};
use crate::touch::calibration::{project, CalibrationMatrix};
use crate::touch::simulator::{MouseEvent, MouseSimulator};

/// Emit at most one cursor event for the pending transition.
///
/// Returns the event handed to the backend, if any. A backend failure is
/// logged and the state is still advanced as if the event went out.
pub fn dispatch<B: CursorBackend>(
    pointer: &mut MouseSimulator,
    calibration: Option<&CalibrationMatrix>,
    backend: &B,
) -> Option<CursorEvent> {
    let position = pointer
        .position()
        .map(|(x, y)| project(f64::from(x), f64::from(y), calibration));

    let event = match (pointer.mouse_event, position) {
        (Some(MouseEvent::Down), Some(position)) => {
            pointer.mouse_event = None;
            CursorEvent::press(position)
        }
        (Some(MouseEvent::Up), Some(position)) => {
            pointer.clear_position();
            CursorEvent::release(position)
        }
        (Some(MouseEvent::Up), None) => {
            debug!("release without a known position, clearing pointer state");
            pointer.clear_position();
            return None;
        }
        (Some(MouseEvent::Move), Some(position)) => {
            pointer.mouse_event = None;
            CursorEvent::move_to(position)
        }
        (Some(transition), None) => {
            debug!("{:?} without a known position, nothing to emit", transition);
            return None;
        }
        (None, _) => return None,
    };

    if let Err(e) = backend.send_event(&event) {
        warn!("Failed to deliver cursor event {:?}: {}", event, e);
    }
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockCursorBackend;

    fn pointer(event: Option<MouseEvent>, x: Option<i32>, y: Option<i32>) -> MouseSimulator {
        MouseSimulator { finger_count: 0, mouse_x: x, mouse_y: y, mouse_event: event }
    }

    #[test]
    fn down_emits_press_and_keeps_position() {
        let backend = MockCursorBackend::new();
        let mut p = pointer(Some(MouseEvent::Down), Some(10), Some(20));

        assert_eq!(dispatch(&mut p, None, &backend), Some(CursorEvent::press((10.0, 20.0))));
        assert_eq!(p, pointer(None, Some(10), Some(20)));
        assert_eq!(backend.events(), vec![CursorEvent::press((10.0, 20.0))]);
    }

    #[test]
    fn up_emits_release_and_clears_position() {
        let backend = MockCursorBackend::new();
        let mut p = pointer(Some(MouseEvent::Up), Some(10), Some(20));

        assert_eq!(dispatch(&mut p, None, &backend), Some(CursorEvent::release((10.0, 20.0))));
        assert_eq!(p, pointer(None, None, None));
    }

    #[test]
    fn up_without_position_still_clears() {
        let backend = MockCursorBackend::new();
        let mut p = pointer(Some(MouseEvent::Up), Some(10), None);

        assert_eq!(dispatch(&mut p, None, &backend), None);
        assert_eq!(p, pointer(None, None, None));
        assert!(backend.events().is_empty());
    }

    #[test]
    fn move_emits_projected_position() {
        let backend = MockCursorBackend::new();
        let matrix = CalibrationMatrix::new(2.0, 0.0, 1.0, 0.0, 0.5, -1.0).unwrap();
        let mut p = pointer(Some(MouseEvent::Move), Some(10), Some(20));

        assert_eq!(dispatch(&mut p, Some(&matrix), &backend), Some(CursorEvent::move_to((21.0, 9.0))));
        assert_eq!(p, pointer(None, Some(10), Some(20)));
    }

    #[test]
    fn down_or_move_without_position_leaves_state() {
        let backend = MockCursorBackend::new();
        for transition in [MouseEvent::Down, MouseEvent::Move] {
            let mut p = pointer(Some(transition), None, Some(5));
            assert_eq!(dispatch(&mut p, None, &backend), None);
            assert_eq!(p, pointer(Some(transition), None, Some(5)));
        }
        assert!(backend.events().is_empty());
    }

    #[test]
    fn nothing_pending_is_a_noop() {
        let backend = MockCursorBackend::new();
        let mut p = pointer(None, Some(1), Some(2));
        assert_eq!(dispatch(&mut p, None, &backend), None);
        assert_eq!(p, pointer(None, Some(1), Some(2)));
    }
}
