//! Mock cursor backend for testing.
//!
//! This backend logs cursor events instead of handing them to a real
//! presentation layer, and keeps a copy of everything it received so
//! tests can assert on the emitted stream.

use log::info;
use std::sync::{Arc, Mutex};

use crate::backend::{BackendError, CursorBackend, CursorEvent};

/// Mock cursor backend that logs and records events.
///
/// Clones share the same recording.
#[derive(Clone, Debug, Default)]
pub struct MockCursorBackend {
    events: Arc<Mutex<Vec<CursorEvent>>>,
}

impl MockCursorBackend {
    /// Create a new mock cursor backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<CursorEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Drain the recorded events.
    pub fn take_events(&self) -> Vec<CursorEvent> {
        self.events.lock().map(|mut events| std::mem::take(&mut *events)).unwrap_or_default()
    }
}

impl CursorBackend for MockCursorBackend {
    fn send_event(&self, event: &CursorEvent) -> Result<(), BackendError> {
        match event {
            CursorEvent::CursorButton { action, position, .. } => {
                info!("[MOCK CURSOR] Button {:?}: ({}, {})", action, position.0, position.1);
            }
            CursorEvent::CursorPos { position } => {
                info!("[MOCK CURSOR] Move: ({}, {})", position.0, position.1);
            }
        }
        self.events
            .lock()
            .map_err(|e| BackendError::Operation(format!("recording poisoned: {e}")))?
            .push(*event);
        Ok(())
    }
}
