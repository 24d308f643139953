//! Backend abstraction for the host presentation layer
//!
//! This module provides a unified interface for handing cursor events to
//! whatever consumes the simulated pointer (a UI toolkit, a compositor
//! bridge, a log).

pub mod json_lines;
pub mod mock_cursor;

pub use json_lines::JsonLinesBackend;
pub use mock_cursor::MockCursorBackend;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend operation failed: {0}")]
    Operation(String),

    #[error("Failed to encode cursor event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write cursor event: {0}")]
    Io(#[from] std::io::Error),
}

/// Pointer buttons the simulator can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Primary,
}

/// Button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Press,
    Release,
}

/// Keyboard modifiers held during a button event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };
}

/// One outbound event for the host presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CursorEvent {
    CursorButton {
        button: MouseButton,
        action: ButtonAction,
        modifiers: Modifiers,
        position: (f64, f64),
    },
    CursorPos {
        position: (f64, f64),
    },
}

impl CursorEvent {
    /// Primary button pressed at `position`
    pub fn press(position: (f64, f64)) -> Self {
        CursorEvent::CursorButton {
            button: MouseButton::Primary,
            action: ButtonAction::Press,
            modifiers: Modifiers::NONE,
            position,
        }
    }

    /// Primary button released at `position`
    pub fn release(position: (f64, f64)) -> Self {
        CursorEvent::CursorButton {
            button: MouseButton::Primary,
            action: ButtonAction::Release,
            modifiers: Modifiers::NONE,
            position,
        }
    }

    /// Pointer moved to `position`
    pub fn move_to(position: (f64, f64)) -> Self {
        CursorEvent::CursorPos { position }
    }

    /// Position carried by the event
    pub fn position(&self) -> (f64, f64) {
        match *self {
            CursorEvent::CursorButton { position, .. } | CursorEvent::CursorPos { position } => position,
        }
    }
}

/// Unified backend interface for cursor output
pub trait CursorBackend {
    /// Deliver one cursor event
    fn send_event(&self, event: &CursorEvent) -> Result<(), BackendError>;

    /// Press the primary button at a position
    fn press(&self, position: (f64, f64)) -> Result<(), BackendError> {
        self.send_event(&CursorEvent::press(position))
    }

    /// Release the primary button at a position
    fn release(&self, position: (f64, f64)) -> Result<(), BackendError> {
        self.send_event(&CursorEvent::release(position))
    }

    /// Move the pointer to a position
    fn move_to(&self, position: (f64, f64)) -> Result<(), BackendError> {
        self.send_event(&CursorEvent::move_to(position))
    }
}

/// Get a backend writing JSON lines to stdout
pub fn get_stdout_backend() -> JsonLinesBackend<std::io::Stdout> {
    JsonLinesBackend::new(std::io::stdout())
}
