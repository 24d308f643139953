//! Frame grouping
//!
//! The kernel delivers input as a flat stream of `(type, code, value)`
//! triples with `SYN_REPORT` marking the end of each frame. `FrameBatcher`
//! turns that stream into one `RawEvent` batch per frame.

use log::{trace, warn};

use crate::touch::constants::{EV_SYN, SYN_DROPPED, SYN_REPORT};
use crate::touch::types::RawEvent;

/// Accumulates raw events until a frame is complete
#[derive(Debug, Default)]
pub struct FrameBatcher {
    pending: Vec<RawEvent>,
    dropping: bool,
}

impl FrameBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw triple. Returns the finished batch when it closes a
    /// non-empty frame.
    pub fn push(&mut self, kind: u16, code: u16, value: i32) -> Option<Vec<RawEvent>> {
        if kind != EV_SYN {
            if !self.dropping {
                self.pending.push(RawEvent::from_raw(kind, code, value));
            }
            return None;
        }

        match code {
            SYN_REPORT if self.dropping => {
                // Frame after an overrun is incomplete, resume with the next one
                self.dropping = false;
                self.pending.clear();
                None
            }
            SYN_REPORT if self.pending.is_empty() => None,
            SYN_REPORT => Some(std::mem::take(&mut self.pending)),
            SYN_DROPPED => {
                warn!("Input buffer overrun, discarding {} events", self.pending.len());
                self.pending.clear();
                self.dropping = true;
                None
            }
            other => {
                trace!("Ignoring SYN code {:#x}", other);
                None
            }
        }
    }

    /// Number of events waiting for the end of the frame
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
