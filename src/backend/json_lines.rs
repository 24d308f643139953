//! JSON lines cursor backend.
//!
//! Writes every cursor event as one JSON object per line, for hosts that
//! read the pointer stream from a pipe.

use log::trace;
use std::io::Write;
use std::sync::Mutex;

use crate::backend::{BackendError, CursorBackend, CursorEvent};

/// Backend serializing events to a writer, one line each
pub struct JsonLinesBackend<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesBackend<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> CursorBackend for JsonLinesBackend<W> {
    fn send_event(&self, event: &CursorEvent) -> Result<(), BackendError> {
        let line = serde_json::to_string(event)?;
        trace!("cursor event: {}", line);

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| BackendError::Operation(format!("writer poisoned: {e}")))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}
