//! Input device discovery and attachment
//!
//! This module provides:
//! - The `InputSource` capability (enumerate devices, attach to one)
//! - Name-based resolution with fixed-delay retry
//! - A Linux evdev source and a scripted mock source

pub mod resolver;
pub mod mock_source;
#[cfg(target_os = "linux")]
pub mod evdev_source;

pub use resolver::{DeviceResolver, ResolveOutcome, RetryPolicy};
pub use mock_source::MockInputSource;
#[cfg(target_os = "linux")]
pub use evdev_source::EvdevSource;

use crossbeam_channel::Sender;
use std::fmt;
use thiserror::Error;
use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

use crate::manager::DriverMessage;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to enumerate input devices: {0}")]
    Enumerate(String),

    #[error("Failed to open {path}: {reason}")]
    Open { path: String, reason: String },
}

/// Identifies one attachment; every event batch carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(Uuid);

impl SourceId {
    /// Fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One enumerated input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device node (e.g. `/dev/input/event0`)
    pub path: String,

    /// Name reported by the driver
    pub name: String,
}

impl DeviceInfo {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into() }
    }
}

/// Everything a source needs to start delivering batches
#[derive(Clone)]
pub struct AttachContext {
    /// Identifier to tag batches with
    pub source: SourceId,

    /// Driver inbox
    pub inbox: Sender<DriverMessage>,

    /// Runtime to spawn reader tasks on
    pub runtime: tokio::runtime::Handle,
}

/// Live attachment to an input device.
///
/// Dropping the connection stops its reader task.
#[derive(Debug)]
pub struct Connection {
    id: SourceId,
    device: DeviceInfo,
    _reader: Option<DropGuard>,
}

impl Connection {
    /// Connection without a reader task (events are injected by the caller)
    pub fn new(id: SourceId, device: DeviceInfo) -> Self {
        Self { id, device, _reader: None }
    }

    /// Connection whose reader stops when `cancel` fires
    pub fn with_reader(id: SourceId, device: DeviceInfo, cancel: CancellationToken) -> Self {
        Self { id, device, _reader: Some(cancel.drop_guard()) }
    }

    /// Identifier batches from this device carry
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Attached device
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }
}

/// Capability to list input devices and attach to one
pub trait InputSource {
    /// List currently available devices, in whatever order the system reports
    fn enumerate(&mut self) -> Result<Vec<DeviceInfo>, ResolveError>;

    /// Open a device and start delivering its batches to `ctx.inbox`
    fn attach(&mut self, device: &DeviceInfo, ctx: AttachContext) -> Result<Connection, ResolveError>;
}
