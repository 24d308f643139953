//! Mock input source for testing.
//!
//! Serves a scripted device list and, once attached, lets the caller push
//! event batches into the driver as if they came from the device. Clones
//! share state, so a test can keep one handle while the driver owns another.

use crossbeam_channel::Sender;
use log::info;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::device::{AttachContext, Connection, DeviceInfo, InputSource, ResolveError, SourceId};
use crate::manager::DriverMessage;
use crate::touch::types::RawEvent;

#[derive(Clone, Debug, Default)]
pub struct MockInputSource {
    devices: Arc<Mutex<Vec<DeviceInfo>>>,
    attached: Arc<Mutex<Option<(SourceId, Sender<DriverMessage>)>>>,
    attach_count: Arc<AtomicUsize>,
    fail_attach: Arc<AtomicBool>,
}

impl MockInputSource {
    /// Source listing `devices`
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self { devices: Arc::new(Mutex::new(devices)), ..Self::default() }
    }

    /// Make a device appear
    pub fn add_device(&self, device: DeviceInfo) {
        if let Ok(mut devices) = self.devices.lock() {
            devices.push(device);
        }
    }

    /// Make every attach fail (simulates an open error)
    pub fn fail_attach(&self, fail: bool) {
        self.fail_attach.store(fail, Ordering::SeqCst);
    }

    /// Number of successful attaches
    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    /// Identifier of the current attachment
    pub fn attached_id(&self) -> Option<SourceId> {
        self.attached.lock().ok()?.as_ref().map(|(id, _)| *id)
    }

    /// Deliver one batch tagged with the current attachment.
    ///
    /// Returns `false` when nothing is attached or the driver is gone.
    pub fn inject(&self, events: Vec<RawEvent>) -> bool {
        let Ok(attached) = self.attached.lock() else { return false };
        match attached.as_ref() {
            Some((source, inbox)) => inbox.send(DriverMessage::Events { source: *source, events }).is_ok(),
            None => false,
        }
    }

    /// Report the device as lost
    pub fn unplug(&self) -> bool {
        let Ok(mut attached) = self.attached.lock() else { return false };
        match attached.take() {
            Some((source, inbox)) => inbox.send(DriverMessage::Detached(source)).is_ok(),
            None => false,
        }
    }
}

impl InputSource for MockInputSource {
    fn enumerate(&mut self) -> Result<Vec<DeviceInfo>, ResolveError> {
        self.devices
            .lock()
            .map(|devices| devices.clone())
            .map_err(|e| ResolveError::Enumerate(e.to_string()))
    }

    fn attach(&mut self, device: &DeviceInfo, ctx: AttachContext) -> Result<Connection, ResolveError> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(ResolveError::Open {
                path: device.path.clone(),
                reason: "mock attach failure".to_string(),
            });
        }

        info!("[MOCK SOURCE] Attached {} as {}", device.path, ctx.source);
        if let Ok(mut attached) = self.attached.lock() {
            *attached = Some((ctx.source, ctx.inbox));
        }
        self.attach_count.fetch_add(1, Ordering::SeqCst);
        Ok(Connection::new(ctx.source, device.clone()))
    }
}
