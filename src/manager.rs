//! Touch driver - single actor owning all translation state
//!
//! Every input to the driver (device attach results, event batches, retry
//! timers, queries) arrives as a `DriverMessage` on one ordered inbox and is
//! handled to completion before the next one. Nothing else mutates the state,
//! so no locking is needed.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

use crate::backend::CursorBackend;
use crate::config::DriverConfig;
use crate::device::{Connection, DeviceResolver, InputSource, ResolveOutcome, SourceId};
use crate::dispatcher::dispatch;
use crate::touch::calibration::CalibrationMatrix;
use crate::touch::simulator::{BatchShape, MouseSimulator};
use crate::touch::tracker::FingerTracker;
use crate::touch::types::RawEvent;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("Driver is not running")]
    Stopped,

    #[error("Failed to start driver: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostics snapshot returned by `stats()` once it exists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub batches_processed: u64,
    pub finger_count: u32,
}

/// Messages accepted by the driver
#[derive(Debug)]
pub enum DriverMessage {
    /// Scan for the configured device (initial kick and retry timer)
    Resolve,
    /// A connection opened outside the resolver
    Attached(Connection),
    /// The device behind this source went away
    Detached(SourceId),
    /// One frame of raw events
    Events { source: SourceId, events: Vec<RawEvent> },
    /// Diagnostics query
    Stats(Sender<Result<DriverStats, DriverError>>),
    /// Anything a foreign sender could not express otherwise
    Unknown(String),
    /// Stop the actor loop
    Shutdown,
}

/// Everything the driver knows
#[derive(Debug, Default)]
pub struct DriverState {
    /// Configured device name fragment
    pub requested_device: Option<String>,

    /// Attached device, if any
    pub connection: Option<Connection>,

    /// Per-slot finger state
    pub tracker: FingerTracker,

    /// Simulated pointer
    pub pointer: MouseSimulator,

    /// Raw-to-display transform (`None` = identity)
    pub calibration: Option<CalibrationMatrix>,

    /// Target display size (informational)
    pub screen_size: Option<(u32, u32)>,

    /// Batches accepted from the attached device
    pub batches_processed: u64,
}

impl DriverState {
    fn from_config(config: &DriverConfig) -> Self {
        Self {
            requested_device: config.device.clone(),
            calibration: config.calibration,
            screen_size: config.screen_size,
            ..Self::default()
        }
    }

    /// Check if a device is attached
    pub fn is_attached(&self) -> bool {
        self.connection.is_some()
    }
}

/// Touch driver actor
pub struct TouchDriver<S, B>
where
    S: InputSource + Send + 'static,
    B: CursorBackend + Send + 'static,
{
    state: DriverState,
    resolver: DeviceResolver<S>,
    backend: B,
    inbox: Receiver<DriverMessage>,
    sender: Sender<DriverMessage>,
    runtime: tokio::runtime::Runtime,
}

impl<S, B> TouchDriver<S, B>
where
    S: InputSource + Send + 'static,
    B: CursorBackend + Send + 'static,
{
    /// Create a driver. Nothing happens until `start()` or `spawn()`.
    pub fn new(config: DriverConfig, source: S, backend: B) -> Result<Self, DriverError> {
        let (sender, inbox) = unbounded();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("touch-io")
            .enable_all()
            .build()?;

        Ok(Self {
            state: DriverState::from_config(&config),
            resolver: DeviceResolver::new(source, config.retry),
            backend,
            inbox,
            sender,
            runtime,
        })
    }

    /// Queue the first device scan. Without a configured device the driver
    /// stays idle for good.
    pub fn start(&mut self) {
        info!("Starting touch driver...");
        if let Some((w, h)) = self.state.screen_size {
            info!("  Screen size: {}x{}", w, h);
        }
        if self.state.calibration.is_none() {
            info!("  No calibration, raw coordinates pass through");
        }

        match &self.state.requested_device {
            Some(device) => {
                info!("  Looking for device matching '{}'", device);
                let _ = self.sender.send(DriverMessage::Resolve);
            }
            None => {
                error!("No touch device configured, touch input will stay disabled");
            }
        }
    }

    /// Sender for posting messages to this driver
    pub fn sender(&self) -> Sender<DriverMessage> {
        self.sender.clone()
    }

    /// Current state
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Diagnostics query
    pub fn stats(&self) -> Result<DriverStats, DriverError> {
        Err(DriverError::NotImplemented("stats"))
    }

    /// Handle one message. Returns `false` once the driver should stop.
    pub fn handle_message(&mut self, message: DriverMessage) -> bool {
        match message {
            DriverMessage::Resolve => self.resolve(),
            DriverMessage::Attached(connection) => self.attach(connection),
            DriverMessage::Detached(source) => self.detach(source),
            DriverMessage::Events { source, events } => {
                if self.is_current(source) {
                    self.process_batch(&events);
                } else {
                    debug!("Ignoring {} events from unknown source {}", events.len(), source);
                }
            }
            DriverMessage::Stats(reply) => {
                let _ = reply.send(self.stats());
            }
            DriverMessage::Unknown(description) => {
                warn!("Unrecognized message: {}", description);
            }
            DriverMessage::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }
        true
    }

    /// Handle every message already queued, without blocking.
    ///
    /// Returns the number handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox.try_recv() {
            handled += 1;
            if !self.handle_message(message) {
                break;
            }
        }
        handled
    }

    /// Wait up to `timeout` for one message and handle it.
    ///
    /// Returns `false` if nothing arrived or the driver should stop.
    pub fn process_next(&mut self, timeout: Duration) -> bool {
        match self.inbox.recv_timeout(timeout) {
            Ok(message) => self.handle_message(message),
            Err(_) => false,
        }
    }

    /// Run the actor loop on the current thread until shutdown.
    pub fn run(mut self) {
        info!("Touch driver started");
        while let Ok(message) = self.inbox.recv() {
            if !self.handle_message(message) {
                break;
            }
        }
        info!("Touch driver stopped");
    }

    /// Start and move the driver onto its own thread.
    pub fn spawn(mut self) -> Result<DriverHandle, DriverError> {
        self.start();
        let sender = self.sender();
        let thread = thread::Builder::new()
            .name("touch-driver".to_string())
            .spawn(move || self.run())?;

        Ok(DriverHandle { sender, thread: Some(thread) })
    }

    fn is_current(&self, source: SourceId) -> bool {
        self.state.connection.as_ref().is_some_and(|c| c.id() == source)
    }

    fn resolve(&mut self) {
        if self.state.is_attached() {
            debug!("Already attached, ignoring resolve request");
            return;
        }
        let Some(fragment) = self.state.requested_device.clone() else {
            debug!("No device configured, ignoring resolve request");
            return;
        };

        match self.resolver.attempt(&fragment, &self.sender, self.runtime.handle()) {
            ResolveOutcome::Attached(connection) => self.attach(connection),
            ResolveOutcome::Retrying => {}
            ResolveOutcome::GaveUp => {
                error!("Touch input disabled, device '{}' never appeared", fragment);
            }
        }
    }

    fn attach(&mut self, connection: Connection) {
        if let Some(current) = &self.state.connection {
            warn!(
                "Already attached to {}, dropping connection to {}",
                current.device().path,
                connection.device().path
            );
            return;
        }

        info!("✓ Touch device ready: '{}' ({})", connection.device().name, connection.device().path);
        self.state.connection = Some(connection);
    }

    fn detach(&mut self, source: SourceId) {
        if !self.is_current(source) {
            debug!("Ignoring detach of unknown source {}", source);
            return;
        }

        if let Some(connection) = self.state.connection.take() {
            warn!("Touch device {} lost, searching again...", connection.device().path);
        }
        self.state.tracker.clear();
        self.state.pointer = MouseSimulator::default();
        let _ = self.sender.send(DriverMessage::Resolve);
    }

    fn process_batch(&mut self, events: &[RawEvent]) {
        let state = &mut self.state;
        let shape = state.pointer.reduce(&mut state.tracker, events);
        if shape == BatchShape::Pointer {
            trace!("batch of {} events -> {:?}", events.len(), state.pointer.mouse_event);
        }

        dispatch(&mut state.pointer, state.calibration.as_ref(), &self.backend);
        // A transition never carries over into the next batch
        state.pointer.mouse_event = None;
        state.batches_processed += 1;
    }
}

/// Handle to a driver running on its own thread
pub struct DriverHandle {
    sender: Sender<DriverMessage>,
    thread: Option<JoinHandle<()>>,
}

impl DriverHandle {
    /// Sender for posting messages to the driver
    pub fn sender(&self) -> Sender<DriverMessage> {
        self.sender.clone()
    }

    /// Diagnostics query, answered by the driver thread
    pub fn stats(&self) -> Result<DriverStats, DriverError> {
        let (reply, response) = bounded(1);
        self.sender
            .send(DriverMessage::Stats(reply))
            .map_err(|_| DriverError::Stopped)?;
        response
            .recv_timeout(Duration::from_secs(1))
            .map_err(|_| DriverError::Stopped)?
    }

    /// Check if the driver thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the driver and wait for its thread
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            info!("Stopping touch driver...");
            let _ = self.sender.send(DriverMessage::Shutdown);
            if thread.join().is_err() {
                warn!("Touch driver thread panicked");
            }
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
