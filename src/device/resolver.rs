//! Device resolution with retry
//!
//! Finds the first enumerated device whose name contains the configured
//! fragment (case-sensitive) and attaches to it. When nothing matches, a
//! `Resolve` message is posted back to the driver after the retry delay.
//!
//! Enumeration order is whatever the system reports, so with several
//! matching devices the choice between them is not deterministic.

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};
use std::time::Duration;

use crate::device::{AttachContext, Connection, DeviceInfo, InputSource, SourceId};
use crate::manager::DriverMessage;
use crate::touch::constants::RESOLVE_RETRY_DELAY_MS;

/// When to try again after a failed resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the next attempt
    pub delay: Duration,

    /// Give up after this many attempts; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(RESOLVE_RETRY_DELAY_MS),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Check if another attempt is allowed after `attempts` failures
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

/// Result of one resolution attempt
#[derive(Debug)]
pub enum ResolveOutcome {
    /// Device found and opened
    Attached(Connection),
    /// Nothing usable yet, a retry is scheduled
    Retrying,
    /// Attempt cap reached, no retry scheduled
    GaveUp,
}

/// Scans an `InputSource` for the configured device
pub struct DeviceResolver<S: InputSource> {
    source: S,
    policy: RetryPolicy,
    attempts: u32,
}

impl<S: InputSource> DeviceResolver<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy, attempts: 0 }
    }

    /// First device whose name contains `fragment`
    pub fn find<'a>(devices: &'a [DeviceInfo], fragment: &str) -> Option<&'a DeviceInfo> {
        let mut matches = devices.iter().filter(|d| d.name.contains(fragment));
        let first = matches.next();
        let others = matches.count();
        if let Some(device) = first {
            if others > 0 {
                debug!("{} more devices match '{}', using {}", others, fragment, device.path);
            }
        }
        first
    }

    /// Scan once; attach on a match, otherwise schedule the next attempt.
    pub fn attempt(
        &mut self,
        fragment: &str,
        inbox: &Sender<DriverMessage>,
        runtime: &tokio::runtime::Handle,
    ) -> ResolveOutcome {
        self.attempts = self.attempts.saturating_add(1);
        debug!("Resolving device '{}' (attempt {})", fragment, self.attempts);

        match self.try_attach(fragment, inbox, runtime) {
            Some(connection) => {
                info!(
                    "✓ Attached to '{}' ({}) after {} attempt(s)",
                    connection.device().name,
                    connection.device().path,
                    self.attempts
                );
                self.attempts = 0;
                ResolveOutcome::Attached(connection)
            }
            None if self.policy.allows(self.attempts) => {
                self.schedule_retry(inbox, runtime);
                ResolveOutcome::Retrying
            }
            None => {
                error!("Giving up on device '{}' after {} attempts", fragment, self.attempts);
                ResolveOutcome::GaveUp
            }
        }
    }

    fn try_attach(
        &mut self,
        fragment: &str,
        inbox: &Sender<DriverMessage>,
        runtime: &tokio::runtime::Handle,
    ) -> Option<Connection> {
        let devices = match self.source.enumerate() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("{}, retrying in {:?}...", e, self.policy.delay);
                return None;
            }
        };

        let Some(device) = Self::find(&devices, fragment) else {
            warn!(
                "Device '{}' not found among {} input devices, retrying in {:?}...",
                fragment,
                devices.len(),
                self.policy.delay
            );
            return None;
        };

        let ctx = AttachContext {
            source: SourceId::new(),
            inbox: inbox.clone(),
            runtime: runtime.clone(),
        };
        match self.source.attach(device, ctx) {
            Ok(connection) => Some(connection),
            Err(e) => {
                warn!("{}, retrying in {:?}...", e, self.policy.delay);
                None
            }
        }
    }

    /// Post `Resolve` to the inbox once the retry delay has passed
    fn schedule_retry(&self, inbox: &Sender<DriverMessage>, runtime: &tokio::runtime::Handle) {
        let inbox = inbox.clone();
        let delay = self.policy.delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = inbox.send(DriverMessage::Resolve);
        });
    }

    /// Failed attempts since the last successful attach
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Access the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }
}
