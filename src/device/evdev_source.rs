//! Linux evdev input source
//!
//! Enumerates `/dev/input/event*` through the `evdev` crate and, once
//! attached, runs a reader task that groups events into one batch per
//! `SYN_REPORT` frame and posts each batch to the driver.

use crossbeam_channel::Sender;
use evdev::{Device, EventStream};
use log::{debug, info, trace, warn};
use tokio_util::sync::CancellationToken;

use crate::device::{AttachContext, Connection, DeviceInfo, InputSource, ResolveError, SourceId};
use crate::manager::DriverMessage;
use crate::touch::frame::FrameBatcher;

/// Input source backed by the kernel's evdev interface
#[derive(Debug, Clone, Copy, Default)]
pub struct EvdevSource;

impl EvdevSource {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for EvdevSource {
    fn enumerate(&mut self) -> Result<Vec<DeviceInfo>, ResolveError> {
        let devices: Vec<DeviceInfo> = evdev::enumerate()
            .map(|(path, device)| {
                DeviceInfo::new(path.display().to_string(), device.name().unwrap_or("Unknown"))
            })
            .collect();
        trace!("Enumerated {} input devices", devices.len());
        Ok(devices)
    }

    fn attach(&mut self, device: &DeviceInfo, ctx: AttachContext) -> Result<Connection, ResolveError> {
        let open_error = |e: std::io::Error| ResolveError::Open {
            path: device.path.clone(),
            reason: e.to_string(),
        };

        info!("Opening {} ({})", device.path, device.name);
        let handle = Device::open(&device.path).map_err(open_error)?;

        // The stream registers with the reactor, so it must be built inside the runtime
        let stream = {
            let _guard = ctx.runtime.enter();
            handle.into_event_stream().map_err(open_error)?
        };

        let cancel = CancellationToken::new();
        ctx.runtime.spawn(forward_batches(stream, ctx.source, ctx.inbox, cancel.clone()));

        Ok(Connection::with_reader(ctx.source, device.clone(), cancel))
    }
}

/// Read events until cancelled, posting one batch per frame.
async fn forward_batches(
    mut stream: EventStream,
    source: SourceId,
    inbox: Sender<DriverMessage>,
    cancel: CancellationToken,
) {
    debug!("Reader for {} started", source);
    let mut frames = FrameBatcher::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next_event() => match next {
                Ok(event) => {
                    let Some(events) = frames.push(event.event_type().0, event.code(), event.value()) else {
                        continue;
                    };
                    if inbox.send(DriverMessage::Events { source, events }).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Read error on {}: {}", source, e);
                    let _ = inbox.send(DriverMessage::Detached(source));
                    break;
                }
            }
        }
    }

    debug!("Reader for {} exited", source);
}
