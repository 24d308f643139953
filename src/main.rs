//! Touch cursor driver - Main Application
//!
//! Attaches to the configured touch panel and writes the simulated pointer
//! stream to stdout as JSON lines, one cursor event per line.
//!
//! Usage: `touch-cursor [CONFIG]` (defaults to configs/default.toml).
//! Logs go to stderr; set RUST_LOG to change verbosity.

use anyhow::Context;
use touch_cursor::DriverConfig;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DriverConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => DriverConfig::load_default().context("loading configs/default.toml")?,
    };

    run(config)
}

#[cfg(target_os = "linux")]
fn run(config: DriverConfig) -> anyhow::Result<()> {
    use std::thread;
    use std::time::Duration;
    use touch_cursor::backend::get_stdout_backend;
    use touch_cursor::device::EvdevSource;
    use touch_cursor::TouchDriver;

    let driver = TouchDriver::new(config, EvdevSource::new(), get_stdout_backend())?;
    let handle = driver.spawn()?;

    // Keep the main thread alive while the driver runs
    while handle.is_running() {
        thread::sleep(Duration::from_secs(1));
    }

    log::info!("Driver stopped");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_config: DriverConfig) -> anyhow::Result<()> {
    anyhow::bail!("touch input is only supported on Linux (evdev)")
}
