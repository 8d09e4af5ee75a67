//! Fixed-interval driver for change detection

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::scanner::ChangeDetector;
use crate::api::websocket::events::ReloadMessage;
use crate::api::websocket::registry::Registry;

/// Default pause between two scans
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Runs the detector on a fixed interval and broadcasts reloads.
///
/// Scans are synchronous filesystem walks, so the loop lives on its own OS
/// thread instead of a runtime worker.
pub struct WatchLoop<D> {
    detector: D,
    registry: Arc<Registry>,
    interval: Duration,
}

impl<D: ChangeDetector + 'static> WatchLoop<D> {
    pub fn new(detector: D, registry: Arc<Registry>, interval: Duration) -> Self {
        Self {
            detector,
            registry,
            interval,
        }
    }

    /// One scan-and-maybe-broadcast cycle. Returns whether a reload was sent.
    pub fn tick(&mut self) -> bool {
        if !self.detector.detect() {
            return false;
        }
        let report = self.registry.broadcast(&ReloadMessage::reload());
        info!(
            delivered = report.delivered,
            evicted = report.evicted,
            "reload sent"
        );
        true
    }

    /// Tick forever
    pub fn run(mut self) {
        debug!(interval_ms = self.interval.as_millis() as u64, "watch loop started");
        loop {
            self.tick();
            thread::sleep(self.interval);
        }
    }

    /// Start the loop on a dedicated thread
    pub fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("livewatch-scanner".to_string())
            .spawn(move || self.run())
    }
}
