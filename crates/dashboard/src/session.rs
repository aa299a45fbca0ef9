//! Monitor session
//!
//! Connects the stream hooks to the router, the alert engine and the
//! presentation sink. One session tracks one bus for the life of the process.

use crate::sink::{Notification, PresentationSink};
use alerting::AlertEngine;
use message_router::{MessageRouter, RoutedUpdate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stream_client::FrameHandler;
use tracing::{debug, info, warn};

/// Frame counters, shared with the status API
#[derive(Debug, Default)]
pub struct FrameStats {
    received: AtomicU64,
    routed: AtomicU64,
}

impl FrameStats {
    /// Frames received since start
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Frames routed to the tracked bus
    pub fn routed(&self) -> u64 {
        self.routed.load(Ordering::Relaxed)
    }
}

/// Per-process monitoring state for the tracked bus
pub struct MonitorSession<S: PresentationSink> {
    router: MessageRouter,
    engine: AlertEngine,
    sink: S,
    stats: Arc<FrameStats>,
}

impl<S: PresentationSink> MonitorSession<S> {
    /// Create a session rendering into `sink`
    pub fn new(router: MessageRouter, sink: S) -> Self {
        info!("Monitoring bus {}", router.bus_id());
        Self {
            router,
            engine: AlertEngine::new(),
            sink,
            stats: Arc::new(FrameStats::default()),
        }
    }

    /// Frame counters of this session
    pub fn stats(&self) -> Arc<FrameStats> {
        Arc::clone(&self.stats)
    }

    /// Handle one raw frame; returns whether it reached the tracked bus
    pub fn handle_frame(&mut self, raw: &str) -> bool {
        self.stats.received.fetch_add(1, Ordering::Relaxed);
        match self.router.dispatch(raw) {
            Some(update) => {
                self.stats.routed.fetch_add(1, Ordering::Relaxed);
                self.apply(update);
                true
            }
            None => false,
        }
    }

    /// Render one routed update
    pub fn apply(&mut self, update: RoutedUpdate) {
        debug!("Applying {:?} update", update.source);
        self.sink.merge_snapshot(&update.snapshot);

        let outcome = self.engine.process(&update.alerts);
        self.sink.replace_banner(&outcome.banner);

        for request in outcome.notifications {
            let notification = Notification::capture(request);
            warn!("{} ({})", notification.message, notification.recorded_at);
            self.sink.notify(notification);
        }
    }
}

impl<S: PresentationSink> FrameHandler for MonitorSession<S> {
    fn on_open(&mut self) {
        info!("Live telemetry resumed");
        self.sink.connection_changed(true);
    }

    fn on_message(&mut self, frame: &str) {
        self.handle_frame(frame);
    }

    fn on_close(&mut self) {
        warn!("Telemetry link lost, displayed data is stale");
        self.sink.connection_changed(false);
    }
}

#[cfg(test)]
impl<S: PresentationSink> MonitorSession<S> {
    fn sink(&self) -> &S {
        &self.sink
    }

    fn edges(&self) -> alerting::EdgeState {
        self.engine.edges()
    }
}
