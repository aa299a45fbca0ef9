//! Presentation sink and dashboard view model

use alerting::{BannerLine, NotificationRequest};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use telemetry_model::{HazardKind, Snapshot};
use tracing::info;
use uuid::Uuid;

/// Receives everything the monitor wants displayed
pub trait PresentationSink {
    /// Merge a partial snapshot into the displayed readings
    fn merge_snapshot(&mut self, snapshot: &Snapshot);

    /// Replace the alert banner wholesale
    fn replace_banner(&mut self, banner: &[BannerLine]);

    /// Show a notification until the operator dismisses it or a newer one
    /// of the same kind replaces it
    fn notify(&mut self, notification: Notification);

    /// Stream link went up or down
    fn connection_changed(&mut self, _connected: bool) {}
}

/// One-shot notification shown to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: HazardKind,
    pub message: &'static str,
    pub captured_at: DateTime<Utc>,
    /// Local capture time, as shown on screen
    pub recorded_at: String,
}

impl Notification {
    /// Stamp a notification request with the current time
    pub fn capture(request: NotificationRequest) -> Self {
        Self::stamped(request, Utc::now())
    }

    /// Stamp a notification request with the given time
    pub fn stamped(request: NotificationRequest, captured_at: DateTime<Utc>) -> Self {
        let recorded_at = format!(
            "Recorded at: {}",
            captured_at.with_timezone(&Local).format("%H:%M:%S")
        );
        Self {
            id: Uuid::new_v4(),
            kind: request.kind,
            message: request.message,
            captured_at,
            recorded_at,
        }
    }
}

/// Everything currently displayed for the tracked bus
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub bus_id: String,
    /// Stream link is up; readings are stale while `false`
    pub connected: bool,
    pub readings: Snapshot,
    pub banner: Vec<BannerLine>,
    /// Open notifications, at most one per kind, oldest first
    pub notifications: Vec<Notification>,
    pub last_update: Option<DateTime<Utc>>,
}

impl DashboardView {
    /// Create an empty view for a bus
    pub fn new(bus_id: impl Into<String>) -> Self {
        Self {
            bus_id: bus_id.into(),
            ..Default::default()
        }
    }

    /// Close an open notification
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        before != self.notifications.len()
    }
}

impl PresentationSink for DashboardView {
    fn merge_snapshot(&mut self, snapshot: &Snapshot) {
        self.readings.merge_from(snapshot);
        self.last_update = Some(Utc::now());
    }

    fn replace_banner(&mut self, banner: &[BannerLine]) {
        self.banner = banner.to_vec();
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.retain(|n| n.kind != notification.kind);
        self.notifications.push(notification);
    }

    fn connection_changed(&mut self, connected: bool) {
        self.connected = connected;
    }
}

/// Dashboard view shared with the HTTP status API
#[derive(Debug, Clone)]
pub struct SharedDashboard {
    inner: Arc<RwLock<DashboardView>>,
}

impl SharedDashboard {
    /// Create a shared view for a bus
    pub fn new(bus_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DashboardView::new(bus_id))),
        }
    }

    /// Copy of the current view
    pub fn view(&self) -> DashboardView {
        self.read().clone()
    }

    /// Close an open notification
    pub fn dismiss(&self, id: Uuid) -> bool {
        let dismissed = self.write().dismiss(id);
        if dismissed {
            info!("Notification {} dismissed", id);
        }
        dismissed
    }

    fn read(&self) -> RwLockReadGuard<'_, DashboardView> {
        match self.inner.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardView> {
        match self.inner.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl PresentationSink for SharedDashboard {
    fn merge_snapshot(&mut self, snapshot: &Snapshot) {
        self.write().merge_snapshot(snapshot);
    }

    fn replace_banner(&mut self, banner: &[BannerLine]) {
        self.write().replace_banner(banner);
    }

    fn notify(&mut self, notification: Notification) {
        self.write().notify(notification);
    }

    fn connection_changed(&mut self, connected: bool) {
        self.write().connection_changed(connected);
    }
}
