//! Frame Router Implementation

use telemetry_model::{AlertSet, BusUpdate, InboundFrame, Snapshot};
use tracing::{debug, warn};

/// Which frame type produced an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// Catch-up state from an `init` frame
    Init,
    /// Periodic `telemetry` frame
    Telemetry,
    /// Asynchronous `event` frame
    Event,
}

/// Snapshot and hazard flags for the tracked bus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedUpdate {
    pub source: UpdateSource,
    pub snapshot: Snapshot,
    pub alerts: AlertSet,
}

/// Routes frames addressed to one tracked bus
pub struct MessageRouter {
    /// Identifier of the tracked bus
    bus_id: String,
}

impl MessageRouter {
    /// Create a router for the given bus identifier
    pub fn new(bus_id: impl Into<String>) -> Self {
        Self {
            bus_id: bus_id.into(),
        }
    }

    /// Identifier of the tracked bus
    pub fn bus_id(&self) -> &str {
        &self.bus_id
    }

    /// Decode and route one raw frame
    ///
    /// Malformed frames are logged and dropped; they never surface as errors.
    pub fn dispatch(&self, raw: &str) -> Option<RoutedUpdate> {
        match InboundFrame::parse(raw) {
            Ok(frame) => self.route(frame),
            Err(e) => {
                warn!("Dropping frame: {}", e);
                None
            }
        }
    }

    /// Route an already decoded frame
    pub fn route(&self, frame: InboundFrame) -> Option<RoutedUpdate> {
        match frame {
            InboundFrame::Init { mut buses } => {
                let state = buses.remove(&self.bus_id)?;
                let snapshot = state.last_telemetry?;
                debug!("Catch-up state for {}", self.bus_id);
                Some(RoutedUpdate {
                    source: UpdateSource::Init,
                    snapshot,
                    alerts: state.alerts.unwrap_or_default(),
                })
            }
            InboundFrame::Telemetry(update) => self.route_update(UpdateSource::Telemetry, update),
            InboundFrame::Event(update) => self.route_update(UpdateSource::Event, update),
            InboundFrame::Unknown => None,
        }
    }

    fn route_update(&self, source: UpdateSource, update: BusUpdate) -> Option<RoutedUpdate> {
        if update.bus_id != self.bus_id {
            debug!("Ignoring {:?} frame for {}", source, update.bus_id);
            return None;
        }

        Some(RoutedUpdate {
            source,
            snapshot: update.data,
            alerts: update.alerts.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> MessageRouter {
        MessageRouter::new("bus01")
    }

    #[test]
    fn test_telemetry_for_tracked_bus() {
        let update = router()
            .dispatch(r#"{"type":"telemetry","busId":"bus01","data":{"speed_kmh":61},"alerts":{"speeding":true}}"#)
            .unwrap();

        assert_eq!(update.source, UpdateSource::Telemetry);
        assert_eq!(update.snapshot.speed_kmh, Some(61.0));
        assert!(update.alerts.speeding);
    }

    #[test]
    fn test_other_bus_is_filtered() {
        let routed = router()
            .dispatch(r#"{"type":"telemetry","busId":"bus02","data":{"temp":30},"alerts":{"accident":true}}"#);
        assert!(routed.is_none());

        let routed =
            router().dispatch(r#"{"type":"event","busId":"bus02","data":{},"alerts":{"accident":true}}"#);
        assert!(routed.is_none());
    }

    #[test]
    fn test_event_defaults_alerts() {
        let update = router()
            .dispatch(r#"{"type":"event","busId":"bus01","data":{"temp":36}}"#)
            .unwrap();

        assert_eq!(update.source, UpdateSource::Event);
        assert_eq!(update.snapshot.temperature, Some(36.0));
        assert_eq!(update.alerts, AlertSet::default());
    }

    #[test]
    fn test_null_flags_do_not_drop_frame() {
        let update = router()
            .dispatch(r#"{"type":"event","busId":"bus01","data":{"temp":36},"alerts":{"accident":true,"smoke_alcohol":null}}"#)
            .unwrap();

        assert_eq!(update.snapshot.temperature, Some(36.0));
        assert!(update.alerts.accident);
        assert!(!update.alerts.smoke_or_alcohol);
    }

    #[test]
    fn test_init_catch_up() {
        let update = router()
            .dispatch(
                r#"{"type":"init","buses":{"bus01":{"lastTelemetry":{"hum":55}},"bus02":{"lastTelemetry":{"hum":10}}}}"#,
            )
            .unwrap();

        assert_eq!(update.source, UpdateSource::Init);
        assert_eq!(update.snapshot.humidity, Some(55.0));
        assert_eq!(update.alerts, AlertSet::default());
    }

    #[test]
    fn test_init_without_tracked_telemetry() {
        assert!(router()
            .dispatch(r#"{"type":"init","buses":{"bus02":{"lastTelemetry":{"hum":10}}}}"#)
            .is_none());
        assert!(router()
            .dispatch(r#"{"type":"init","buses":{"bus01":{"alerts":{"accident":true}}}}"#)
            .is_none());
    }

    #[test]
    fn test_unknown_and_malformed_dropped() {
        assert!(router().dispatch(r#"{"type":"status","busId":"bus01"}"#).is_none());
        assert!(router().dispatch("{broken").is_none());
        assert!(router().dispatch("").is_none());
    }
}
