//! Alert Engine Implementation

use crate::banner::BannerLine;
use telemetry_model::{AlertSet, HazardKind};
use tracing::{debug, info};

/// Announcement state of the one-shot hazards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeState {
    announced: [bool; HazardKind::ALL.len()],
}

impl EdgeState {
    /// Whether the current onset of `kind` has already been announced
    pub fn is_announced(&self, kind: HazardKind) -> bool {
        self.announced[kind as usize]
    }

    fn slot(&mut self, kind: HazardKind) -> &mut bool {
        &mut self.announced[kind as usize]
    }
}

/// Request to show a one-shot notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationRequest {
    pub kind: HazardKind,
    pub message: &'static str,
}

impl NotificationRequest {
    /// Notification for the onset of a hazard; `None` for display-only kinds
    pub fn for_hazard(kind: HazardKind) -> Option<Self> {
        let message = match kind {
            HazardKind::Accident => "ACCIDENT DETECTED!",
            HazardKind::SmokeOrAlcohol => "WARNING: SMOKE / ALCOHOL",
            HazardKind::Speeding => return None,
        };
        Some(Self { kind, message })
    }
}

/// Result of processing one alert set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOutcome {
    /// Banner lines replacing the current banner
    pub banner: Vec<BannerLine>,
    /// Notifications to raise for this update
    pub notifications: Vec<NotificationRequest>,
}

/// Edge-triggered alert engine
///
/// A one-shot hazard notifies once when it turns on and is re-armed only
/// after an update reports it off.
#[derive(Debug, Default)]
pub struct AlertEngine {
    edges: EdgeState,
}

impl AlertEngine {
    /// Create an engine with nothing announced
    pub fn new() -> Self {
        Self::default()
    }

    /// Current announcement state
    pub fn edges(&self) -> EdgeState {
        self.edges
    }

    /// Process the hazard flags of one routed update
    pub fn process(&mut self, alerts: &AlertSet) -> AlertOutcome {
        let banner = if alerts.all_clear() {
            vec![BannerLine::ALL_CLEAR]
        } else {
            alerts.active().map(BannerLine::for_hazard).collect()
        };

        let mut notifications = Vec::new();
        for kind in HazardKind::ALL {
            let Some(request) = NotificationRequest::for_hazard(kind) else {
                continue;
            };
            let announced = self.edges.slot(kind);

            if !alerts.is_active(kind) {
                if *announced {
                    debug!("{:?} cleared, re-arming notification", kind);
                }
                *announced = false;
            } else if !*announced {
                *announced = true;
                info!("Hazard onset: {:?}", kind);
                notifications.push(request);
            }
        }

        AlertOutcome {
            banner,
            notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn accident(on: bool) -> AlertSet {
        AlertSet {
            accident: on,
            ..Default::default()
        }
    }

    fn count_notifications(engine: &mut AlertEngine, sequence: &[AlertSet]) -> Vec<usize> {
        sequence
            .iter()
            .enumerate()
            .filter(|(_, alerts)| !engine.process(alerts).notifications.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_exactly_once_per_onset() {
        let mut engine = AlertEngine::new();
        let sequence = [accident(false), accident(true), accident(true), accident(true)];

        assert_eq!(count_notifications(&mut engine, &sequence), vec![1]);
    }

    #[test]
    fn test_rearm_after_clear() {
        let mut engine = AlertEngine::new();
        let sequence = [accident(true), accident(false), accident(true)];

        assert_eq!(count_notifications(&mut engine, &sequence), vec![0, 2]);
    }

    #[test]
    fn test_notification_messages() {
        let mut engine = AlertEngine::new();
        let outcome = engine.process(&AlertSet {
            accident: true,
            smoke_or_alcohol: true,
            speeding: true,
        });

        assert_eq!(
            outcome.notifications,
            vec![
                NotificationRequest {
                    kind: HazardKind::Accident,
                    message: "ACCIDENT DETECTED!",
                },
                NotificationRequest {
                    kind: HazardKind::SmokeOrAlcohol,
                    message: "WARNING: SMOKE / ALCOHOL",
                },
            ]
        );
        let edges = engine.edges();
        assert!(edges.is_announced(HazardKind::Accident));
        assert!(edges.is_announced(HazardKind::SmokeOrAlcohol));
        assert!(!edges.is_announced(HazardKind::Speeding));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut engine = AlertEngine::new();
        engine.process(&accident(true));

        let outcome = engine.process(&AlertSet {
            accident: true,
            smoke_or_alcohol: true,
            speeding: false,
        });
        assert_eq!(outcome.notifications.len(), 1);
        assert_eq!(outcome.notifications[0].kind, HazardKind::SmokeOrAlcohol);
    }

    #[test]
    fn test_banner_order_and_all_clear() {
        let mut engine = AlertEngine::new();

        let outcome = engine.process(&AlertSet::default());
        assert_eq!(outcome.banner, vec![BannerLine::ALL_CLEAR]);

        let outcome = engine.process(&AlertSet {
            accident: true,
            smoke_or_alcohol: true,
            speeding: true,
        });
        let kinds: Vec<_> = outcome.banner.iter().map(|line| line.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(HazardKind::Accident),
                Some(HazardKind::SmokeOrAlcohol),
                Some(HazardKind::Speeding),
            ]
        );
    }

    #[test]
    fn test_display_only_kind_has_no_notification() {
        assert!(NotificationRequest::for_hazard(HazardKind::Speeding).is_none());
        assert!(NotificationRequest::for_hazard(HazardKind::Accident).is_some());
    }

    fn alert_set() -> impl Strategy<Value = AlertSet> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(accident, smoke_or_alcohol, speeding)| AlertSet {
                accident,
                smoke_or_alcohol,
                speeding,
            },
        )
    }

    proptest! {
        #[test]
        fn all_clear_sequences_never_notify(len in 0usize..64) {
            let mut engine = AlertEngine::new();
            for _ in 0..len {
                let outcome = engine.process(&AlertSet::default());
                prop_assert!(outcome.notifications.is_empty());
                prop_assert_eq!(engine.edges(), EdgeState::default());
            }
        }

        #[test]
        fn speeding_never_notifies(flags in prop::collection::vec(any::<bool>(), 1..64)) {
            let mut engine = AlertEngine::new();
            for speeding in flags {
                let outcome = engine.process(&AlertSet { speeding, ..Default::default() });
                prop_assert!(outcome.notifications.is_empty());
                let shown = outcome.banner.iter().any(|l| l.kind == Some(HazardKind::Speeding));
                prop_assert_eq!(shown, speeding);
            }
        }

        #[test]
        fn banner_all_clear_is_exclusive(alerts in alert_set()) {
            let outcome = AlertEngine::new().process(&alerts);
            let has_all_clear = outcome.banner.iter().any(BannerLine::is_all_clear);

            if alerts.all_clear() {
                prop_assert_eq!(outcome.banner, vec![BannerLine::ALL_CLEAR]);
            } else {
                prop_assert!(!has_all_clear);
                prop_assert_eq!(outcome.banner.len(), alerts.active().count());
            }
        }

        #[test]
        fn notifies_only_on_rising_edge(sequence in prop::collection::vec(alert_set(), 1..64)) {
            let mut engine = AlertEngine::new();
            let mut previous = AlertSet::default();
            for alerts in &sequence {
                let outcome = engine.process(alerts);
                for kind in [HazardKind::Accident, HazardKind::SmokeOrAlcohol] {
                    let rising = alerts.is_active(kind) && !previous.is_active(kind);
                    let fired = outcome.notifications.iter().any(|n| n.kind == kind);
                    prop_assert_eq!(fired, rising);
                }
                previous = *alerts;
            }
        }
    }
}
