//! Telemetry Data Model
//!
//! Types shared by the router, the alert engine and the dashboard:
//! - [`Snapshot`]: one partial set of sensor readings for a bus
//! - [`AlertSet`]: hazard flags that travel with a snapshot
//! - [`InboundFrame`]: the tagged frames received on the event stream

mod error;
mod frame;

pub use error::FrameError;
pub use frame::{BusState, BusUpdate, InboundFrame};

use serde::{Deserialize, Deserializer, Serialize};

/// Sensor readings reported by a bus
///
/// Every field is optional. An absent field means "no new reading" and must
/// never clear a value that is already displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ambient temperature (°C)
    #[serde(rename = "temp", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Relative humidity (%)
    #[serde(rename = "hum", default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Raw MQ-3 gas/alcohol sensor reading
    #[serde(rename = "mq3_raw", default, skip_serializing_if = "Option::is_none")]
    pub gas_raw: Option<f64>,
    /// Rollover/tilt angle (degrees)
    #[serde(rename = "tilt_deg", default, skip_serializing_if = "Option::is_none")]
    pub tilt_degrees: Option<f64>,
    /// Vehicle speed (km/h)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
}

impl Snapshot {
    /// Merge a newer snapshot into this one, field by field
    ///
    /// Fields present in `newer` overwrite; absent fields keep their value.
    pub fn merge_from(&mut self, newer: &Snapshot) {
        fn take(slot: &mut Option<f64>, value: Option<f64>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.temperature, newer.temperature);
        take(&mut self.humidity, newer.humidity);
        take(&mut self.gas_raw, newer.gas_raw);
        take(&mut self.tilt_degrees, newer.tilt_degrees);
        take(&mut self.speed_kmh, newer.speed_kmh);
    }
}

/// Hazard kinds a bus can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HazardKind {
    /// Crash or rollover
    Accident,
    /// Smoke or alcohol detected in the cabin
    SmokeOrAlcohol,
    /// Vehicle above the speed limit
    Speeding,
}

impl HazardKind {
    /// All kinds, in banner order
    pub const ALL: [HazardKind; 3] = [
        HazardKind::Accident,
        HazardKind::SmokeOrAlcohol,
        HazardKind::Speeding,
    ];
}

/// Hazard flags accompanying a snapshot
///
/// Each message carries the complete current truth; a missing or `null`
/// flag is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSet {
    #[serde(default, deserialize_with = "null_as_false")]
    pub accident: bool,
    #[serde(
        rename = "smoke_alcohol",
        alias = "smokeOrAlcohol",
        default,
        deserialize_with = "null_as_false"
    )]
    pub smoke_or_alcohol: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub speeding: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl AlertSet {
    /// Flag value for a hazard kind
    pub fn is_active(&self, kind: HazardKind) -> bool {
        match kind {
            HazardKind::Accident => self.accident,
            HazardKind::SmokeOrAlcohol => self.smoke_or_alcohol,
            HazardKind::Speeding => self.speeding,
        }
    }

    /// Active hazards, in banner order
    pub fn active(&self) -> impl Iterator<Item = HazardKind> + '_ {
        HazardKind::ALL.into_iter().filter(|kind| self.is_active(*kind))
    }

    /// Check if every flag is clear
    pub fn all_clear(&self) -> bool {
        self.active().next().is_none()
    }
}
