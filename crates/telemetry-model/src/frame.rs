//! Inbound Stream Frames

use crate::{AlertSet, FrameError, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A frame received on the event stream, keyed by its `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    /// Last known state of every bus, sent once after connecting
    Init {
        #[serde(default)]
        buses: HashMap<String, BusState>,
    },
    /// Periodic sensor reading
    Telemetry(BusUpdate),
    /// Discrete occurrence such as an accident onset
    Event(BusUpdate),
    /// Any frame type this client does not consume
    #[serde(other)]
    Unknown,
}

impl InboundFrame {
    /// Decode a raw text frame
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Catch-up state for one bus inside an `init` frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusState {
    #[serde(rename = "lastTelemetry", default)]
    pub last_telemetry: Option<Snapshot>,
    #[serde(default)]
    pub alerts: Option<AlertSet>,
}

/// Payload shared by `telemetry` and `event` frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusUpdate {
    #[serde(rename = "busId")]
    pub bus_id: String,
    pub data: Snapshot,
    #[serde(default)]
    pub alerts: Option<AlertSet>,
}
