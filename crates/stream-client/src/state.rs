//! Connection state machine
//!
//! Pure transition logic for the stream connection. The manager feeds it
//! events and performs the returned actions, which keeps the
//! single-transport and single-pending-reconnect rules checkable without I/O.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Lifecycle state of the stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    ReconnectPending,
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Request to establish the stream
    Connect,
    /// Transport opened
    Open,
    /// Frame received on the transport
    Message(String),
    /// Transport closed, errored, or failed to open
    Close,
    /// Reconnect timer elapsed
    TimerFire,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Drop any existing transport and dial a new one
    Connect,
    /// Invoke the open hook
    Opened,
    /// Hand a frame to the message hook
    Deliver(String),
    /// Drop the transport and invoke the close hook
    Closed,
    /// Arm the reconnect timer
    ScheduleReconnect(Duration),
}

/// Connection lifecycle state machine
#[derive(Debug)]
pub struct ConnectionMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
    /// Reconnects scheduled since creation
    reconnects: u64,
}

impl ConnectionMachine {
    /// Create a disconnected machine
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_delay,
            reconnects: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether a reconnect timer is armed
    pub fn reconnect_pending(&self) -> bool {
        self.state == ConnectionState::ReconnectPending
    }

    /// Number of reconnects scheduled so far
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    /// Apply an event and return the actions to perform, in order
    pub fn handle(&mut self, event: ConnectionEvent) -> Vec<Action> {
        use ConnectionEvent as E;
        use ConnectionState as S;

        match (self.state, event) {
            (S::Disconnected, E::Connect) | (S::ReconnectPending, E::TimerFire) => {
                self.state = S::Connecting;
                vec![Action::Connect]
            }
            (S::Connecting, E::Open) => {
                self.state = S::Connected;
                vec![Action::Opened]
            }
            (S::Connected, E::Message(frame)) => vec![Action::Deliver(frame)],
            (S::Connecting | S::Connected, E::Close) => {
                self.schedule_reconnect();
                vec![Action::Closed, Action::ScheduleReconnect(self.reconnect_delay)]
            }
            (S::Disconnected, E::Close) => {
                self.schedule_reconnect();
                vec![Action::ScheduleReconnect(self.reconnect_delay)]
            }
            (S::ReconnectPending, E::Close) => {
                debug!("Close while reconnect pending, nothing scheduled");
                Vec::new()
            }
            (state, event) => {
                debug!("Ignoring {:?} in state {:?}", event, state);
                Vec::new()
            }
        }
    }

    fn schedule_reconnect(&mut self) {
        self.state = ConnectionState::ReconnectPending;
        self.reconnects += 1;
        info!(
            "Stream disconnected, reconnecting in {}ms",
            self.reconnect_delay.as_millis()
        );
    }
}
