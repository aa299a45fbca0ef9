//! Connection Manager Implementation

use crate::state::{Action, ConnectionEvent, ConnectionMachine, ConnectionState};
use crate::transport::Connector;
use crate::RECONNECT_DELAY_MS;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tokio::time::Sleep;
use tracing::{info, warn};
use url::Url;

/// Connection manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Fixed delay before every reconnect attempt (default: 3000)
    pub reconnect_delay_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: RECONNECT_DELAY_MS,
        }
    }
}

impl ConnectionConfig {
    /// Reconnect delay as a duration
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// Stream lifecycle hooks
pub trait FrameHandler {
    /// Transport opened
    fn on_open(&mut self) {}

    /// Raw frame received
    fn on_message(&mut self, frame: &str);

    /// Transport lost or connect attempt failed
    fn on_close(&mut self) {}
}

/// Owns the stream transport and keeps it alive
///
/// At most one transport is live at a time and at most one reconnect timer
/// is armed. All work happens on the task that drives [`run`](Self::run).
pub struct ConnectionManager<C: Connector> {
    connector: C,
    endpoint: Url,
    machine: ConnectionMachine,
    transport: Option<C::Stream>,
    reconnect_timer: Option<Pin<Box<Sleep>>>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager for the given endpoint
    pub fn new(connector: C, endpoint: Url, config: ConnectionConfig) -> Self {
        info!(
            "Creating connection manager for {} (reconnect delay {}ms)",
            endpoint, config.reconnect_delay_ms
        );
        Self {
            connector,
            endpoint,
            machine: ConnectionMachine::new(config.reconnect_delay()),
            transport: None,
            reconnect_timer: None,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.machine.state()
    }

    /// Stream endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Number of reconnects scheduled so far
    pub fn reconnects(&self) -> u64 {
        self.machine.reconnects()
    }

    /// Whether a reconnect timer is armed
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_timer.is_some()
    }

    /// Request a connection; a no-op while one is live or pending
    pub fn connect<H: FrameHandler>(&mut self, handler: &mut H) {
        self.dispatch(ConnectionEvent::Connect, handler);
    }

    /// Feed an externally observed close into the state machine
    pub fn close<H: FrameHandler>(&mut self, handler: &mut H) {
        self.dispatch(ConnectionEvent::Close, handler);
    }

    /// Drive the connection forever
    pub async fn run<H: FrameHandler>(&mut self, handler: &mut H) {
        loop {
            self.step(handler).await;
        }
    }

    /// Wait for the next event and process it
    ///
    /// Dropping the returned future while a reconnect is pending keeps the
    /// armed timer; the next call waits out the remainder.
    pub async fn step<H: FrameHandler>(&mut self, handler: &mut H) -> ConnectionState {
        let event = self.next_event().await;
        self.dispatch(event, handler);
        self.machine.state()
    }

    async fn next_event(&mut self) -> ConnectionEvent {
        match self.machine.state() {
            ConnectionState::Disconnected => ConnectionEvent::Connect,
            ConnectionState::Connecting => {
                info!("Connecting to {}", self.endpoint);
                match self.connector.connect(&self.endpoint).await {
                    Ok(stream) => {
                        self.transport = Some(stream);
                        ConnectionEvent::Open
                    }
                    Err(e) => {
                        warn!("Connection attempt failed: {}", e);
                        ConnectionEvent::Close
                    }
                }
            }
            ConnectionState::Connected => {
                let Some(transport) = self.transport.as_mut() else {
                    return ConnectionEvent::Close;
                };
                match transport.next().await {
                    Some(Ok(frame)) => ConnectionEvent::Message(frame),
                    Some(Err(e)) => {
                        warn!("Stream error: {}", e);
                        ConnectionEvent::Close
                    }
                    None => {
                        info!("Stream closed by remote");
                        ConnectionEvent::Close
                    }
                }
            }
            ConnectionState::ReconnectPending => {
                if let Some(timer) = self.reconnect_timer.as_mut() {
                    timer.await;
                }
                self.reconnect_timer = None;
                ConnectionEvent::TimerFire
            }
        }
    }

    fn dispatch<H: FrameHandler>(&mut self, event: ConnectionEvent, handler: &mut H) {
        for action in self.machine.handle(event) {
            match action {
                Action::Connect => {
                    self.transport = None;
                }
                Action::Opened => {
                    info!("Stream connected: {}", self.endpoint);
                    handler.on_open();
                }
                Action::Deliver(frame) => handler.on_message(&frame),
                Action::Closed => {
                    self.transport = None;
                    handler.on_close();
                }
                Action::ScheduleReconnect(delay) => {
                    debug_assert!(self.reconnect_timer.is_none());
                    self.reconnect_timer = Some(Box::pin(tokio::time::sleep(delay)));
                }
            }
        }
    }
}
