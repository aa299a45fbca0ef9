//! Event Stream Client
//!
//! Receive-only WebSocket subscriber for the telemetry backend:
//! - Explicit connection state machine
//! - Fixed-delay, never-ending reconnect with a single pending timer
//! - Endpoint derived from the hosting page URL

mod endpoint;
mod error;
mod manager;
mod state;
mod transport;

pub use endpoint::stream_endpoint;
pub use error::StreamError;
pub use manager::{ConnectionConfig, ConnectionManager, FrameHandler};
pub use state::{Action, ConnectionEvent, ConnectionMachine, ConnectionState};
pub use transport::{Connector, WsConnector};

/// Default delay before a reconnect attempt (milliseconds)
pub const RECONNECT_DELAY_MS: u64 = 3000;
