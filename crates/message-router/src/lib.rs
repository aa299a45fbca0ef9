//! Message Router
//!
//! Classifies inbound stream frames by type and target bus, and extracts the
//! snapshot/alert payload for the single tracked vehicle.

mod router;

pub use router::{MessageRouter, RoutedUpdate, UpdateSource};
