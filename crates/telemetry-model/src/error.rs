//! Frame Error Types

use thiserror::Error;

/// Errors raised while decoding an inbound stream frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Payload is not valid JSON or does not match any known frame shape
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
