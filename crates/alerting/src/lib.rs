//! Alerting System
//!
//! Renders the alert banner for each update and raises one-shot
//! notifications on the rising edge of a hazard.

mod banner;
mod engine;

pub use banner::{BannerLine, BannerSeverity};
pub use engine::{AlertEngine, AlertOutcome, EdgeState, NotificationRequest};
