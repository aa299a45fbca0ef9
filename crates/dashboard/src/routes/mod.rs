//! HTTP routes

pub mod dashboard;
pub mod notifications;
