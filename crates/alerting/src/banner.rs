//! Alert banner lines

use serde::Serialize;
use telemetry_model::HazardKind;

/// Visual weight of a banner line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerSeverity {
    Normal,
    Warning,
    Critical,
}

/// One line of the alert banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BannerLine {
    /// Hazard the line reports, `None` for the all-clear line
    pub kind: Option<HazardKind>,
    pub severity: BannerSeverity,
    pub text: &'static str,
}

impl BannerLine {
    /// The line shown when no hazard is active
    pub const ALL_CLEAR: BannerLine = BannerLine {
        kind: None,
        severity: BannerSeverity::Normal,
        text: "All normal",
    };

    /// Line shown while a hazard is active
    pub fn for_hazard(kind: HazardKind) -> Self {
        let (severity, text) = match kind {
            HazardKind::Accident => (BannerSeverity::Critical, "ACCIDENT / ROLLOVER!"),
            HazardKind::SmokeOrAlcohol => (BannerSeverity::Warning, "Smoke or alcohol detected!"),
            HazardKind::Speeding => (BannerSeverity::Warning, "Excessive speed!"),
        };

        Self {
            kind: Some(kind),
            severity,
            text,
        }
    }

    /// Check if this is the all-clear line
    pub fn is_all_clear(&self) -> bool {
        self.kind.is_none()
    }
}
