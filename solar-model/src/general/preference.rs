use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;

/// How generously the system should be sized relative to consumption.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "./results.ts")]
pub enum SizingPreference {
    /// Undersize to 80% of the computed need.
    Minimum,
    /// Size to the computed need; coverage is reported capped at 100%.
    #[default]
    Balanced,
    /// Oversize to 120% of the computed need.
    Maximum,
}

impl SizingPreference {
    /// Multiplier applied to the computed system size.
    pub fn multiplier(&self) -> f64 {
        match self {
            SizingPreference::Minimum => 0.8,
            SizingPreference::Balanced => 1.0,
            SizingPreference::Maximum => 1.2,
        }
    }

    /// Whether the coverage percentage is clamped to 100.
    pub fn caps_coverage(&self) -> bool {
        matches!(self, SizingPreference::Balanced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizingPreference::Minimum => "minimum",
            SizingPreference::Balanced => "balanced",
            SizingPreference::Maximum => "maximum",
        }
    }
}

impl fmt::Display for SizingPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizingPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimum" => Ok(SizingPreference::Minimum),
            "balanced" => Ok(SizingPreference::Balanced),
            "maximum" => Ok(SizingPreference::Maximum),
            other => Err(format!(
                "Invalid sizing preference: '{}'. Use minimum, balanced or maximum",
                other
            )),
        }
    }
}
