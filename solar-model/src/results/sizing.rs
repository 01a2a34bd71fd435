use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Physical layout of the recommended photovoltaic system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./results.ts")]
pub struct SystemSizing {
    /// System size after the preference multiplier, before rounding to panels (kW)
    pub required_size_kw: f64,
    /// Whole panels needed; never rounded down
    pub number_of_panels: u32,
    /// `number_of_panels * panel power` (kW)
    pub installed_power_kw: f64,
    /// Roof footprint rounded to two decimals (m²)
    pub required_area_m2: f64,
}

/// Yearly environmental equivalents of the solar generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./results.ts")]
pub struct EnvironmentalImpact {
    /// CO₂ avoided per year, rounded up (kg)
    pub annual_co2_saved_kg: u32,
    /// Trees needed to absorb the same amount, rounded up
    pub tree_equivalents: u32,
}
