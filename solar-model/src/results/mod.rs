pub mod finance;
pub mod sizing;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::general::preference::SizingPreference;
pub use finance::{CashflowPoint, CostComparison, FinancialSummary};
pub use sizing::{EnvironmentalImpact, SystemSizing};

/// Everything one calculation run produces.
///
/// Built once per submission and never mutated afterwards; the display and
/// chart adapters only read from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./results.ts")]
pub struct ResultSet {
    pub department: String,
    pub distributor: String,
    pub rate_type: String,
    pub sizing_preference: SizingPreference,

    /// Mean of the four readings supplied by the user (kWh)
    pub average_monthly_consumption: f64,
    /// Twelve months of consumption distributed from the average (kWh)
    pub realistic_monthly_consumptions: Vec<f64>,
    pub realistic_annual_consumption: f64,
    pub realistic_average_monthly_consumption: f64,

    pub sizing: SystemSizing,
    /// Coarse estimate from the annual irradiance average (kWh)
    pub annual_generation_estimate: f64,
    /// Month-by-month generation from the monthly irradiance table (kWh)
    pub realistic_monthly_generation: Vec<f64>,
    pub realistic_annual_generation: f64,
    pub coverage_percent: f64,
    pub environmental: EnvironmentalImpact,

    /// Sum of the twelve monthly bills without solar
    pub annual_electricity_cost: f64,
    pub cost_comparison: CostComparison,
    pub financial: FinancialSummary,
    pub cumulative_cashflow: Vec<CashflowPoint>,

    /// Per-year series over the system lifetime, for trend charts (kWh)
    pub annual_generation_trend: Vec<f64>,
    pub annual_consumption_trend: Vec<f64>,

    /// Non-fatal conditions met during the run (missing tariff data, ...)
    pub diagnostics: Vec<String>,
}

impl ResultSet {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
