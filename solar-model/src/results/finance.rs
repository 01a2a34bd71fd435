use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Annual electricity cost with and without the solar installation.
///
/// All three amounts are rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./results.ts")]
pub struct CostComparison {
    pub annual_cost_without_solar: f64,
    pub annual_cost_with_solar: f64,
    pub annual_savings: f64,
}

/// One point of the cumulative cashflow curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export, export_to = "./results.ts")]
pub struct CashflowPoint {
    pub year: u32,
    pub value: f64,
}

impl CashflowPoint {
    pub fn new(year: u32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Investment verdict of a calculation run.
///
/// Absent values mean "unavailable" (zero denominator, IRR did not
/// converge) and must never be displayed as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "./results.ts")]
pub struct FinancialSummary {
    pub investment_cost: f64,
    pub payback_years: Option<f64>,
    pub roi_percent: Option<f64>,
    /// Internal rate of return as a fraction (0.12 = 12%)
    pub irr: Option<f64>,
}
