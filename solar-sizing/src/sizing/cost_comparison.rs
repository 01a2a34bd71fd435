use tracing::debug;

use solar_model::general::location::TariffKey;
use solar_model::results::CostComparison;

use crate::error::{CalcError, CalcResult};
use crate::general::bill::compute_bills;
use crate::general::round2;
use crate::sizing::config::CalculatorContext;
use crate::sizing::seasonal_profile::MONTHS;

/// Consumption left to buy from the grid each month. Surplus generation is
/// not credited, so a month never goes below zero.
pub fn net_monthly_consumption(consumptions: &[f64], generation: &[f64]) -> Vec<f64> {
    consumptions
        .iter()
        .zip(generation.iter())
        .map(|(consumption, generated)| (consumption - generated).max(0.0))
        .collect()
}

/// Yearly cost without solar, with solar, and the difference.
///
/// Both series must hold twelve months; anything else is `InvalidInput`.
/// A missing tariff surfaces as `MissingConfigData`.
pub fn compare_annual_cost(
    monthly_consumptions: &[f64],
    key: &TariffKey,
    monthly_generation: &[f64],
    ctx: &CalculatorContext,
) -> CalcResult<CostComparison> {
    if monthly_consumptions.len() != MONTHS || monthly_generation.len() != MONTHS {
        return Err(CalcError::InvalidInput(format!(
            "cost comparison needs {} months of consumption and generation, got {} and {}",
            MONTHS,
            monthly_consumptions.len(),
            monthly_generation.len()
        )));
    }

    let without_solar: f64 = compute_bills(monthly_consumptions, key, ctx)?.iter().sum();

    let net = net_monthly_consumption(monthly_consumptions, monthly_generation);
    let with_solar: f64 = compute_bills(&net, key, ctx)?.iter().sum();

    let savings = without_solar - with_solar;
    debug!(
        "Annual cost without solar {:.2}, with solar {:.2}, savings {:.2}",
        without_solar, with_solar, savings
    );

    Ok(CostComparison {
        annual_cost_without_solar: round2(without_solar),
        annual_cost_with_solar: round2(with_solar),
        annual_savings: round2(savings),
    })
}
