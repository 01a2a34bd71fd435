use tracing::warn;

use solar_model::general::location::TariffKey;
use solar_model::pricing::TariffRecord;

use crate::error::{CalcError, CalcResult};
use crate::sizing::config::CalculatorContext;

/// Bill for one month under a known tariff.
///
/// `(fixed + kWh * price) * (1 + municipality fee) * (1 + tax)`, unrounded.
pub fn bill_for_tariff(consumption_kwh: f64, tariff: &TariffRecord, tax_rate: f64) -> f64 {
    tariff.with_municipality_fee(consumption_kwh) * (1.0 + tax_rate)
}

/// Monthly bill for a consumption value, resolving the tariff from the context.
///
/// A missing tariff is reported as `MissingConfigData` instead of a zero bill.
pub fn compute_bill(
    consumption_kwh: f64,
    key: &TariffKey,
    ctx: &CalculatorContext,
) -> CalcResult<f64> {
    if !consumption_kwh.is_finite() || consumption_kwh < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "consumption must be a non-negative number, got {}",
            consumption_kwh
        )));
    }

    let tariff = ctx.tariff(key).inspect_err(|e| {
        warn!("Missing pricing data: {}", e);
    })?;

    Ok(bill_for_tariff(
        consumption_kwh,
        tariff,
        ctx.constants.tax_rate,
    ))
}

/// Bills for a series of monthly consumptions.
pub fn compute_bills(
    consumptions: &[f64],
    key: &TariffKey,
    ctx: &CalculatorContext,
) -> CalcResult<Vec<f64>> {
    consumptions
        .iter()
        .map(|&kwh| compute_bill(kwh, key, ctx))
        .collect()
}
