use rand::Rng;

use crate::error::{CalcError, CalcResult};
use crate::general::consumption::DAYS_PER_MONTH;
use crate::general::round2;

pub const MONTHS: usize = 12;

/// Default month/year variation (±5%).
pub const DEFAULT_VARIATION: f64 = 0.05;

fn check_variation(variation: f64) -> CalcResult<()> {
    if !(0.0..1.0).contains(&variation) {
        return Err(CalcError::InvalidInput(format!(
            "variation must be within [0, 1), got {}",
            variation
        )));
    }
    Ok(())
}

fn check_amount(name: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// `count` random factors drawn uniformly from `[1 - variation, 1 + variation]`.
pub fn perturbation_factors<R: Rng + ?Sized>(count: usize, variation: f64, rng: &mut R) -> Vec<f64> {
    (0..count)
        .map(|_| 1.0 + rng.gen_range(-variation..=variation))
        .collect()
}

/// Split `values` into whole cents that add up to `total` rounded to cents.
///
/// Each value is floored to a cent; the cents still missing go to the values
/// with the largest remainders.
fn allocate_cents(values: &[f64], total: f64) -> Vec<f64> {
    let exact: Vec<f64> = values.iter().map(|value| value * 100.0).collect();
    let mut cents: Vec<f64> = exact.iter().map(|c| c.floor()).collect();

    let target = (total * 100.0).round();
    let missing = (target - cents.iter().sum::<f64>()).round().max(0.0) as usize;

    let mut by_remainder: Vec<usize> = (0..cents.len()).collect();
    by_remainder.sort_by(|&a, &b| (exact[b] - cents[b]).total_cmp(&(exact[a] - cents[a])));
    for &i in by_remainder.iter().cycle().take(missing) {
        cents[i] += 1.0;
    }

    cents.into_iter().map(|c| c / 100.0).collect()
}

/// Spread a yearly total over twelve months with random variation.
///
/// Each month starts at `total / 12`, is perturbed by a factor in
/// `[1 - variation, 1 + variation]`, and the twelve values are then rescaled
/// so they add back up to `total_annual`. Values are whole cents and their
/// sum equals `total_annual` rounded to cents.
pub fn distribute_annual<R: Rng + ?Sized>(
    total_annual: f64,
    variation: f64,
    rng: &mut R,
) -> CalcResult<Vec<f64>> {
    check_amount("annual total", total_annual)?;
    check_variation(variation)?;

    let base = total_annual / MONTHS as f64;
    let perturbed: Vec<f64> = perturbation_factors(MONTHS, variation, rng)
        .into_iter()
        .map(|factor| base * factor)
        .collect();

    let sum: f64 = perturbed.iter().sum();
    if sum == 0.0 {
        return Ok(vec![0.0; MONTHS]);
    }
    let scale = total_annual / sum;
    let scaled: Vec<f64> = perturbed.into_iter().map(|value| value * scale).collect();

    Ok(allocate_cents(&scaled, total_annual))
}

/// Month-by-month generation in kWh from monthly irradiance:
/// `panels * panel power * irradiance[i] * efficiency * days[i]`, rounded to cents.
pub fn monthly_generation(
    number_of_panels: u32,
    panel_power_kw: f64,
    efficiency: f64,
    monthly_irradiance: &[f64],
) -> CalcResult<Vec<f64>> {
    if monthly_irradiance.len() != MONTHS {
        return Err(CalcError::InvalidInput(format!(
            "monthly irradiance needs {} values, got {}",
            MONTHS,
            monthly_irradiance.len()
        )));
    }
    for value in monthly_irradiance {
        check_amount("monthly irradiance", *value)?;
    }

    let peak_kw = number_of_panels as f64 * panel_power_kw;
    Ok(monthly_irradiance
        .iter()
        .zip(DAYS_PER_MONTH.iter())
        .map(|(irradiance, days)| round2(peak_kw * irradiance * efficiency * *days as f64))
        .collect())
}

/// Independent year-over-year values around `base_annual`, for trend charts.
///
/// Unlike [`distribute_annual`] nothing is renormalized: each year is just
/// `base * factor`, rounded to cents.
pub fn distribute_annual_with_variation<R: Rng + ?Sized>(
    base_annual: f64,
    years: u32,
    variation: f64,
    rng: &mut R,
) -> CalcResult<Vec<f64>> {
    check_amount("annual base value", base_annual)?;
    check_variation(variation)?;

    Ok(perturbation_factors(years as usize, variation, rng)
        .into_iter()
        .map(|factor| round2(base_annual * factor))
        .collect())
}
