use tracing::debug;

use solar_model::general::preference::SizingPreference;
use solar_model::results::{EnvironmentalImpact, SystemSizing};

use crate::error::{CalcError, CalcResult};
use crate::general::round2;
use crate::sizing::config::SystemConstants;

const DAYS_PER_YEAR: f64 = 365.0;

/// Unadjusted system size in kW needed to cover the yearly consumption:
/// `(avg * 12) / (irradiance * 365 * efficiency)`.
pub fn required_system_size_kw(
    average_monthly_consumption: f64,
    annual_irradiance: f64,
    constants: &SystemConstants,
) -> CalcResult<f64> {
    if !annual_irradiance.is_finite() || annual_irradiance < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "annual irradiance must be a non-negative number, got {}",
            annual_irradiance
        )));
    }
    let yearly_yield_per_kw = annual_irradiance * DAYS_PER_YEAR * constants.system_efficiency;
    if yearly_yield_per_kw == 0.0 {
        return Err(CalcError::DivisionByZero("system size with zero irradiance"));
    }
    Ok(average_monthly_consumption * 12.0 / yearly_yield_per_kw)
}

/// Scale a computed size by the preference multiplier.
pub fn apply_preference(size_kw: f64, preference: SizingPreference) -> f64 {
    size_kw * preference.multiplier()
}

/// Whole panels needed for `size_kw`; always rounds up.
pub fn number_of_panels(size_kw: f64, constants: &SystemConstants) -> CalcResult<u32> {
    if !size_kw.is_finite() || size_kw < 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "system size must be a non-negative number, got {}",
            size_kw
        )));
    }
    let panels = (size_kw / constants.panel_power_kw).ceil();
    if panels > u32::MAX as f64 {
        return Err(CalcError::InvalidInput(format!(
            "system size of {} kW needs more panels than can be counted",
            size_kw
        )));
    }
    Ok(panels as u32)
}

pub fn installed_power_kw(number_of_panels: u32, constants: &SystemConstants) -> f64 {
    number_of_panels as f64 * constants.panel_power_kw
}

/// Roof area for the panels, rounded to two decimals.
pub fn required_area_m2(number_of_panels: u32, constants: &SystemConstants) -> f64 {
    round2(number_of_panels as f64 * constants.panel_area_m2)
}

/// Size a system for the given consumption, irradiance and preference.
pub fn size_system(
    average_monthly_consumption: f64,
    annual_irradiance: f64,
    preference: SizingPreference,
    constants: &SystemConstants,
) -> CalcResult<SystemSizing> {
    let base_kw = required_system_size_kw(average_monthly_consumption, annual_irradiance, constants)?;
    let required_size_kw = apply_preference(base_kw, preference);
    let panels = number_of_panels(required_size_kw, constants)?;

    debug!(
        "Sized {:.3} kW ({} preference) -> {} panels",
        required_size_kw, preference, panels
    );

    Ok(SystemSizing {
        required_size_kw,
        number_of_panels: panels,
        installed_power_kw: installed_power_kw(panels, constants),
        required_area_m2: required_area_m2(panels, constants),
    })
}

/// Coarse yearly generation from the annual irradiance average (kWh).
pub fn annual_generation_kwh(
    number_of_panels: u32,
    annual_irradiance: f64,
    constants: &SystemConstants,
) -> f64 {
    number_of_panels as f64
        * constants.panel_power_kw
        * annual_irradiance
        * constants.system_efficiency
        * DAYS_PER_YEAR
}

/// Share of yearly consumption covered by generation, in percent.
///
/// Balanced sizing reports at most 100; minimum and maximum report the raw
/// value so under- and over-provisioning stay visible.
pub fn coverage_percentage(
    annual_generation: f64,
    average_monthly_consumption: f64,
    preference: SizingPreference,
) -> CalcResult<f64> {
    let annual_consumption = average_monthly_consumption * 12.0;
    if annual_consumption == 0.0 {
        return Err(CalcError::DivisionByZero("coverage with zero consumption"));
    }
    let coverage = annual_generation / annual_consumption * 100.0;
    if preference.caps_coverage() {
        Ok(coverage.min(100.0))
    } else {
        Ok(coverage)
    }
}

/// CO₂ avoided per year in kg, rounded up.
pub fn annual_co2_saved_kg(annual_generation: f64, constants: &SystemConstants) -> u32 {
    (annual_generation * constants.co2_saved_per_kwh).ceil().max(0.0) as u32
}

/// Tree equivalents of the yearly generation, rounded up.
pub fn tree_equivalents(annual_generation: f64, constants: &SystemConstants) -> u32 {
    (annual_generation * constants.tree_factor / 10.0).ceil().max(0.0) as u32
}

pub fn environmental_impact(annual_generation: f64, constants: &SystemConstants) -> EnvironmentalImpact {
    EnvironmentalImpact {
        annual_co2_saved_kg: annual_co2_saved_kg(annual_generation, constants),
        tree_equivalents: tree_equivalents(annual_generation, constants),
    }
}

pub fn investment_cost(installed_power_kw: f64, constants: &SystemConstants) -> f64 {
    installed_power_kw * constants.cost_per_kw
}
