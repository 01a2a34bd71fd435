use rand::Rng;
use tracing::{debug, info, warn};

use solar_model::general::location::TariffKey;
use solar_model::general::preference::SizingPreference;
use solar_model::results::{FinancialSummary, ResultSet};

use crate::error::{CalcError, CalcResult};
use crate::general::bill::compute_bills;
use crate::general::consumption::ConsumptionSample;
use crate::general::finance::{cumulative_cashflow, financial_summary};
use crate::sizing::config::CalculatorContext;
use crate::sizing::cost_comparison::compare_annual_cost;
use crate::sizing::seasonal_profile::{
    distribute_annual, distribute_annual_with_variation, monthly_generation,
};
use crate::sizing::system_size::{
    annual_generation_kwh, coverage_percentage, environmental_impact, investment_cost,
    size_system,
};

/// Inputs of one form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub consumption: ConsumptionSample,
    pub tariff: TariffKey,
    pub preference: SizingPreference,
}

impl CalculationRequest {
    pub fn new(
        consumption: ConsumptionSample,
        tariff: TariffKey,
        preference: SizingPreference,
    ) -> Self {
        Self {
            consumption,
            tariff,
            preference,
        }
    }
}

/// Collects non-fatal conditions met during a run.
#[derive(Debug, Default)]
struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    fn record(&mut self, error: &CalcError) {
        let message = error.to_string();
        if !self.messages.contains(&message) {
            warn!("{}", message);
            self.messages.push(message);
        }
    }

    /// Record a recoverable error and yield `None`; fatal errors pass through.
    fn recover<T>(&mut self, result: CalcResult<T>) -> CalcResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                self.record(&e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Run the full sizing and finance calculation for one request.
///
/// The random source drives the seasonal variation; pass a seeded generator
/// for reproducible output. Missing tariff data and malformed series are
/// recorded in `ResultSet::diagnostics`. Without an annual bill, payback, ROI
/// and IRR stay `None` and the cashflow series is empty. Missing or zero
/// irradiance and unloaded tables abort the run.
pub fn run_calculation<R: Rng + ?Sized>(
    ctx: &CalculatorContext,
    request: &CalculationRequest,
    rng: &mut R,
) -> CalcResult<ResultSet> {
    let start_time = std::time::Instant::now();
    let constants = &ctx.constants;
    let department = request.tariff.department.as_str();
    let mut diagnostics = Diagnostics::default();

    let annual_irradiance = ctx.annual_irradiance(department)?;
    let monthly_irradiance = ctx.monthly_irradiance(department)?;

    // Consumption
    let average_monthly_consumption = request.consumption.average();
    let realistic_monthly_consumptions =
        distribute_annual(average_monthly_consumption * 12.0, constants.variation, rng)?;
    let realistic_annual_consumption: f64 = realistic_monthly_consumptions.iter().sum();
    let realistic_average_monthly_consumption = realistic_annual_consumption / 12.0;

    // Sizing
    let sizing = size_system(
        realistic_average_monthly_consumption,
        annual_irradiance,
        request.preference,
        constants,
    )?;

    // Generation
    let annual_generation_estimate =
        annual_generation_kwh(sizing.number_of_panels, annual_irradiance, constants);
    let realistic_monthly_generation = monthly_generation(
        sizing.number_of_panels,
        constants.panel_power_kw,
        constants.system_efficiency,
        &monthly_irradiance,
    )?;
    let realistic_annual_generation: f64 = realistic_monthly_generation.iter().sum();

    let coverage_percent = coverage_percentage(
        realistic_annual_generation,
        realistic_average_monthly_consumption,
        request.preference,
    )?;
    let environmental = environmental_impact(realistic_annual_generation, constants);

    // Bills
    let annual_bill = diagnostics.recover(
        compute_bills(&realistic_monthly_consumptions, &request.tariff, ctx)
            .map(|bills| bills.iter().sum::<f64>()),
    )?;
    let annual_electricity_cost = annual_bill.unwrap_or_default();
    let cost_comparison = diagnostics
        .recover(compare_annual_cost(
            &realistic_monthly_consumptions,
            &request.tariff,
            &realistic_monthly_generation,
            ctx,
        ))?
        .unwrap_or_default();

    // Finance; without a bill there is nothing to pay the investment back with
    let investment = investment_cost(sizing.installed_power_kw, constants);
    let (financial, cumulative_cashflow) = match annual_bill {
        Some(annual_cost) => {
            let (summary, finance_errors) =
                financial_summary(investment, annual_cost, constants.system_lifetime_years);
            for error in &finance_errors {
                diagnostics.record(error);
            }
            let cashflow =
                cumulative_cashflow(investment, annual_cost, constants.system_lifetime_years);
            (summary, cashflow)
        }
        None => (
            FinancialSummary {
                investment_cost: investment,
                ..Default::default()
            },
            Vec::new(),
        ),
    };

    // Lifetime trends
    let annual_generation_trend = distribute_annual_with_variation(
        realistic_annual_generation,
        constants.system_lifetime_years,
        constants.variation,
        rng,
    )?;
    let annual_consumption_trend = distribute_annual_with_variation(
        realistic_annual_consumption,
        constants.system_lifetime_years,
        constants.variation,
        rng,
    )?;

    debug!(
        "Generation {:.2} kWh/yr against consumption {:.2} kWh/yr",
        realistic_annual_generation, realistic_annual_consumption
    );
    info!(
        "Calculation for {} finished in {} µs: {} panels, {:.2} kW",
        request.tariff.display(),
        start_time.elapsed().as_micros(),
        sizing.number_of_panels,
        sizing.installed_power_kw
    );

    Ok(ResultSet {
        department: request.tariff.department.clone(),
        distributor: request.tariff.distributor.clone(),
        rate_type: request.tariff.rate_type.clone(),
        sizing_preference: request.preference,
        average_monthly_consumption,
        realistic_monthly_consumptions,
        realistic_annual_consumption,
        realistic_average_monthly_consumption,
        sizing,
        annual_generation_estimate,
        realistic_monthly_generation,
        realistic_annual_generation,
        coverage_percent,
        environmental,
        annual_electricity_cost,
        cost_comparison,
        financial,
        cumulative_cashflow,
        annual_generation_trend,
        annual_consumption_trend,
        diagnostics: diagnostics.messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::config::SystemConstants;
    use indexmap::IndexMap;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use solar_model::irradiance::IrradianceTables;
    use solar_model::pricing::{TariffRecord, TariffTable};

    const MONTHLY: [f64; 12] = [5.0, 5.5, 6.0, 6.1, 5.6, 5.0, 5.3, 5.3, 4.8, 4.7, 4.8, 4.8];

    fn test_context() -> CalculatorContext {
        let mut tariffs = TariffTable::new();
        tariffs.insert_record(
            &TariffKey::new("EEGSA", "BTS", "Guatemala"),
            TariffRecord::new(12.0, 1.9, 0.13),
        );
        let mut annual = IndexMap::new();
        annual.insert("Guatemala".to_string(), 5.25);
        annual.insert("Izabal".to_string(), 0.0);
        let mut monthly = IndexMap::new();
        monthly.insert("Guatemala".to_string(), MONTHLY.to_vec());
        monthly.insert("Izabal".to_string(), vec![0.0; 12]);
        CalculatorContext::with_tables(
            SystemConstants::default(),
            tariffs,
            IrradianceTables::new(annual, monthly),
        )
    }

    fn request(distributor: &str, department: &str) -> CalculationRequest {
        CalculationRequest::new(
            ConsumptionSample::new([320.0, 280.0, 300.0, 340.0]).unwrap(),
            TariffKey::new(distributor, "BTS", department),
            SizingPreference::Balanced,
        )
    }

    #[test]
    fn test_run_calculation() {
        let ctx = test_context();
        let mut rng = StdRng::seed_from_u64(1);
        let results = run_calculation(&ctx, &request("EEGSA", "Guatemala"), &mut rng).unwrap();

        assert_eq!(results.average_monthly_consumption, 310.0);
        assert_eq!(results.realistic_monthly_consumptions.len(), 12);
        assert!((results.realistic_annual_consumption - 3720.0).abs() < 1e-6);
        assert_eq!(results.realistic_monthly_generation.len(), 12);
        assert!(results.sizing.number_of_panels > 0);
        assert!(results.coverage_percent <= 100.0);
        assert!(results.annual_electricity_cost > 0.0);
        assert!(results.cost_comparison.annual_savings > 0.0);
        assert_eq!(
            results.cumulative_cashflow.len(),
            ctx.constants.system_lifetime_years as usize + 1
        );
        assert_eq!(
            results.cumulative_cashflow[0].value,
            -results.financial.investment_cost
        );
        assert!(results.financial.irr.is_some());
        assert!(results.financial.payback_years.is_some());
        assert_eq!(results.annual_generation_trend.len(), 25);
        assert!(!results.has_diagnostics());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let ctx = test_context();
        let first = run_calculation(
            &ctx,
            &request("EEGSA", "Guatemala"),
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        let second = run_calculation(
            &ctx,
            &request("EEGSA", "Guatemala"),
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_tariff_is_recorded_not_fatal() {
        let ctx = test_context();
        let mut rng = StdRng::seed_from_u64(1);
        let results = run_calculation(&ctx, &request("DEOCSA", "Guatemala"), &mut rng).unwrap();

        assert_eq!(results.annual_electricity_cost, 0.0);
        assert_eq!(results.cost_comparison, Default::default());
        assert_eq!(results.financial.payback_years, None);
        assert_eq!(results.financial.roi_percent, None);
        assert_eq!(results.financial.irr, None);
        assert!(results.financial.investment_cost > 0.0);
        assert!(results.cumulative_cashflow.is_empty());
        assert!(results.has_diagnostics());
        assert!(
            results
                .diagnostics
                .iter()
                .any(|d| d.contains("missing tariff data"))
        );
        // The same missing tariff is only reported once
        let tariff_messages = results
            .diagnostics
            .iter()
            .filter(|d| d.contains("missing tariff data"))
            .count();
        assert_eq!(tariff_messages, 1);
    }

    #[test]
    fn test_zero_irradiance_aborts() {
        let ctx = test_context();
        let mut rng = StdRng::seed_from_u64(1);
        let result = run_calculation(&ctx, &request("EEGSA", "Izabal"), &mut rng);
        assert!(matches!(result, Err(CalcError::DivisionByZero(_))));
    }

    #[test]
    fn test_missing_irradiance_aborts() {
        let ctx = test_context();
        let mut rng = StdRng::seed_from_u64(1);
        let result = run_calculation(&ctx, &request("EEGSA", "Peten"), &mut rng);
        assert!(matches!(result, Err(CalcError::MissingConfigData { .. })));
    }

    #[test]
    fn test_unloaded_tables_abort() {
        let ctx = CalculatorContext::new(SystemConstants::default());
        let mut rng = StdRng::seed_from_u64(1);
        let result = run_calculation(&ctx, &request("EEGSA", "Guatemala"), &mut rng);
        assert_eq!(result, Err(CalcError::TableNotLoaded { table: "irradiance" }));
    }

    #[test]
    fn test_maximum_preference_reports_uncapped_coverage() {
        let ctx = test_context();
        let mut rng = StdRng::seed_from_u64(4);
        let mut req = request("EEGSA", "Guatemala");
        req.preference = SizingPreference::Maximum;
        let results = run_calculation(&ctx, &req, &mut rng).unwrap();
        assert!(results.coverage_percent > 100.0);
    }
}
