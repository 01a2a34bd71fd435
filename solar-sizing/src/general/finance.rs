use tracing::{debug, warn};

use solar_model::results::{CashflowPoint, FinancialSummary};

use crate::error::{CalcError, CalcResult};

/// Starting guess for the IRR iteration (10%).
pub const IRR_INITIAL_GUESS: f64 = 0.1;
pub const IRR_TOLERANCE: f64 = 1e-6;
pub const IRR_MAX_ITERATIONS: usize = 1000;

/// Years until the investment is recovered: `investment / annual amount`.
pub fn payback_years(investment_cost: f64, annual_amount: f64) -> CalcResult<f64> {
    if annual_amount == 0.0 {
        return Err(CalcError::DivisionByZero("payback period with zero annual cost"));
    }
    Ok(investment_cost / annual_amount)
}

/// Net return over the system lifetime as a percentage of the investment.
pub fn roi_percent(annual_amount: f64, investment_cost: f64, lifetime_years: u32) -> CalcResult<f64> {
    if investment_cost == 0.0 {
        return Err(CalcError::DivisionByZero("ROI with zero investment"));
    }
    Ok((annual_amount * lifetime_years as f64 - investment_cost) / investment_cost * 100.0)
}

/// Cumulative position per year: year 0 is `-investment`, each following
/// year adds `annual_savings`. Returns `years + 1` points.
pub fn cumulative_cashflow(investment_cost: f64, annual_savings: f64, years: u32) -> Vec<CashflowPoint> {
    let mut cumulative = -investment_cost;
    let mut points = Vec::with_capacity(years as usize + 1);
    points.push(CashflowPoint::new(0, cumulative));
    for year in 1..=years {
        cumulative += annual_savings;
        points.push(CashflowPoint::new(year, cumulative));
    }
    points
}

/// Cash-flow stream for IRR: the negative investment followed by `years`
/// equal annual amounts.
pub fn cash_flows(investment_cost: f64, annual_amount: f64, years: u32) -> Vec<f64> {
    std::iter::once(-investment_cost)
        .chain(std::iter::repeat_n(annual_amount, years as usize))
        .collect()
}

/// Net present value of `cash_flows` at `rate`.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Derivative of [`npv`] with respect to the rate.
pub fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    -cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| t as f64 * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum::<f64>()
}

/// Internal rate of return, starting from [`IRR_INITIAL_GUESS`].
pub fn calculate_irr(cash_flows: &[f64]) -> CalcResult<f64> {
    calculate_irr_with_guess(cash_flows, IRR_INITIAL_GUESS)
}

/// Internal rate of return by Newton-Raphson on the NPV.
///
/// Converged once two successive rates differ by less than [`IRR_TOLERANCE`].
/// A stream without a sign change has no IRR and is rejected up front; a zero
/// derivative or a non-finite iterate counts as non-convergence.
pub fn calculate_irr_with_guess(cash_flows: &[f64], guess: f64) -> CalcResult<f64> {
    if cash_flows.len() < 2 {
        return Err(CalcError::InvalidInput(format!(
            "IRR needs at least two cash flows, got {}",
            cash_flows.len()
        )));
    }
    let has_inflow = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_outflow = cash_flows.iter().any(|cf| *cf < 0.0);
    if !(has_inflow && has_outflow) {
        return Err(CalcError::InvalidInput(
            "IRR needs cash flows with at least one sign change".to_string(),
        ));
    }

    newton_method_root_finding(
        |rate| npv(rate, cash_flows),
        |rate| npv_derivative(rate, cash_flows),
        guess,
        IRR_TOLERANCE,
        IRR_MAX_ITERATIONS,
    )
    .inspect(|rate| debug!("IRR converged to {:.6}", rate))
    .inspect_err(|e| warn!("{}", e))
}

/// Newton's method for root finding with an analytic derivative
fn newton_method_root_finding<F, D>(
    f: F,
    derivative: D,
    initial_guess: f64,
    tolerance: f64,
    max_iterations: usize,
) -> CalcResult<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for _ in 0..max_iterations {
        let fx = f(x);
        let dfx = derivative(x);

        if dfx == 0.0 || !fx.is_finite() || !dfx.is_finite() {
            break;
        }

        let next = x - fx / dfx;
        if !next.is_finite() {
            break;
        }
        if (next - x).abs() < tolerance {
            return Ok(next);
        }

        x = next;
    }

    Err(CalcError::NonConvergence {
        iterations: max_iterations,
    })
}

/// Investment verdict for a constant annual amount over the system lifetime.
///
/// Unavailable figures (zero denominators, IRR failure) are left as `None`
/// and their errors returned alongside for reporting.
pub fn financial_summary(
    investment_cost: f64,
    annual_amount: f64,
    lifetime_years: u32,
) -> (FinancialSummary, Vec<CalcError>) {
    let mut errors = Vec::new();

    let payback = payback_years(investment_cost, annual_amount)
        .map_err(|e| errors.push(e))
        .ok();
    let roi = roi_percent(annual_amount, investment_cost, lifetime_years)
        .map_err(|e| errors.push(e))
        .ok();
    let irr = calculate_irr(&cash_flows(investment_cost, annual_amount, lifetime_years))
        .map_err(|e| errors.push(e))
        .ok();

    let summary = FinancialSummary {
        investment_cost,
        payback_years: payback,
        roi_percent: roi,
        irr,
    };
    (summary, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_years() {
        assert_eq!(payback_years(50_000.0, 10_000.0).unwrap(), 5.0);
        assert!(matches!(
            payback_years(50_000.0, 0.0),
            Err(CalcError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_roi_percent() {
        // 25 years of 4000 on 50000 -> (100000 - 50000) / 50000
        assert!((roi_percent(4000.0, 50_000.0, 25).unwrap() - 100.0).abs() < 1e-9);
        assert!(matches!(
            roi_percent(4000.0, 0.0, 25),
            Err(CalcError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_cumulative_cashflow() {
        let points = cumulative_cashflow(5000.0, 1000.0, 3);
        let expected = vec![
            CashflowPoint::new(0, -5000.0),
            CashflowPoint::new(1, -4000.0),
            CashflowPoint::new(2, -3000.0),
            CashflowPoint::new(3, -2000.0),
        ];
        assert_eq!(points, expected);
    }

    #[test]
    fn test_cumulative_cashflow_zero_years() {
        assert_eq!(
            cumulative_cashflow(5000.0, 1000.0, 0),
            vec![CashflowPoint::new(0, -5000.0)]
        );
    }

    #[test]
    fn test_cash_flows() {
        assert_eq!(cash_flows(100.0, 30.0, 3), vec![-100.0, 30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_irr_uneven_flows() {
        let flows = [-5000.0, 1000.0, 1200.0, 1500.0];
        let irr = calculate_irr(&flows).unwrap();
        assert!(npv(irr, &flows).abs() < 1e-6, "npv at irr = {}", npv(irr, &flows));
        assert!((irr - (-0.129_004_8)).abs() < 1e-6);
    }

    #[test]
    fn test_irr_single_period() {
        let irr = calculate_irr(&[-1000.0, 1100.0]).unwrap();
        assert!((irr - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_irr_annuity() {
        let flows = cash_flows(10_000.0, 2000.0, 10);
        let irr = calculate_irr(&flows).unwrap();
        assert!((irr - 0.150_984).abs() < 1e-5);
        assert!(npv(irr, &flows).abs() < 1e-5);
    }

    #[test]
    fn test_irr_without_sign_change_fails() {
        assert!(calculate_irr(&[100.0, 100.0, 100.0]).is_err());
        assert!(calculate_irr(&[-100.0, 0.0, -5.0]).is_err());
        assert!(calculate_irr(&[-100.0]).is_err());
    }

    #[test]
    fn test_irr_small_returns_do_not_converge() {
        // 25 years of 100 against 20000: Newton from 0.1 runs off to -inf
        let flows = cash_flows(20_000.0, 100.0, 25);
        assert_eq!(
            calculate_irr(&flows),
            Err(CalcError::NonConvergence {
                iterations: IRR_MAX_ITERATIONS
            })
        );

        let (summary, errors) = financial_summary(20_000.0, 100.0, 25);
        assert_eq!(summary.irr, None);
        assert!(summary.payback_years.is_some());
        assert!(errors.contains(&CalcError::NonConvergence {
            iterations: IRR_MAX_ITERATIONS
        }));
    }

    #[test]
    fn test_newton_zero_derivative_is_non_convergence() {
        let result = newton_method_root_finding(|x| x * x + 1.0, |_| 0.0, 0.1, 1e-6, 10);
        assert_eq!(result, Err(CalcError::NonConvergence { iterations: 10 }));
    }

    #[test]
    fn test_newton_iteration_budget() {
        // x^2 + 1 has no real root; Newton wanders without settling
        let result = newton_method_root_finding(|x| x * x + 1.0, |x| 2.0 * x, 0.5, 1e-12, 50);
        assert_eq!(result, Err(CalcError::NonConvergence { iterations: 50 }));
    }

    #[test]
    fn test_financial_summary_zero_cost() {
        let (summary, errors) = financial_summary(20_000.0, 0.0, 25);
        assert_eq!(summary.payback_years, None);
        assert_eq!(summary.irr, None);
        assert_eq!(summary.roi_percent, Some(-100.0));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_financial_summary() {
        let (summary, errors) = financial_summary(20_000.0, 4000.0, 25);
        assert!(errors.is_empty());
        assert_eq!(summary.payback_years, Some(5.0));
        assert!((summary.roi_percent.unwrap() - 400.0).abs() < 1e-9);
        let irr = summary.irr.unwrap();
        assert!(npv(irr, &cash_flows(20_000.0, 4000.0, 25)).abs() < 1e-4);
    }
}
