use solar_model::results::ResultSet;

/// One label/value pair of the numeric results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: &'static str,
    pub value: String,
}

impl DisplayRow {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

fn or_na(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| "n/a".to_string())
}

pub fn display_rows(results: &ResultSet) -> Vec<DisplayRow> {
    let sizing = &results.sizing;
    let financial = &results.financial;
    vec![
        DisplayRow::new(
            "Installed power (kW)",
            format!("{:.2}", sizing.installed_power_kw),
        ),
        DisplayRow::new("Number of panels", sizing.number_of_panels.to_string()),
        DisplayRow::new("Required area (m²)", format!("{:.2}", sizing.required_area_m2)),
        DisplayRow::new(
            "Annual generation (kWh)",
            format!("{:.2}", results.realistic_annual_generation),
        ),
        DisplayRow::new("Coverage (%)", format!("{:.2}", results.coverage_percent)),
        DisplayRow::new(
            "CO₂ saved (kg/yr)",
            results.environmental.annual_co2_saved_kg.to_string(),
        ),
        DisplayRow::new(
            "Tree equivalents",
            results.environmental.tree_equivalents.to_string(),
        ),
        DisplayRow::new(
            "Annual electricity bill (Q)",
            format!("{:.2}", results.annual_electricity_cost),
        ),
        DisplayRow::new(
            "Investment cost (Q)",
            format!("{:.2}", financial.investment_cost),
        ),
        DisplayRow::new(
            "Payback (years)",
            or_na(financial.payback_years, |v| format!("{:.1}", v)),
        ),
        DisplayRow::new(
            "ROI (%)",
            or_na(financial.roi_percent, |v| format!("{:.1}", v)),
        ),
        DisplayRow::new(
            "IRR (%)",
            or_na(financial.irr, |v| format!("{:.1}", v * 100.0)),
        ),
    ]
}

pub fn print_summary(results: &ResultSet) {
    println!("\n=== SOLAR SIZING RESULTS ===");
    println!(
        "{} / {} / {} ({} sizing)",
        results.distributor, results.rate_type, results.department, results.sizing_preference
    );
    println!(
        "Average monthly consumption: {:.2} kWh",
        results.average_monthly_consumption
    );
    println!();
    for row in display_rows(results) {
        println!("{:<30}{:>14}", row.label, row.value);
    }

    let costs = &results.cost_comparison;
    println!("\nAnnual Cost Comparison:");
    println!("Without solar: Q{:.2}", costs.annual_cost_without_solar);
    println!("With solar: Q{:.2}", costs.annual_cost_with_solar);
    println!("Savings: Q{:.2}", costs.annual_savings);

    if results.has_diagnostics() {
        println!("\nWarnings:");
        for message in &results.diagnostics {
            println!("- {}", message);
        }
    }
    println!("============================\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_model::results::{FinancialSummary, SystemSizing};

    fn value_of<'a>(rows: &'a [DisplayRow], label: &str) -> &'a str {
        rows.iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_display_rows_precision() {
        let results = ResultSet {
            sizing: SystemSizing {
                required_size_kw: 2.46,
                number_of_panels: 5,
                installed_power_kw: 2.75,
                required_area_m2: 13.0,
            },
            realistic_annual_generation: 4150.456,
            coverage_percent: 100.0,
            annual_electricity_cost: 9120.5,
            financial: FinancialSummary {
                investment_cost: 24750.0,
                payback_years: Some(2.7137),
                roi_percent: Some(821.24),
                irr: Some(0.36848),
            },
            ..Default::default()
        };
        let rows = display_rows(&results);
        assert_eq!(rows.len(), 12);
        assert_eq!(value_of(&rows, "Number of panels"), "5");
        assert_eq!(value_of(&rows, "Annual generation (kWh)"), "4150.46");
        assert_eq!(value_of(&rows, "Coverage (%)"), "100.00");
        assert_eq!(value_of(&rows, "Payback (years)"), "2.7");
        assert_eq!(value_of(&rows, "ROI (%)"), "821.2");
        assert_eq!(value_of(&rows, "IRR (%)"), "36.8");
    }

    #[test]
    fn test_unavailable_figures_show_na() {
        let rows = display_rows(&ResultSet::default());
        assert_eq!(value_of(&rows, "Payback (years)"), "n/a");
        assert_eq!(value_of(&rows, "IRR (%)"), "n/a");
        assert_eq!(value_of(&rows, "ROI (%)"), "n/a");
        assert_eq!(value_of(&rows, "Investment cost (Q)"), "0.00");
    }
}
