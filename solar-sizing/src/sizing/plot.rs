use plotters::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use solar_model::results::ResultSet;

use crate::general::consumption::MONTH_LABELS;

const SOLAR: RGBColor = RGBColor(255, 191, 65);
const CONSUMPTION: RGBColor = RGBColor(11, 40, 76);
const NEUTRAL: RGBColor = RGBColor(176, 176, 176);
const SAVINGS: RGBColor = RGBColor(168, 230, 163);

pub type PlotResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Renders one chart for a result set into the given directory.
pub type ChartRenderer = fn(&ResultSet, &Path) -> PlotResult<PathBuf>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    StackedBar,
    Line,
}

#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: RGBColor,
}

impl Series {
    fn new(name: &str, values: Vec<f64>, color: RGBColor) -> Self {
        Self {
            name: name.to_string(),
            values,
            color,
        }
    }
}

/// Everything needed to draw a chart, detached from the drawing backend.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Value range of the y axis. Always includes zero; stacked charts use
    /// per-label totals.
    pub fn y_range(&self) -> (f64, f64) {
        let values: Vec<f64> = match self.kind {
            ChartKind::StackedBar => (0..self.labels.len())
                .map(|i| {
                    self.series
                        .iter()
                        .map(|s| s.values.get(i).copied().unwrap_or(0.0))
                        .sum()
                })
                .collect(),
            ChartKind::Bar | ChartKind::Line => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .collect(),
        };

        let min = values.iter().fold(0f64, |a, &b| a.min(b));
        let max = values.iter().fold(0f64, |a, &b| a.max(b));
        if max == min {
            return (min, min + 1.0);
        }
        let headroom = (max - min) * 0.1;
        let low = if min < 0.0 { min - headroom } else { min };
        (low, max + headroom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartId {
    MonthlyEnergy,
    CumulativeCashflow,
    LifetimeTrend,
    CostComparison,
}

impl ChartId {
    pub const ALL: [ChartId; 4] = [
        ChartId::MonthlyEnergy,
        ChartId::CumulativeCashflow,
        ChartId::LifetimeTrend,
        ChartId::CostComparison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::MonthlyEnergy => "monthly-energy",
            ChartId::CumulativeCashflow => "cumulative-cashflow",
            ChartId::LifetimeTrend => "lifetime-trend",
            ChartId::CostComparison => "cost-comparison",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.as_str())
    }

    pub fn data(&self, results: &ResultSet) -> ChartData {
        match self {
            ChartId::MonthlyEnergy => monthly_energy_data(results),
            ChartId::CumulativeCashflow => cumulative_cashflow_data(results),
            ChartId::LifetimeTrend => lifetime_trend_data(results),
            ChartId::CostComparison => cost_comparison_data(results),
        }
    }

    pub fn renderer(&self) -> ChartRenderer {
        match self {
            ChartId::MonthlyEnergy => render_monthly_energy,
            ChartId::CumulativeCashflow => render_cumulative_cashflow,
            ChartId::LifetimeTrend => render_lifetime_trend,
            ChartId::CostComparison => render_cost_comparison,
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChartId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| format!("unknown chart '{}'", s))
    }
}

pub fn monthly_energy_data(results: &ResultSet) -> ChartData {
    ChartData {
        title: "Monthly Generation vs Consumption".to_string(),
        x_desc: "Month".to_string(),
        y_desc: "Energy (kWh)".to_string(),
        kind: ChartKind::Bar,
        labels: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        series: vec![
            Series::new(
                "Estimated Solar Generation (kWh)",
                results.realistic_monthly_generation.clone(),
                SOLAR,
            ),
            Series::new(
                "User Consumption (kWh)",
                results.realistic_monthly_consumptions.clone(),
                CONSUMPTION,
            ),
        ],
    }
}

pub fn cumulative_cashflow_data(results: &ResultSet) -> ChartData {
    ChartData {
        title: "Cumulative Cashflow".to_string(),
        x_desc: "Year".to_string(),
        y_desc: "Cumulative Cashflow (Q)".to_string(),
        kind: ChartKind::Bar,
        labels: results
            .cumulative_cashflow
            .iter()
            .map(|point| point.year.to_string())
            .collect(),
        series: vec![Series::new(
            "Cumulative Cashflow (Q)",
            results.cumulative_cashflow.iter().map(|p| p.value).collect(),
            SOLAR,
        )],
    }
}

pub fn lifetime_trend_data(results: &ResultSet) -> ChartData {
    let years = results
        .annual_generation_trend
        .len()
        .max(results.annual_consumption_trend.len());
    ChartData {
        title: "Annual Generation vs Consumption".to_string(),
        x_desc: "Year".to_string(),
        y_desc: "Energy (kWh)".to_string(),
        kind: ChartKind::Line,
        labels: (1..=years).map(|year| year.to_string()).collect(),
        series: vec![
            Series::new(
                "Annual Solar Generation (kWh)",
                results.annual_generation_trend.clone(),
                SOLAR,
            ),
            Series::new(
                "Annual User Consumption (kWh)",
                results.annual_consumption_trend.clone(),
                CONSUMPTION,
            ),
        ],
    }
}

/// Without-solar cost on the first bar; with-solar cost topped by savings on the second.
pub fn cost_comparison_data(results: &ResultSet) -> ChartData {
    let costs = &results.cost_comparison;
    ChartData {
        title: "Annual Electricity Cost".to_string(),
        x_desc: String::new(),
        y_desc: "Cost (GTQ)".to_string(),
        kind: ChartKind::StackedBar,
        labels: vec!["Without Solar".to_string(), "With Solar".to_string()],
        series: vec![
            Series::new(
                "Without Solar",
                vec![costs.annual_cost_without_solar, 0.0],
                NEUTRAL,
            ),
            Series::new(
                "With Solar - Cost",
                vec![0.0, costs.annual_cost_with_solar],
                NEUTRAL,
            ),
            Series::new(
                "With Solar - Savings",
                vec![0.0, costs.annual_savings],
                SAVINGS,
            ),
        ],
    }
}

fn label_at(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Draw a prepared chart as PNG.
pub fn draw_chart(data: &ChartData, filename: &Path) -> PlotResult<()> {
    let root = BitMapBackend::new(filename, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let count = data.labels.len().max(1);
    let (y_min, y_max) = data.y_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(&data.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..count as f64 - 0.5, y_min..y_max)?;

    let labels = data.labels.clone();
    chart
        .configure_mesh()
        .x_desc(data.x_desc.as_str())
        .y_desc(data.y_desc.as_str())
        .x_labels(count)
        .x_label_formatter(&|x| label_at(&labels, *x))
        .disable_x_mesh()
        .draw()?;

    match data.kind {
        ChartKind::Bar => {
            let width = 0.8 / data.series.len().max(1) as f64;
            for (s, series) in data.series.iter().enumerate() {
                let color = series.color;
                let offset = -0.4 + s as f64 * width;
                chart
                    .draw_series(series.values.iter().enumerate().map(|(i, &y)| {
                        let x = i as f64 + offset;
                        Rectangle::new([(x, 0.0), (x + width, y)], color.filled())
                    }))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
            }
        }
        ChartKind::StackedBar => {
            let mut bottoms = vec![0f64; data.labels.len()];
            for series in &data.series {
                let color = series.color;
                let bars: Vec<Rectangle<(f64, f64)>> = series
                    .values
                    .iter()
                    .zip(bottoms.iter_mut())
                    .enumerate()
                    .filter(|(_, (value, _))| **value != 0.0)
                    .map(|(i, (&value, bottom))| {
                        let start = *bottom;
                        *bottom += value;
                        Rectangle::new(
                            [(i as f64 - 0.3, start), (i as f64 + 0.3, start + value)],
                            color.filled(),
                        )
                    })
                    .collect();
                chart
                    .draw_series(bars)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
            }
        }
        ChartKind::Line => {
            for series in &data.series {
                let color = series.color;
                chart
                    .draw_series(LineSeries::new(
                        series.values.iter().enumerate().map(|(i, &y)| (i as f64, y)),
                        &color,
                    ))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    info!("Chart saved as {}", filename.display());
    Ok(())
}

fn render(id: ChartId, results: &ResultSet, output_dir: &Path) -> PlotResult<PathBuf> {
    let filename = output_dir.join(id.file_name());
    draw_chart(&id.data(results), &filename)?;
    Ok(filename)
}

fn render_monthly_energy(results: &ResultSet, output_dir: &Path) -> PlotResult<PathBuf> {
    render(ChartId::MonthlyEnergy, results, output_dir)
}

fn render_cumulative_cashflow(results: &ResultSet, output_dir: &Path) -> PlotResult<PathBuf> {
    render(ChartId::CumulativeCashflow, results, output_dir)
}

fn render_lifetime_trend(results: &ResultSet, output_dir: &Path) -> PlotResult<PathBuf> {
    render(ChartId::LifetimeTrend, results, output_dir)
}

fn render_cost_comparison(results: &ResultSet, output_dir: &Path) -> PlotResult<PathBuf> {
    render(ChartId::CostComparison, results, output_dir)
}

/// Render the selected charts (all of them when `charts` is empty).
pub fn generate_charts(
    results: &ResultSet,
    charts: &[ChartId],
    output_dir: &Path,
) -> PlotResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let selected: &[ChartId] = if charts.is_empty() {
        &ChartId::ALL
    } else {
        charts
    };
    let mut written = Vec::with_capacity(selected.len());
    for id in selected {
        written.push((id.renderer())(results, output_dir)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_model::results::{CashflowPoint, CostComparison};

    fn results() -> ResultSet {
        ResultSet {
            realistic_monthly_generation: vec![400.0; 12],
            realistic_monthly_consumptions: vec![310.0; 12],
            cumulative_cashflow: vec![
                CashflowPoint::new(0, -1000.0),
                CashflowPoint::new(1, -400.0),
                CashflowPoint::new(2, 200.0),
            ],
            annual_generation_trend: vec![4800.0, 4900.0, 4700.0],
            annual_consumption_trend: vec![3700.0, 3750.0, 3690.0],
            cost_comparison: CostComparison {
                annual_cost_without_solar: 9000.0,
                annual_cost_with_solar: 2500.0,
                annual_savings: 6500.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_chart_id_from_str() {
        for id in ChartId::ALL {
            assert_eq!(id.as_str().parse::<ChartId>(), Ok(id));
        }
        assert_eq!(" Cost-Comparison ".parse::<ChartId>(), Ok(ChartId::CostComparison));
        assert!("chart5".parse::<ChartId>().is_err());
    }

    #[test]
    fn test_each_chart_has_its_own_file_and_data() {
        let results = results();
        let mut files: Vec<String> = ChartId::ALL.iter().map(|id| id.file_name()).collect();
        files.dedup();
        assert_eq!(files.len(), 4);
        assert_eq!(ChartId::LifetimeTrend.file_name(), "lifetime-trend.png");
        assert_eq!(ChartId::CostComparison.data(&results).labels.len(), 2);
        assert_eq!(ChartId::CumulativeCashflow.data(&results).labels.len(), 3);
    }

    #[test]
    fn test_monthly_energy_data() {
        let data = ChartId::MonthlyEnergy.data(&results());
        assert_eq!(data.kind, ChartKind::Bar);
        assert_eq!(data.labels.len(), 12);
        assert_eq!(data.labels[0], "Jan");
        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[1].values, vec![310.0; 12]);
    }

    #[test]
    fn test_cumulative_cashflow_data() {
        let data = cumulative_cashflow_data(&results());
        assert_eq!(data.labels, vec!["0", "1", "2"]);
        assert_eq!(data.series[0].values, vec![-1000.0, -400.0, 200.0]);
        let (low, high) = data.y_range();
        assert!(low < -1000.0);
        assert!(high > 200.0);
    }

    #[test]
    fn test_lifetime_trend_labels_start_at_one() {
        let data = lifetime_trend_data(&results());
        assert_eq!(data.kind, ChartKind::Line);
        assert_eq!(data.labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_cost_comparison_stacks_to_totals() {
        let data = cost_comparison_data(&results());
        assert_eq!(data.kind, ChartKind::StackedBar);
        let with_solar: f64 = data.series.iter().map(|s| s.values[1]).sum();
        assert_eq!(with_solar, 9000.0);
        let (low, high) = data.y_range();
        assert_eq!(low, 0.0);
        assert!((high - 9900.0).abs() < 1e-9);
    }

    #[test]
    fn test_y_range_of_empty_chart() {
        let data = ChartId::MonthlyEnergy.data(&ResultSet::default());
        assert_eq!(data.y_range(), (0.0, 1.0));
    }

    #[test]
    fn test_label_at() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(label_at(&labels, 1.0), "b");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 2.0), "");
        assert_eq!(label_at(&labels, -1.0), "");
    }
}
