use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use solar_model::general::location::TariffKey;
use solar_model::general::preference::SizingPreference;
use solar_sizing::general::consumption::{ConsumptionSample, READINGS, load_consumption_history};
use solar_sizing::sizing::plot::{ChartId, generate_charts};
use solar_sizing::sizing::report::print_summary;
use solar_sizing::{CalculationRequest, CalculatorContext, SystemConstants, run_calculation};

#[derive(Parser)]
#[command(name = "solar-sizing")]
#[command(author, version, about = "Residential solar sizing and payback calculator")]
struct Cli {
    /// Directory holding pricing.json, irradiance.json and irradiance_monthly.json
    #[arg(long, global = true, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data"))]
    data_dir: PathBuf,

    /// TOML file overriding the built-in system constants
    #[arg(long, global = true)]
    constants: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Size a system from four monthly readings and report its economics
    Calculate(CalculateArgs),
    /// List the departments with irradiance data
    Departments,
}

#[derive(Parser)]
struct CalculateArgs {
    /// Four monthly consumption readings in kWh
    #[arg(value_name = "KWH", allow_negative_numbers = true, conflicts_with = "history")]
    readings: Vec<f64>,

    /// Read the four readings from a file instead, one per line
    #[arg(long)]
    history: Option<PathBuf>,

    #[arg(long, default_value = "Guatemala")]
    department: String,

    #[arg(long, default_value = "EEGSA")]
    distributor: String,

    #[arg(long, default_value = "BTS")]
    rate_type: String,

    /// minimum, balanced or maximum
    #[arg(long, default_value_t = SizingPreference::Balanced)]
    preference: SizingPreference,

    /// Seed for the seasonal variation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full result set as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Write charts into this directory
    #[arg(long)]
    charts: Option<PathBuf>,

    /// Chart to render (repeatable); all charts when omitted
    #[arg(long = "chart", value_name = "ID")]
    chart_ids: Vec<ChartId>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let constants = match &cli.constants {
        Some(path) => SystemConstants::load(path)?,
        None => SystemConstants::default(),
    };
    let ctx = CalculatorContext::load_from_dir(constants, &cli.data_dir)?;

    match cli.command {
        Commands::Calculate(args) => calculate(&ctx, args),
        Commands::Departments => list_departments(&ctx),
    }
}

fn read_sample(args: &CalculateArgs) -> Result<ConsumptionSample> {
    if let Some(path) = &args.history {
        return load_consumption_history(path);
    }
    let readings: [f64; READINGS] = match args.readings.as_slice().try_into() {
        Ok(readings) => readings,
        Err(_) => bail!(
            "Expected {} monthly readings, got {}",
            READINGS,
            args.readings.len()
        ),
    };
    Ok(ConsumptionSample::new(readings)?)
}

fn calculate(ctx: &CalculatorContext, args: CalculateArgs) -> Result<()> {
    let sample = read_sample(&args)?;
    let request = CalculationRequest::new(
        sample,
        TariffKey::new(&args.distributor, &args.rate_type, &args.department),
        args.preference,
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let results = run_calculation(ctx, &request, &mut rng)
        .with_context(|| format!("Calculation failed for {}", request.tariff.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&results);
    }

    if let Some(dir) = &args.charts {
        let written = generate_charts(&results, &args.chart_ids, dir)
            .map_err(|e| anyhow::anyhow!("Failed to render charts: {}", e))?;
        info!("{} charts written to {}", written.len(), dir.display());
    }
    Ok(())
}

fn list_departments(ctx: &CalculatorContext) -> Result<()> {
    for department in ctx.departments()? {
        println!("{}", department);
    }
    Ok(())
}
