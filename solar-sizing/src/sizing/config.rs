use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use solar_model::general::location::TariffKey;
use solar_model::irradiance::{IrradianceTables, MONTHS_PER_YEAR};
use solar_model::pricing::{TariffRecord, TariffTable};

use crate::error::{CalcError, CalcResult};

pub const PRICING_FILE: &str = "pricing.json";
pub const ANNUAL_IRRADIANCE_FILE: &str = "irradiance.json";
pub const MONTHLY_IRRADIANCE_FILE: &str = "irradiance_monthly.json";

/// Fixed parameters of the sizing and finance formulas.
///
/// Loaded once per process and passed by reference; nothing mutates it
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConstants {
    // Panel
    pub panel_power_kw: f64, // Nominal power of one panel in kW
    pub panel_area_m2: f64,  // Footprint of one panel in m²

    // System
    pub system_efficiency: f64,      // Overall derate (inverter, wiring, soiling)
    pub system_lifetime_years: u32,  // Years of operation for ROI / IRR
    pub cost_per_kw: f64,            // Installed cost per kW of panels

    // Billing
    pub tax_rate: f64, // Flat tax applied on top of the municipality fee

    // Environment
    pub co2_saved_per_kwh: f64, // kg of CO₂ avoided per kWh generated
    pub tree_factor: f64,       // Tree equivalents per 10 kWh generated

    // Seasonal profiles
    pub variation: f64, // Random month/year variation amplitude (0.05 = ±5%)
}

impl Default for SystemConstants {
    fn default() -> Self {
        Self {
            panel_power_kw: 0.55,
            panel_area_m2: 2.6,

            system_efficiency: 0.789,
            system_lifetime_years: 25,
            cost_per_kw: 9000.0,

            tax_rate: 0.12,

            co2_saved_per_kwh: 0.45,
            tree_factor: 0.2,

            variation: 0.05,
        }
    }
}

impl SystemConstants {
    /// Parse constants from TOML; absent keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let constants: SystemConstants =
            toml::from_str(content).context("Failed to parse system constants")?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid constants file: {}", path.display()))
    }

    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("panel_power_kw", self.panel_power_kw),
            ("panel_area_m2", self.panel_area_m2),
            ("system_efficiency", self.system_efficiency),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("cost_per_kw", self.cost_per_kw),
            ("tax_rate", self.tax_rate),
            ("co2_saved_per_kwh", self.co2_saved_per_kwh),
            ("tree_factor", self.tree_factor),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        if self.system_lifetime_years == 0 {
            return Err(CalcError::InvalidConfig(
                "system_lifetime_years must be at least 1".to_string(),
            ));
        }
        if !(0.0..=0.5).contains(&self.variation) {
            return Err(CalcError::InvalidConfig(format!(
                "variation must be within [0, 0.5], got {}",
                self.variation
            )));
        }
        Ok(())
    }
}

/// A lookup table that may not have been fetched yet.
///
/// `NotLoaded` is distinct from a loaded table that happens to be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TableState<T> {
    #[default]
    NotLoaded,
    Loaded(T),
}

impl<T> TableState<T> {
    pub fn get(&self, table: &'static str) -> CalcResult<&T> {
        match self {
            TableState::Loaded(value) => Ok(value),
            TableState::NotLoaded => Err(CalcError::TableNotLoaded { table }),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, TableState::Loaded(_))
    }
}

/// Configuration handed to every calculation: constants plus lookup tables.
#[derive(Debug, Clone, Default)]
pub struct CalculatorContext {
    pub constants: SystemConstants,
    pub tariffs: TableState<TariffTable>,
    pub irradiance: TableState<IrradianceTables>,
}

impl CalculatorContext {
    /// Context with constants only; tables still have to be loaded.
    pub fn new(constants: SystemConstants) -> Self {
        Self {
            constants,
            tariffs: TableState::NotLoaded,
            irradiance: TableState::NotLoaded,
        }
    }

    pub fn with_tables(
        constants: SystemConstants,
        tariffs: TariffTable,
        irradiance: IrradianceTables,
    ) -> Self {
        Self {
            constants,
            tariffs: TableState::Loaded(tariffs),
            irradiance: TableState::Loaded(irradiance),
        }
    }

    /// Load all three JSON tables from a data directory.
    pub fn load_from_dir(constants: SystemConstants, data_dir: &Path) -> Result<Self> {
        let tariffs = load_tariff_table(&data_dir.join(PRICING_FILE))?;
        let irradiance = load_irradiance_tables(
            &data_dir.join(ANNUAL_IRRADIANCE_FILE),
            &data_dir.join(MONTHLY_IRRADIANCE_FILE),
        )?;
        info!(
            "Loaded {} distributors and {} departments from {}",
            tariffs.mapping.len(),
            irradiance.annual.len(),
            data_dir.display()
        );
        Ok(Self::with_tables(constants, tariffs, irradiance))
    }

    pub fn tariff(&self, key: &TariffKey) -> CalcResult<&TariffRecord> {
        self.tariffs
            .get("tariff")?
            .lookup(key)
            .ok_or_else(|| CalcError::MissingConfigData {
                table: "tariff",
                key: key.display(),
            })
    }

    pub fn annual_irradiance(&self, department: &str) -> CalcResult<f64> {
        self.irradiance
            .get("irradiance")?
            .annual_for(department)
            .ok_or_else(|| CalcError::MissingConfigData {
                table: "annual irradiance",
                key: department.to_string(),
            })
    }

    /// Twelve monthly irradiance values; any other length is invalid input.
    pub fn monthly_irradiance(&self, department: &str) -> CalcResult<[f64; MONTHS_PER_YEAR]> {
        let values = self
            .irradiance
            .get("irradiance")?
            .monthly_for(department)
            .ok_or_else(|| CalcError::MissingConfigData {
                table: "monthly irradiance",
                key: department.to_string(),
            })?;
        values.try_into().map_err(|_| {
            CalcError::InvalidInput(format!(
                "monthly irradiance for {} has {} values, expected {}",
                department,
                values.len(),
                MONTHS_PER_YEAR
            ))
        })
    }

    /// Departments available for selection, in table order.
    pub fn departments(&self) -> CalcResult<Vec<String>> {
        Ok(self
            .irradiance
            .get("irradiance")?
            .departments()
            .map(str::to_string)
            .collect())
    }
}

/// Load `distributor -> rate type -> department -> tariff` from JSON.
pub fn load_tariff_table(path: &Path) -> Result<TariffTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let table: TariffTable = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pricing table: {}", path.display()))?;
    for (distributor, rate_types) in &table.mapping {
        for (rate_type, departments) in &rate_types.mapping {
            for (department, record) in &departments.mapping {
                if !record.is_valid() {
                    anyhow::bail!(
                        "Invalid tariff for {} / {} / {} in {}",
                        distributor,
                        rate_type,
                        department,
                        path.display()
                    );
                }
            }
        }
    }
    debug!("Pricing table {} has {} distributors", path.display(), table.mapping.len());
    Ok(table)
}

/// Load the annual and monthly irradiance tables from JSON.
pub fn load_irradiance_tables(annual_path: &Path, monthly_path: &Path) -> Result<IrradianceTables> {
    let annual_content = fs::read_to_string(annual_path)
        .with_context(|| format!("Failed to open file: {}", annual_path.display()))?;
    let annual = serde_json::from_str(&annual_content).with_context(|| {
        format!("Failed to parse annual irradiance: {}", annual_path.display())
    })?;

    let monthly_content = fs::read_to_string(monthly_path)
        .with_context(|| format!("Failed to open file: {}", monthly_path.display()))?;
    let monthly = serde_json::from_str(&monthly_content).with_context(|| {
        format!("Failed to parse monthly irradiance: {}", monthly_path.display())
    })?;

    Ok(IrradianceTables::new(annual, monthly))
}
