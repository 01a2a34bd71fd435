use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{CalcError, CalcResult};

/// Number of monthly readings taken from a household bill history.
pub const READINGS: usize = 4;

/// Days per month, non-leap year
pub const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Four monthly consumption readings in kWh, as printed on past bills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionSample {
    readings: [f64; READINGS],
}

impl ConsumptionSample {
    /// Validate the readings: each must be finite and non-negative, and at
    /// least one must be positive so there is something to size for.
    pub fn new(readings: [f64; READINGS]) -> CalcResult<Self> {
        if let Some(bad) = readings.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(CalcError::InvalidInput(format!(
                "consumption readings must be non-negative numbers, got {}",
                bad
            )));
        }
        if readings.iter().all(|r| *r == 0.0) {
            return Err(CalcError::InvalidInput(
                "at least one consumption reading must be positive".to_string(),
            ));
        }
        Ok(Self { readings })
    }

    pub fn readings(&self) -> &[f64; READINGS] {
        &self.readings
    }

    /// Arithmetic mean of the readings (kWh/month).
    pub fn average(&self) -> f64 {
        let [m1, m2, m3, m4] = self.readings;
        average_monthly_consumption(m1, m2, m3, m4)
    }
}

/// `(m1 + m2 + m3 + m4) / 4`
pub fn average_monthly_consumption(m1: f64, m2: f64, m3: f64, m4: f64) -> f64 {
    (m1 + m2 + m3 + m4) / 4.0
}

/// Loads the four monthly readings from a text file, one value per line
///
/// # Arguments
/// * `file_path` - Path to the file; blank lines and lines starting with `#` are skipped,
///   a decimal comma is accepted
///
/// # Returns
/// * The validated consumption sample
pub fn load_consumption_history(file_path: &Path) -> Result<ConsumptionSample> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    let reader = BufReader::new(file);
    let mut values = Vec::with_capacity(READINGS);

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value: f64 = trimmed.replace(',', ".").parse().with_context(|| {
            format!(
                "Failed to parse value on line {}: '{}'",
                line_num + 1,
                trimmed
            )
        })?;
        values.push(value);
    }

    let readings: [f64; READINGS] = values.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "Consumption history must contain exactly {} readings, got {}",
            READINGS,
            values.len()
        )
    })?;

    Ok(ConsumptionSample::new(readings)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_monthly_consumption() {
        assert_eq!(average_monthly_consumption(100.0, 200.0, 300.0, 400.0), 250.0);
        assert_eq!(average_monthly_consumption(0.0, 0.0, 0.0, 4.0), 1.0);
    }

    #[test]
    fn test_sample_validation() {
        assert!(ConsumptionSample::new([100.0, 120.0, 90.0, 110.0]).is_ok());
        assert!(matches!(
            ConsumptionSample::new([100.0, -1.0, 90.0, 110.0]),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            ConsumptionSample::new([100.0, f64::NAN, 90.0, 110.0]),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            ConsumptionSample::new([0.0; 4]),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_days_per_month() {
        assert_eq!(DAYS_PER_MONTH.iter().sum::<u32>(), 365);
        assert_eq!(MONTH_LABELS.len(), DAYS_PER_MONTH.len());
    }

    #[test]
    fn test_load_consumption_history() {
        let test_data = "# kWh per month\n210\n195,5\n\n230\n188\n";
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(&temp_file, test_data).unwrap();

        let sample = load_consumption_history(temp_file.path()).unwrap();
        assert_eq!(sample.readings(), &[210.0, 195.5, 230.0, 188.0]);
        assert!((sample.average() - 205.875).abs() < 1e-12);
    }

    #[test]
    fn test_load_consumption_history_wrong_count() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(&temp_file, "210\n195\n230\n").unwrap();

        let err = load_consumption_history(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("exactly 4 readings"));
    }

    #[test]
    fn test_load_consumption_history_bad_value() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(&temp_file, "210\nabc\n230\n100\n").unwrap();

        assert!(load_consumption_history(temp_file.path()).is_err());
    }
}
