use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of months in a monthly irradiance profile.
pub const MONTHS_PER_YEAR: usize = 12;

/// Solar irradiance per department, in kWh/m²/day.
///
/// `annual` is the yearly average used for sizing; `monthly` holds the
/// January..December averages used for the month-by-month generation estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrradianceTables {
    pub annual: IndexMap<String, f64>,
    pub monthly: IndexMap<String, Vec<f64>>,
}

impl IrradianceTables {
    pub fn new(annual: IndexMap<String, f64>, monthly: IndexMap<String, Vec<f64>>) -> Self {
        Self { annual, monthly }
    }

    pub fn annual_for(&self, department: &str) -> Option<f64> {
        self.annual.get(department).copied()
    }

    /// Monthly profile as stored; callers check it holds twelve values.
    pub fn monthly_for(&self, department: &str) -> Option<&[f64]> {
        self.monthly.get(department).map(Vec::as_slice)
    }

    /// Departments in the order of the annual table.
    pub fn departments(&self) -> impl Iterator<Item = &str> {
        self.annual.keys().map(String::as_str)
    }
}
