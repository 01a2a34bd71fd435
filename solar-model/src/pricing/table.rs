use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::general::location::TariffKey;
use crate::pricing::tariff::TariffRecord;

/// Tariffs of one rate type, keyed by department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentMapping {
    pub mapping: IndexMap<String, TariffRecord>,
}

impl DepartmentMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, department: &str) -> Option<&TariffRecord> {
        self.mapping.get(department)
    }

    pub fn insert(&mut self, department: impl Into<String>, record: TariffRecord) {
        self.mapping.insert(department.into(), record);
    }
}

/// Rate types of one distributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTypeMapping {
    pub mapping: IndexMap<String, DepartmentMapping>,
}

impl RateTypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, rate_type: &str) -> Option<&DepartmentMapping> {
        self.mapping.get(rate_type)
    }

    pub fn insert(&mut self, rate_type: impl Into<String>, departments: DepartmentMapping) {
        self.mapping.insert(rate_type.into(), departments);
    }
}

/// Full pricing table: `distributor -> rate type -> department -> tariff`.
///
/// Deserializes straight from the published `pricing.json` layout. Key order
/// is kept as it appears in the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffTable {
    pub mapping: IndexMap<String, RateTypeMapping>,
}

impl TariffTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, distributor: &str) -> Option<&RateTypeMapping> {
        self.mapping.get(distributor)
    }

    pub fn insert(&mut self, distributor: impl Into<String>, rate_types: RateTypeMapping) {
        self.mapping.insert(distributor.into(), rate_types);
    }

    /// Insert a single record, creating the intermediate levels as needed.
    pub fn insert_record(&mut self, key: &TariffKey, record: TariffRecord) {
        self.mapping
            .entry(key.distributor.clone())
            .or_default()
            .mapping
            .entry(key.rate_type.clone())
            .or_default()
            .insert(key.department.clone(), record);
    }

    /// Resolve the tariff for a key; `None` if any level is absent.
    pub fn lookup(&self, key: &TariffKey) -> Option<&TariffRecord> {
        self.get(&key.distributor)?
            .get(&key.rate_type)?
            .get(&key.department)
    }

    pub fn distributors(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
