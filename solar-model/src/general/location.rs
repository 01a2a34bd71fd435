use serde::{Deserialize, Serialize};

/// Identifies the tariff that applies to a household: who delivers the
/// electricity, under which rate type, and in which department.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffKey {
    /// Electricity distributor (e.g. "EEGSA")
    pub distributor: String,
    /// Rate type offered by the distributor (e.g. "BTS")
    pub rate_type: String,
    /// Department (region) of the installation, also the irradiance key
    pub department: String,
}

impl TariffKey {
    pub fn new(
        distributor: impl Into<String>,
        rate_type: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        TariffKey {
            distributor: distributor.into(),
            rate_type: rate_type.into(),
            department: department.into(),
        }
    }

    /// Get full display string for the key
    pub fn display(&self) -> String {
        format!(
            "{} / {} / {}",
            self.distributor, self.rate_type, self.department
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let key = TariffKey::new("EEGSA", "BTS", "Guatemala");
        assert_eq!(key.display(), "EEGSA / BTS / Guatemala");
    }

    #[test]
    fn test_serialize_camel_case() {
        let key = TariffKey::new("EEGSA", "BTS", "Guatemala");
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.contains("\"rateType\":\"BTS\""));
    }
}
