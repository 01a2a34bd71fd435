use serde::{Deserialize, Serialize};

/// Charges applied by a distributor for one rate type in one department.
///
/// Field names follow the camelCase keys of the published pricing tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffRecord {
    /// Fixed monthly charge, independent of consumption
    pub fixed_charge: f64,
    /// Energy price per kWh
    pub price_per_kwh: f64,
    /// Municipality fee as a fraction of the subtotal (0.13 = 13%)
    pub municipality_fee: f64,
}

impl TariffRecord {
    pub fn new(fixed_charge: f64, price_per_kwh: f64, municipality_fee: f64) -> Self {
        Self {
            fixed_charge,
            price_per_kwh,
            municipality_fee,
        }
    }

    /// Subtotal before municipality fee and tax for the given consumption.
    pub fn subtotal(&self, consumption_kwh: f64) -> f64 {
        self.fixed_charge + consumption_kwh * self.price_per_kwh
    }

    /// Subtotal with the municipality fee applied.
    pub fn with_municipality_fee(&self, consumption_kwh: f64) -> f64 {
        self.subtotal(consumption_kwh) * (1.0 + self.municipality_fee)
    }

    /// A record is usable when every charge is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.fixed_charge, self.price_per_kwh, self.municipality_fee]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal() {
        let record = TariffRecord::new(10.0, 1.5, 0.1);
        assert_eq!(record.subtotal(0.0), 10.0);
        assert_eq!(record.subtotal(100.0), 160.0);
    }

    #[test]
    fn test_with_municipality_fee() {
        let record = TariffRecord::new(10.0, 1.0, 0.5);
        assert!((record.with_municipality_fee(10.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"fixedCharge": 12.5, "pricePerKwh": 1.9, "municipalityFee": 0.13}"#;
        let record: TariffRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, TariffRecord::new(12.5, 1.9, 0.13));
    }

    #[test]
    fn test_is_valid() {
        assert!(TariffRecord::new(0.0, 0.0, 0.0).is_valid());
        assert!(!TariffRecord::new(-1.0, 1.0, 0.1).is_valid());
        assert!(!TariffRecord::new(1.0, f64::NAN, 0.1).is_valid());
    }
}
