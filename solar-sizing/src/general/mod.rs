pub mod bill;
pub mod consumption;
pub mod finance;

pub use bill::compute_bill;
pub use finance::{calculate_irr, cumulative_cashflow};

/// Round to cents, the precision every reported amount uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
