pub mod error;
pub mod general;
pub mod sizing;

// Re-export commonly used items for convenience
pub use error::{CalcError, CalcResult};
pub use sizing::calculation::{CalculationRequest, run_calculation};
pub use sizing::config::{CalculatorContext, SystemConstants};
