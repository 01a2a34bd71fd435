pub mod calculation;
pub mod config;
pub mod cost_comparison;
pub mod plot;
pub mod report;
pub mod seasonal_profile;
pub mod system_size;
