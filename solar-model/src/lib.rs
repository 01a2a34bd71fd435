pub mod general;
pub mod irradiance;
pub mod pricing;
pub mod results;
