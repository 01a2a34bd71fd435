pub mod location;
pub mod preference;
