pub mod table;
pub mod tariff;

pub use table::TariffTable;
pub use tariff::TariffRecord;
