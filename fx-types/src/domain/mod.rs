//! Domain models for the conversion service.

pub mod conversion;
pub mod currency;
pub mod rates;

pub use conversion::ConversionResult;
pub use currency::CurrencyCode;
pub use rates::RateTable;
