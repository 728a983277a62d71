//! Exchange Rate Providers
//!
//! Adapters implementing the [`RateProvider`](fx_types::RateProvider) port:
//!
//! - [`HttpRateProvider`] issues a single GET against an upstream rate API
//!   returning `{success, timestamp, base, date, rates, error?}` and turns the
//!   payload into a [`RateTable`](fx_types::RateTable).
//! - [`StaticRateProvider`] serves a fixed table. Used for offline
//!   development and in tests.
//!
//! # Example
//! ```no_run
//! use exchange_rates::HttpRateProvider;
//! use fx_types::RateProvider;
//!
//! # async fn run() -> Result<(), fx_types::ConversionError> {
//! let provider = HttpRateProvider::new("http://api.exchangeratesapi.io/v1/latest?access_key=KEY");
//! let table = provider.fetch_rates().await?;
//! println!("{} rates relative to {}", table.len(), table.base());
//! # Ok(())
//! # }
//! ```

mod fixed;
mod http;

pub use fixed::StaticRateProvider;
pub use http::{DEFAULT_BASE_CURRENCY, HttpRateProvider};
