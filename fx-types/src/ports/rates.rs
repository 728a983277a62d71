//! Rate provider port.
//!
//! This trait defines the interface for exchange rate sources.
//! Implementations can be HTTP clients, fixed tables, test fakes, etc.

use crate::domain::RateTable;
use crate::error::ConversionError;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetches a complete rate table in a single attempt.
    ///
    /// Failures are reported as [`ConversionError::Upstream`] and are never
    /// retried by the caller.
    async fn fetch_rates(&self) -> Result<RateTable, ConversionError>;
}

#[async_trait::async_trait]
impl<P: RateProvider + ?Sized> RateProvider for std::sync::Arc<P> {
    async fn fetch_rates(&self) -> Result<RateTable, ConversionError> {
        (**self).fetch_rates().await
    }
}
