//! Fixed-table provider for development and testing.

use async_trait::async_trait;
use fx_types::{ConversionError, CurrencyCode, RateProvider, RateTable};

// ─────────────────────────────────────────────────────────────────────────────
// Development rates, EUR based. Add new currencies here.
// ─────────────────────────────────────────────────────────────────────────────

const DEV_BASE: &str = "EUR";

const DEV_RATES: &[(&str, f64)] = &[
    ("USD", 1.087),
    ("GBP", 0.8586),
    ("INR", 90.357),
    ("JPY", 161.2),
    ("CHF", 0.9612),
    ("MXN", 21.93),
];

/// Serves the same table on every fetch.
///
/// The table's as-of date is stamped with the current UTC date at fetch
/// time unless the table already carries one.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// Builds a provider from `(code, rate)` pairs.
    pub fn from_pairs(base: &str, pairs: &[(&str, f64)]) -> Result<Self, ConversionError> {
        let base = CurrencyCode::parse(base)?;
        let entries = pairs
            .iter()
            .map(|(code, rate)| Ok((CurrencyCode::parse(code)?, *rate)))
            .collect::<Result<Vec<_>, ConversionError>>()?;
        Ok(Self::new(RateTable::new(base, None, entries)))
    }

    /// The built-in development table.
    pub fn development() -> Self {
        Self::from_pairs(DEV_BASE, DEV_RATES).expect("development rates use valid codes")
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self) -> Result<RateTable, ConversionError> {
        if self.table.as_of_date().is_some() {
            return Ok(self.table.clone());
        }
        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        Ok(RateTable::new(
            self.table.base().clone(),
            Some(today),
            self.table.iter().map(|(code, rate)| (code.clone(), rate)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_development_table() {
        let provider = StaticRateProvider::development();
        let table = provider.fetch_rates().await.unwrap();

        let eur = CurrencyCode::parse("EUR").unwrap();
        assert_eq!(table.base(), &eur);
        assert_eq!(table.rate(&eur), Some(1.0));
        assert_eq!(table.len(), DEV_RATES.len() + 1);
        assert!(table.as_of_date().is_some());
    }

    #[tokio::test]
    async fn test_keeps_explicit_date() {
        let table = RateTable::new(
            CurrencyCode::parse("USD").unwrap(),
            Some("2025-04-10".into()),
            Vec::new(),
        );
        let provider = StaticRateProvider::new(table);

        let fetched = provider.fetch_rates().await.unwrap();
        assert_eq!(fetched.as_of_date(), Some("2025-04-10"));
    }

    #[test]
    fn test_from_pairs_rejects_bad_codes() {
        let result = StaticRateProvider::from_pairs("EUR", &[("US", 1.1)]);
        assert!(matches!(result, Err(ConversionError::InvalidCurrencyCode(_))));
    }
}
