//! Rate table snapshot.

use std::collections::HashMap;

use super::currency::CurrencyCode;

/// The full set of currency rates returned by one upstream call.
///
/// Every rate is relative to `base`, which is always present at `1.0`.
/// A table is never mutated after construction; a refresh replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: CurrencyCode,
    as_of_date: Option<String>,
    rates: HashMap<CurrencyCode, f64>,
}

impl RateTable {
    /// Builds a table from upstream entries. The base currency is forced to
    /// `1.0` even if the entries carry a different value for it.
    pub fn new(
        base: CurrencyCode,
        as_of_date: Option<String>,
        entries: impl IntoIterator<Item = (CurrencyCode, f64)>,
    ) -> Self {
        let mut rates: HashMap<CurrencyCode, f64> = entries.into_iter().collect();
        rates.insert(base.clone(), 1.0);
        Self {
            base,
            as_of_date,
            rates,
        }
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Date the upstream reported for this snapshot, verbatim.
    pub fn as_of_date(&self) -> Option<&str> {
        self.as_of_date.as_deref()
    }

    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, rate)| (code, *rate))
    }
}
