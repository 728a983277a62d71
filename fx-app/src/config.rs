//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use fx_types::CurrencyCode;

/// Value of `RATES_API_URL` selecting the built-in development table.
pub const STATIC_RATES: &str = "static";

/// Where exchange rates come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RatesSource {
    /// Upstream rate API URL.
    Url(String),
    /// Built-in fixed table, for offline development.
    Static,
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub rates_source: RatesSource,
    pub cache_ttl: Option<Duration>,
    pub default_base: CurrencyCode,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let rates_url = lookup("RATES_API_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("RATES_API_URL environment variable is required"))?;
        let rates_source = if rates_url.eq_ignore_ascii_case(STATIC_RATES) {
            RatesSource::Static
        } else {
            RatesSource::Url(rates_url)
        };

        let cache_ttl = lookup("RATES_CACHE_TTL_SECS")
            .map(|secs| secs.parse::<u64>().map(Duration::from_secs))
            .transpose()
            .map_err(|e| anyhow::anyhow!("RATES_CACHE_TTL_SECS must be whole seconds: {e}"))?;

        let default_base = lookup("RATES_DEFAULT_BASE")
            .unwrap_or_else(|| exchange_rates::DEFAULT_BASE_CURRENCY.to_string());
        let default_base = CurrencyCode::parse(&default_base)?;

        Ok(Self {
            port,
            rates_source,
            cache_ttl,
            default_base,
        })
    }
}
