//! Upstream rate API client.

use std::collections::HashMap;

use async_trait::async_trait;
use fx_types::{ConversionError, CurrencyCode, RateProvider, RateTable};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// Base used when the upstream payload does not name one.
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

const FETCH_FAILED: &str = "Failed to fetch exchange rates from external API";

/// Payload of the upstream rate API.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    #[serde(default)]
    success: bool,
    timestamp: Option<i64>,
    base: Option<String>,
    date: Option<String>,
    #[serde(default)]
    rates: HashMap<String, Option<f64>>,
    error: Option<UpstreamErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    code: Option<serde_json::Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl RatesPayload {
    fn error_message(&self) -> String {
        let info = self
            .error
            .as_ref()
            .and_then(|e| e.info.as_deref())
            .unwrap_or("Unknown error");
        format!("Exchange rate API error: {info}")
    }
}

/// Fetches the full rate table from a configured URL.
///
/// One attempt per call, no timeout beyond the transport default. Callers
/// are expected to cache the result.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    url: String,
    default_base: CurrencyCode,
    http: Client,
}

impl HttpRateProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            default_base: CurrencyCode::parse(DEFAULT_BASE_CURRENCY)
                .expect("default base currency is a valid code"),
            http: Client::new(),
        }
    }

    /// Overrides the base assumed when the payload omits `base`.
    pub fn with_default_base(mut self, base: CurrencyCode) -> Self {
        self.default_base = base;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL without its query string, which usually carries the access key.
    pub fn redacted_url(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    fn connect_error(detail: impl std::fmt::Display) -> ConversionError {
        ConversionError::Upstream(format!(
            "Failed to connect to exchange rate API: {detail}"
        ))
    }

    fn build_table(&self, payload: RatesPayload) -> RateTable {
        let base = match payload.base.as_deref().map(CurrencyCode::parse) {
            Some(Ok(base)) => base,
            Some(Err(_)) | None => self.default_base.clone(),
        };

        let entries = payload
            .rates
            .into_iter()
            .filter_map(|(code, rate)| match (CurrencyCode::parse(&code), rate) {
                (Ok(parsed), Some(rate)) if rate.is_finite() && rate > 0.0 => Some((parsed, rate)),
                (Ok(_), rate) => {
                    warn!(code = %code, ?rate, "Skipping unusable rate in rate payload");
                    None
                }
                (Err(_), _) => {
                    warn!(code = %code, "Skipping malformed currency code in rate payload");
                    None
                }
            });

        RateTable::new(base, payload.date, entries)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    #[tracing::instrument(skip(self), fields(url = %self.redacted_url()))]
    async fn fetch_rates(&self) -> Result<RateTable, ConversionError> {
        info!("Fetching exchange rates from upstream API");

        let response = self.http.get(&self.url).send().await.map_err(|e| {
            error!(error = %e, "Exchange rate request failed");
            Self::connect_error(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read exchange rate response body");
            Self::connect_error(e)
        })?;

        if !status.is_success() {
            error!(%status, "Exchange rate API returned a non-success status");
            // Providers usually still send a structured error body.
            return match serde_json::from_str::<RatesPayload>(&body) {
                Ok(payload) if payload.error.is_some() => {
                    Err(ConversionError::Upstream(payload.error_message()))
                }
                _ => Err(ConversionError::Upstream(FETCH_FAILED.into())),
            };
        }

        if body.trim().is_empty() {
            error!(%status, "Exchange rate API returned an empty body");
            return Err(ConversionError::Upstream(FETCH_FAILED.into()));
        }

        let payload: RatesPayload = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, response = %body, "Failed to parse exchange rate response");
            Self::connect_error(e)
        })?;

        if !payload.success {
            let message = payload.error_message();
            if let Some(err) = &payload.error {
                error!(code = ?err.code, kind = ?err.kind, "{message}");
            } else {
                error!("{message}");
            }
            return Err(ConversionError::Upstream(message));
        }

        debug!(timestamp = ?payload.timestamp, date = ?payload.date, "Upstream snapshot");
        let table = self.build_table(payload);
        info!(count = table.len(), base = %table.base(), "Fetched exchange rates");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OK_JSON: &str = r#"{
        "success": true,
        "timestamp": 1744279200,
        "base": "EUR",
        "date": "2025-04-10",
        "rates": { "USD": 1.1, "GBP": 0.85, "jpy": 161.2 }
    }"#;

    async fn mock_upstream(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider_for(server: &MockServer) -> HttpRateProvider {
        HttpRateProvider::new(format!("{}/v1/latest", server.uri()))
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_rates_success() {
        let server = mock_upstream(ResponseTemplate::new(200).set_body_string(OK_JSON)).await;
        let table = provider_for(&server).fetch_rates().await.unwrap();

        assert_eq!(table.base(), &code("EUR"));
        assert_eq!(table.as_of_date(), Some("2025-04-10"));
        assert_eq!(table.rate(&code("EUR")), Some(1.0));
        assert_eq!(table.rate(&code("USD")), Some(1.1));
        assert_eq!(table.rate(&code("GBP")), Some(0.85));
        // lower-case keys are normalized on write
        assert_eq!(table.rate(&code("JPY")), Some(161.2));
        assert_eq!(table.len(), 4);
    }

    #[tokio::test]
    async fn test_upstream_reported_failure() {
        let body = r#"{"success": false, "error": {"code": 104, "type": "usage_limit_reached", "info": "rate limit exceeded"}}"#;
        let server = mock_upstream(ResponseTemplate::new(200).set_body_string(body)).await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        match err {
            ConversionError::Upstream(msg) => assert!(msg.contains("rate limit exceeded"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_without_error_body() {
        let server =
            mock_upstream(ResponseTemplate::new(200).set_body_string(r#"{"success": false}"#))
                .await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        assert_eq!(
            err,
            ConversionError::Upstream("Exchange rate API error: Unknown error".into())
        );
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = mock_upstream(ResponseTemplate::new(503)).await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        assert_eq!(err, ConversionError::Upstream(FETCH_FAILED.into()));
    }

    #[tokio::test]
    async fn test_non_success_status_with_error_body() {
        let body = r#"{"success": false, "error": {"code": 101, "info": "invalid access key"}}"#;
        let server = mock_upstream(ResponseTemplate::new(401).set_body_string(body)).await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        assert_eq!(
            err,
            ConversionError::Upstream("Exchange rate API error: invalid access key".into())
        );
    }

    #[tokio::test]
    async fn test_empty_body() {
        let server = mock_upstream(ResponseTemplate::new(200)).await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        assert_eq!(err, ConversionError::Upstream(FETCH_FAILED.into()));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = mock_upstream(ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = provider_for(&server).fetch_rates().await.unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Upstream(ref msg) if msg.starts_with("Failed to connect to exchange rate API")
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on port 9 in the test environment.
        let provider = HttpRateProvider::new("http://127.0.0.1:9/v1/latest");

        let err = provider.fetch_rates().await.unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Upstream(ref msg) if msg.starts_with("Failed to connect to exchange rate API")
        ));
    }

    #[test]
    fn test_redacted_url() {
        let provider = HttpRateProvider::new("http://api.test/v1/latest?access_key=secret");
        assert_eq!(provider.redacted_url(), "http://api.test/v1/latest");
        assert_eq!(provider.url(), "http://api.test/v1/latest?access_key=secret");
    }

    #[tokio::test]
    async fn test_missing_base_uses_default() {
        let body = r#"{"success": true, "rates": {"EUR": 0.92, "bad-code": 3.0, "XAU": 0.0}}"#;
        let server = mock_upstream(ResponseTemplate::new(200).set_body_string(body)).await;

        let table = provider_for(&server)
            .with_default_base(code("USD"))
            .fetch_rates()
            .await
            .unwrap();

        assert_eq!(table.base(), &code("USD"));
        assert_eq!(table.rate(&code("USD")), Some(1.0));
        assert_eq!(table.rate(&code("EUR")), Some(0.92));
        assert_eq!(table.as_of_date(), None);
        assert_eq!(table.len(), 2);
    }

    #[tokio::test]
    async fn test_null_rate_is_skipped() {
        let body = r#"{"success": true, "base": "EUR", "date": "2025-04-10",
            "rates": {"USD": 1.1, "VEF": null, "GBP": 0.85}}"#;
        let server = mock_upstream(ResponseTemplate::new(200).set_body_string(body)).await;

        let table = provider_for(&server).fetch_rates().await.unwrap();

        assert_eq!(table.rate(&code("USD")), Some(1.1));
        assert_eq!(table.rate(&code("GBP")), Some(0.85));
        assert_eq!(table.rate(&code("VEF")), None);
        assert_eq!(table.len(), 3);
    }
}
