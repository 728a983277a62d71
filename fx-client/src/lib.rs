//! # FX Client SDK
//!
//! A typed Rust client for the currency conversion API.

use fx_types::ConversionResult;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conversion API client.
pub struct FxClient {
    base_url: String,
    http: Client,
}

impl FxClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Converts `amount` from one currency to another.
    pub async fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionResult, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/convert", self.base_url))
            .query(&[
                ("monto", amount.to_string().as_str()),
                ("divisaEntrada", from),
                ("divisaSalida", to),
            ])
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Drops the server's cached rate table. Returns the confirmation text.
    pub async fn refresh(&self) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/convert/refresh", self.base_url))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Self::api_error(status.as_u16(), body))
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(Self::api_error(status.as_u16(), body))
        }
    }

    fn api_error(status: u16, body: String) -> ClientError {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);
        ClientError::Api { status, message }
    }
}
