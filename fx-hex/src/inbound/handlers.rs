//! HTTP request handlers.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use fx_types::{
    AppError, ConversionError, ConversionResult, ConvertQuery, ErrorResponse, REFRESH_MESSAGE,
    RateProvider,
};

use crate::ConversionService;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider> {
    pub service: ConversionService<P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match self.0 {
            AppError::BadRequest(msg) => {
                tracing::warn!("Conversion request rejected: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad Request", msg, None)
            }
            err @ AppError::MissingParameter(_) => {
                let msg = err.to_string();
                tracing::warn!("{}", msg);
                (StatusCode::BAD_REQUEST, "Missing Parameter", msg, None)
            }
            AppError::Validation(details) => {
                tracing::warn!(?details, "Validation error");
                (
                    StatusCode::BAD_REQUEST,
                    "Validation Error",
                    "Input validation failed".to_string(),
                    Some(details),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Unhandled error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            timestamp: chrono::Local::now().naive_local(),
            status: status.as_u16(),
            error: error.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Turns a handler panic into the generic 500 body.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError(AppError::Internal(detail)).into_response()
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Validated `GET /api/convert` parameters.
#[derive(Debug)]
struct ConvertParams {
    amount: f64,
    source: String,
    target: String,
}

impl TryFrom<ConvertQuery> for ConvertParams {
    type Error = AppError;

    fn try_from(query: ConvertQuery) -> Result<Self, Self::Error> {
        fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
            value.ok_or_else(|| AppError::MissingParameter(name.to_string()))
        }

        let monto = required(query.monto, "monto")?;
        let source = required(query.divisa_entrada, "divisaEntrada")?;
        let target = required(query.divisa_salida, "divisaSalida")?;

        let amount = match monto.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => {
                let details = BTreeMap::from([(
                    "monto".to_string(),
                    format!("must be a number, got '{}'", monto),
                )]);
                return Err(AppError::Validation(details));
            }
        };

        if amount <= 0.0 {
            return Err(ConversionError::InvalidAmount.into());
        }

        let source = source.trim();
        if source.is_empty() {
            return Err(AppError::BadRequest("Source currency is required".into()));
        }

        let target = target.trim();
        if target.is_empty() {
            return Err(AppError::BadRequest("Target currency is required".into()));
        }

        Ok(Self {
            amount,
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

/// Convert an amount between two currencies.
#[tracing::instrument(skip(state))]
pub async fn convert<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConversionResult>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let params = ConvertParams::try_from(query)?;

    tracing::info!(
        "Conversion request: {} {} to {}",
        params.amount,
        params.source,
        params.target
    );

    let result = state
        .service
        .convert(&params.source, &params.target, params.amount)
        .await?;
    Ok(Json(result))
}

/// Invalidate the cached rate table.
#[tracing::instrument(skip(state))]
pub async fn refresh<P: RateProvider>(State(state): State<Arc<AppState<P>>>) -> &'static str {
    tracing::info!("Rate refresh requested");
    state.service.refresh();
    REFRESH_MESSAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(monto: Option<&str>, from: Option<&str>, to: Option<&str>) -> ConvertQuery {
        ConvertQuery {
            monto: monto.map(String::from),
            divisa_entrada: from.map(String::from),
            divisa_salida: to.map(String::from),
        }
    }

    #[test]
    fn test_valid_params_are_trimmed() {
        let params = ConvertParams::try_from(query(Some("100.5"), Some(" usd "), Some("EUR")))
            .unwrap();
        assert_eq!(params.amount, 100.5);
        assert_eq!(params.source, "usd");
        assert_eq!(params.target, "EUR");
    }

    #[test]
    fn test_missing_params_in_declaration_order() {
        let err = ConvertParams::try_from(query(None, None, None)).unwrap_err();
        assert_eq!(err.to_string(), "Missing request parameter: monto");

        let err = ConvertParams::try_from(query(Some("1"), None, Some("EUR"))).unwrap_err();
        assert_eq!(err.to_string(), "Missing request parameter: divisaEntrada");

        let err = ConvertParams::try_from(query(Some("1"), Some("USD"), None)).unwrap_err();
        assert_eq!(err.to_string(), "Missing request parameter: divisaSalida");
    }

    #[test]
    fn test_non_numeric_amount() {
        for bad in ["abc", "", "NaN", "inf"] {
            let err = ConvertParams::try_from(query(Some(bad), Some("USD"), Some("EUR")))
                .unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref d) if d.contains_key("monto")),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_amount_and_blank_codes() {
        let err = ConvertParams::try_from(query(Some("0"), Some("USD"), Some("EUR"))).unwrap_err();
        assert_eq!(err.to_string(), "Amount must be greater than zero");

        let err = ConvertParams::try_from(query(Some("5"), Some("  "), Some("EUR"))).unwrap_err();
        assert_eq!(err.to_string(), "Source currency is required");

        let err = ConvertParams::try_from(query(Some("5"), Some("USD"), Some(""))).unwrap_err();
        assert_eq!(err.to_string(), "Target currency is required");
    }
}
