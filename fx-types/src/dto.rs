//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body returned by `POST /api/convert/refresh`.
pub const REFRESH_MESSAGE: &str = "Exchange rates refreshed successfully";

/// Query string of `GET /api/convert`.
///
/// Every field is optional so that the handler can report exactly which
/// parameter is missing instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    /// Amount to convert, must be greater than zero
    #[param(example = "100.0")]
    pub monto: Option<String>,
    /// Source currency (ISO 4217)
    #[serde(rename = "divisaEntrada")]
    #[param(example = "USD")]
    pub divisa_entrada: Option<String>,
    /// Target currency (ISO 4217)
    #[serde(rename = "divisaSalida")]
    #[param(example = "EUR")]
    pub divisa_salida: Option<String>,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(value_type = String, example = "2025-04-10T12:00:00.123")]
    pub timestamp: NaiveDateTime,
    #[schema(example = 400)]
    pub status: u16,
    #[schema(example = "Bad Request")]
    pub error: String,
    #[schema(example = "Amount must be greater than zero")]
    pub message: String,
    /// Per-field validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}
