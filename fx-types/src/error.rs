//! Error types for the conversion service.

use std::collections::BTreeMap;

use crate::domain::CurrencyCode;

/// Conversion-level errors (validation and rate lookup failures).
///
/// Messages are client-facing and are returned verbatim in 400 responses.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// The converted amount does not fit in a finite number.
    #[error("Converted amount is out of range")]
    AmountOutOfRange,

    #[error("Invalid currency code format. Must be in ISO 4217 format (3 letters): {0}")]
    InvalidCurrencyCode(String),

    #[error("Exchange rate not found for currency: {0}")]
    CurrencyNotFound(CurrencyCode),

    /// The rate provider could not produce a table. Carries the full message.
    #[error("{0}")]
    Upstream(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing request parameter: {0}")]
    MissingParameter(String),

    /// Malformed input, keyed by field name.
    #[error("Input validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
