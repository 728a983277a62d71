//! Conversion result model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyCode;

/// Outcome of converting an amount between two currencies.
///
/// Field names on the wire are the public API's (`divisaEntrada`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversionResult {
    /// Source currency code
    #[serde(rename = "divisaEntrada")]
    pub source_currency: CurrencyCode,
    /// Target currency code
    #[serde(rename = "divisaSalida")]
    pub target_currency: CurrencyCode,
    /// Amount requested, in source currency
    #[serde(rename = "montoEntrada")]
    #[schema(example = 100.0)]
    pub input_amount: f64,
    /// Converted amount rounded half-up to 2 decimals
    #[serde(rename = "montoSalida")]
    #[schema(example = 90.91)]
    pub output_amount: f64,
    /// target rate / source rate
    #[serde(rename = "tasaConversion")]
    #[schema(example = 0.9090909090909091)]
    pub cross_rate: f64,
    /// As-of date of the rate snapshot used
    #[serde(rename = "fechaConversion")]
    #[schema(value_type = String, example = "2025-04-10")]
    pub conversion_date: NaiveDate,
}
