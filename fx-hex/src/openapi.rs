//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use fx_types::{ConversionResult, ConvertQuery, CurrencyCode, ErrorResponse};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Convert an amount between two currencies
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "conversion",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Conversion result", body = ConversionResult),
        (status = 400, description = "Missing or invalid parameters, unknown currency, or upstream rate API failure", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
async fn convert() {}

/// Drop the cached rate table
#[utoipa::path(
    post,
    path = "/api/convert/refresh",
    tag = "conversion",
    responses(
        (status = 200, description = "Cache invalidated; the next conversion fetches fresh rates", body = String, content_type = "text/plain", example = "Exchange rates refreshed successfully")
    )
)]
async fn refresh() {}

/// OpenAPI documentation for the conversion API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Conversion API",
        version = "1.0.0",
        description = "Converts amounts between currencies using live rates from an upstream rate API.\n\nRates are cached as a single snapshot until `POST /api/convert/refresh` is called.",
        license(name = "MIT"),
    ),
    paths(health, convert, refresh),
    components(schemas(ConversionResult, ErrorResponse, CurrencyCode)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "conversion", description = "Currency conversion and rate cache control"),
    )
)]
pub struct ApiDoc;
