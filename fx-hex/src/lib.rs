//! # FX Hex
//!
//! Application service layer and HTTP adapter for the conversion service.
//!
//! ## Architecture
//!
//! - `cache/` - Memoizing rate table cache
//! - `service/` - Application service (validates, looks up, converts)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: RateProvider`, allowing
//! different upstream implementations to be injected.

pub mod cache;
pub mod inbound;
pub mod openapi;
pub mod service;


pub use cache::RateCache;
pub use service::ConversionService;
