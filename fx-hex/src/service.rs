//! Conversion Application Service
//!
//! Orchestrates rate lookups through the rate cache.
//! Contains NO infrastructure logic - pure conversion orchestration.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, warn};

use fx_types::{ConversionError, ConversionResult, CurrencyCode, RateProvider, RateTable};

use crate::cache::RateCache;

/// Decimal places of every converted amount.
const OUTPUT_SCALE: u32 = 2;

/// Application service for currency conversion.
///
/// Generic over `P: RateProvider` - the upstream adapter is injected at compile time.
/// This enables:
/// - Swapping the upstream without code changes
/// - Testing with a fake provider and asserting fetch counts
pub struct ConversionService<P: RateProvider> {
    cache: RateCache<P>,
}

impl<P: RateProvider> ConversionService<P> {
    /// Creates a new conversion service over the given cache.
    pub fn new(cache: RateCache<P>) -> Self {
        Self { cache }
    }

    /// Returns a reference to the underlying cache.
    pub fn cache(&self) -> &RateCache<P> {
        &self.cache
    }

    /// Returns the rate of `code` relative to the table's base currency.
    #[tracing::instrument(skip(self))]
    pub async fn get_rate(&self, code: &str) -> Result<f64, ConversionError> {
        let code = CurrencyCode::parse(code)?;
        let table = self.cache.get_rates().await?;
        lookup(&table, &code)
    }

    /// Converts `amount` of `source` into `target`.
    ///
    /// Both rates and the conversion date come from the same cached snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn convert(
        &self,
        source: &str,
        target: &str,
        amount: f64,
    ) -> Result<ConversionResult, ConversionError> {
        if !amount.is_finite() || amount <= 0.0 {
            warn!(amount, "Invalid conversion amount");
            return Err(ConversionError::InvalidAmount);
        }

        let source = CurrencyCode::parse(source)?;
        let table = self.cache.get_rates().await?;
        let source_rate = lookup(&table, &source)?;

        let target = CurrencyCode::parse(target)?;
        let target_rate = lookup(&table, &target)?;

        let cross_rate = target_rate / source_rate;
        let output_amount = round_half_up(amount * cross_rate, OUTPUT_SCALE);
        if !output_amount.is_finite() {
            warn!(amount, cross_rate, "Converted amount overflows");
            return Err(ConversionError::AmountOutOfRange);
        }

        info!(
            "Conversion result: {} {} = {} {}",
            amount, source, output_amount, target
        );

        Ok(ConversionResult {
            source_currency: source,
            target_currency: target,
            input_amount: amount,
            output_amount,
            cross_rate,
            conversion_date: conversion_date(&table),
        })
    }

    /// Drops the cached rate table; the next conversion fetches a fresh one.
    pub fn refresh(&self) {
        info!("Refreshing cached exchange rates");
        self.cache.invalidate();
    }
}

fn lookup(table: &RateTable, code: &CurrencyCode) -> Result<f64, ConversionError> {
    table.rate(code).ok_or_else(|| {
        warn!(currency = %code, "Exchange rate not found");
        ConversionError::CurrencyNotFound(code.clone())
    })
}

/// Rounds half-up on the shortest decimal form of `value`, so `2.675`
/// becomes `2.68` even though its binary value sits just below the midpoint.
fn round_half_up(value: f64, scale: u32) -> f64 {
    let decimal = Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value));

    match decimal {
        Some(d) => d
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        // Beyond Decimal's range two decimals are below f64 resolution anyway.
        None => value,
    }
}

/// As-of date of the snapshot, or today (UTC) when the upstream did not
/// report a usable one.
fn conversion_date(table: &RateTable) -> NaiveDate {
    let today = || chrono::Utc::now().date_naive();

    match table.as_of_date() {
        Some(raw) => match NaiveDate::parse_and_remainder(raw, "%Y-%m-%d") {
            Ok((date, _)) => date,
            Err(e) => {
                warn!(date = raw, error = %e, "Could not parse upstream rate date, using today");
                today()
            }
        },
        None => {
            warn!("Upstream rate table carries no date, using today");
            today()
        }
    }
}
