//! # FX Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate provider and its cache
//! - Create the conversion service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, RatesSource};
use exchange_rates::{HttpRateProvider, StaticRateProvider};
use fx_hex::{ConversionService, RateCache, inbound::HttpServer};
use fx_types::RateProvider;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("fx-service"), provider))
}

fn build_provider(config: &Config) -> Arc<dyn RateProvider> {
    match &config.rates_source {
        RatesSource::Url(url) => Arc::new(
            HttpRateProvider::new(url.clone()).with_default_base(config.default_base.clone()),
        ),
        RatesSource::Static => {
            tracing::warn!("Serving built-in development rates, not live data");
            Arc::new(StaticRateProvider::development())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fx_app=debug,fx_hex=debug,exchange_rates=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting conversion server on port {}", config.port);
    match &config.rates_source {
        RatesSource::Url(url) => {
            tracing::info!("Using rate API: {}", url.split('?').next().unwrap_or_default())
        }
        RatesSource::Static => tracing::info!("Using static development rates"),
    }

    // Build the rate cache (no expiry unless a TTL is configured)
    let provider = build_provider(&config);
    let cache = match config.cache_ttl {
        Some(ttl) => {
            tracing::info!("Rate cache TTL: {}s", ttl.as_secs());
            RateCache::with_ttl(provider, ttl)
        }
        None => RateCache::new(provider),
    };

    // Create the conversion service
    let service = ConversionService::new(cache);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
