//! # Pricing Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the outbound feed clients
//! - Create the pricing service and start the rate refresher
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricing_feeds::build_feeds;
use pricing_hex::{PricingService, RateRefresher, inbound::HttpServer};

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("pricing-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing only when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let (telemetry, otel_provider) = match otel {
        Some((tracer, provider)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        ),
        None => (None, None),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pricing_app=debug,pricing_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting pricing server on port {}", config.port);
    tracing::info!(
        geo = %config.geo_api_url,
        rates = %config.rates_api_url,
        exempt = ?config.exempt_countries,
        "Using feeds"
    );

    // Build outbound feeds
    let feeds = build_feeds(
        &config.geo_api_url,
        &config.rates_api_url,
        config.http_timeout,
    )?;

    // Create the pricing service
    let service = Arc::new(PricingService::with_settings(
        feeds.geolocation,
        feeds.rates,
        config.service_settings(),
    ));

    // Keep exchange rates fresh in the background
    let refresher = RateRefresher::new(service.clone(), config.refresh_schedule()).spawn();

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    let result = server.run(&addr).await;

    refresher.abort();

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    result
}
