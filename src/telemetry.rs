use anyhow::{anyhow, Error};
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, runtime};
use secrecy::ExposeSecret;
use tonic::metadata::MetadataMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::TelemetryConfig;

/// Installs the global subscriber: an env-filtered fmt layer, plus an OTLP
/// span exporter when a receiver is configured.
pub fn init_tracer(config: &TelemetryConfig) -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer());

    let receiver_url = match &config.receiver_url {
        Some(receiver_url) => receiver_url,
        None => {
            subscriber.try_init()?;
            return Ok(());
        }
    };

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(receiver_url)
        .with_metadata(headers(config)?);

    // Spans are exported in batch - recommended setup for a production application.
    global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .install_batch(runtime::Tokio)?;

    subscriber
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()?;

    Ok(())
}

/// Flushes any spans still waiting in the batch exporter.
pub fn shutdown() {
    global::shutdown_tracer_provider();
}

fn headers(config: &TelemetryConfig) -> Result<MetadataMap, Error> {
    let mut metadata = MetadataMap::new();

    if let Some(api_key) = &config.api_key {
        let value = api_key
            .expose_secret()
            .parse()
            .map_err(|e| anyhow!("Invalid telemetry api key: {}", e))?;
        metadata.insert("x-honeycomb-team", value);
    }

    Ok(metadata)
}
