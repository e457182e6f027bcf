use anyhow::{Context, Result};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace::Sampler, Resource};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{Config, TelemetrySettings};

/// Telemetry configuration structure
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub production: bool,
    pub otlp_endpoint: Option<String>,
    pub enable_tracing: bool,
    pub export_timeout: Duration,
}

impl TelemetryConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.as_str().to_string(),
            production: config.is_production(),
            otlp_endpoint: config.telemetry.otlp_endpoint.clone(),
            enable_tracing: config.telemetry.traces_enabled,
            export_timeout: Duration::from_secs(30),
        }
    }
}

/// Telemetry handles for graceful shutdown
pub struct TelemetryHandles {
    exporting: bool,
}

impl TelemetryHandles {
    /// Flushes pending spans and shuts the global tracer provider down.
    pub fn shutdown(self) {
        if self.exporting {
            info!("Shutting down telemetry providers...");
            global::shutdown_tracer_provider();
        }
    }
}

/// Sets up the log subscriber and, when an endpoint is configured, OTLP span export.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryHandles> {
    setup_tracing_subscriber(config.production)?;

    info!(
        "Initializing telemetry for service: {} v{} in environment: {}",
        config.service_name, config.service_version, config.environment
    );

    let exporting = if config.enable_tracing {
        init_tracing(&config)?
    } else {
        false
    };

    Ok(TelemetryHandles { exporting })
}

fn create_resource(config: &TelemetryConfig) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

/// Returns whether an exporter was installed.
fn init_tracing(config: &TelemetryConfig) -> Result<bool> {
    let Some(endpoint) = &config.otlp_endpoint else {
        info!("No OTLP endpoint configured, using console-only tracing");
        return Ok(false);
    };

    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint)
                .with_timeout(config.export_timeout),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_resource(create_resource(config))
                .with_sampler(Sampler::AlwaysOn),
        )
        .install_batch(runtime::Tokio)
        .context("Failed to initialize OTLP tracer")?;
    global::set_tracer_provider(provider);

    info!(endpoint = %endpoint, "Distributed tracing initialized with OTLP exporter");
    Ok(true)
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(production: bool) -> String {
    let level = if production { "info" } else { "debug" };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

fn setup_tracing_subscriber(production: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(production).into());

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Health check for telemetry components
pub fn telemetry_health_check(settings: &TelemetrySettings) -> HashMap<String, bool> {
    let mut health = HashMap::new();
    health.insert("tracing".to_string(), settings.traces_enabled);
    health.insert(
        "otlp_exporter".to_string(),
        settings.traces_enabled && settings.otlp_endpoint.is_some(),
    );
    health
}
