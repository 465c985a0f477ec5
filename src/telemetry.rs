use actix_web_opentelemetry::{PrometheusMetricsHandler, RequestMetrics};
use anyhow::Context;
use opentelemetry::metrics::Counter;
use opentelemetry::{global, KeyValue};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Clone)]
pub struct OpenTelemetryStack {
    request_metrics: RequestMetrics,
    metrics_handler: PrometheusMetricsHandler,
}

impl OpenTelemetryStack {
    /// Installs the global `tracing` subscriber and the Prometheus-backed
    /// meter provider. Call once, before any meter is created.
    pub fn new() -> anyhow::Result<Self> {
        LogTracer::init().context("Failed to install `log` bridge.")?;

        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("INFO"));
        let formatting_layer = BunyanFormattingLayer::new(APP_NAME.to_string(), std::io::stdout);
        let subscriber = Registry::default()
            .with(env_filter)
            .with(JsonStorageLayer)
            .with(formatting_layer);
        tracing::subscriber::set_global_default(subscriber)
            .context("Failed to install `tracing` subscriber.")?;

        let registry = prometheus::Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()
            .context("Failed to build Prometheus exporter.")?;
        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        global::set_meter_provider(provider);

        // Reads the global provider, so it must follow `set_meter_provider`.
        let request_metrics = RequestMetrics::default();
        let metrics_handler = PrometheusMetricsHandler::new(registry);
        Ok(Self {
            request_metrics,
            metrics_handler,
        })
    }

    pub fn metrics(&self) -> RequestMetrics {
        self.request_metrics.clone()
    }

    pub fn metrics_handler(&self) -> PrometheusMetricsHandler {
        self.metrics_handler.clone()
    }
}

/// Counts successful task mutations, labelled by `operation`.
#[derive(Clone)]
pub struct TaskMetrics {
    operations: Counter<u64>,
}

impl Default for TaskMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskMetrics {
    pub fn new() -> Self {
        let meter = global::meter(APP_NAME);
        let operations = meter
            .u64_counter("task_operations")
            .with_description("Successful task create, update and delete calls")
            .init();
        Self { operations }
    }

    pub fn record(&self, operation: &'static str) {
        self.operations.add(1, &[KeyValue::new("operation", operation)]);
    }
}
