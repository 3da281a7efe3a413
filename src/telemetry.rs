use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace as sdktrace, Resource};
use opentelemetry_semantic_conventions::resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};

pub fn init_telemetry(service_name: &str, config: &Config) {
    // RUST_LOG wins; otherwise DB crates are held at warn.
    let env_filter = tracing_subscriber::EnvFilter::new(&config.log_filter);

    let registry = tracing_subscriber::registry().with(env_filter);

    let otel_layer = config.otlp_endpoint.as_ref().and_then(|endpoint| {
        let resource = Resource::new(vec![KeyValue::new(
            resource::SERVICE_NAME,
            service_name.to_string(),
        )]);

        let installed = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint.clone()),
            )
            .with_trace_config(
                sdktrace::config()
                    .with_resource(resource)
                    .with_sampler(sdktrace::Sampler::AlwaysOn),
            )
            .install_batch(opentelemetry_sdk::runtime::Tokio);

        match installed {
            Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Err(e) => {
                eprintln!("OpenTelemetry export disabled: {e}");
                None
            }
        }
    });

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true);
            registry.with(otel_layer).with(fmt_layer).init();
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer();
            registry.with(otel_layer).with(fmt_layer).init();
        }
    }
}
