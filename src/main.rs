use std::panic;

use kubectl_create_transient_configmap::app;
use kubectl_create_transient_configmap::error::print_span_trace;
use tracing::error;
use tracing_error::ErrorLayer;
use tracing_error::SpanTrace;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    // stdout belongs to kubectl output and the final message
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    panic::set_hook(Box::new(move |info| {
        error!("{}", info);
        let span_trace = SpanTrace::capture();
        eprintln!("\n{}\n", color_spantrace::colorize(&span_trace));
    }));

    match app().await {
        Ok(_) => {
            std::process::exit(0);
        }
        Err(e) => {
            error!("{e}");
            println!("{e}");
            print_span_trace(&e);
            std::process::exit(1);
        }
    }
}
