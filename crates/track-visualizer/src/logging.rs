use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Filter used when `RUST_LOG` is not set. Stdout carries the progress output,
/// so diagnostics go to stderr and stay quiet by default.
const DEFAULT_FILTER: &str = "warn";

pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}
