//! Log output for both binaries.
//!
//! Logs go to stderr so stdout stays reserved for the controller console.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("remote_shell={level},agent={level},ctl={level}")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // a second init (e.g. from tests) is not an error worth failing on
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
