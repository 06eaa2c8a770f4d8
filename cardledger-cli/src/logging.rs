use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging on stderr so stdout stays clean for reports.
///
/// `RUST_LOG` wins over the default level; `verbose` lowers the default to debug.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "cardledger=debug" } else { "cardledger=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // a subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
