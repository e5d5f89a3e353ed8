use color_eyre::Result;
use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter,
};

pub fn init_errors() -> Result<()> {
    color_eyre::install()
}

/// Logs to stderr so stdout stays reserved for the emitted records. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "twitch_stats={level},twitch_stats_gatherer={level},twitch_stats_helix={level},twitch_stats_config={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .init();
}
