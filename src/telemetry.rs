use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "proposal_sim=info";

/// Install the global `tracing` subscriber.
///
/// `quiet` lowers the default to warnings; an explicit `RUST_LOG` always wins.
/// Logs go to stderr so stdout stays usable for `describe --json`.
pub fn init_tracing(quiet: bool) {
    let fallback = if quiet { "proposal_sim=warn" } else { DEFAULT_FILTER };
    // Ignore a second initialisation (tests, embedding).
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
