use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a tracing subscriber with pretty formatting.
///
/// Uses the RUST_LOG environment variable for filtering (defaults to "info"
/// if not set). Idempotent: a second call in the same process is a no-op,
/// so tests and benches can call it unconditionally.
pub fn setup_logging() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
        .try_init();
}
