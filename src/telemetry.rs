use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV_VAR: &str = "BIZDESK_LOG";

/// Initialize tracing with the BIZDESK_LOG environment variable.
///
/// Falls back to `default_filter` when BIZDESK_LOG is not set. Calling this
/// more than once is harmless; only the first subscriber is installed.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
