use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset. sqlx logs every statement at `info`.
const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// Initialize JSON tracing on stdout for the named service.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_tracing(service: &'static str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()
        .is_ok();
    if installed {
        ::tracing::info!(service, "tracing initialized");
    }
}
