use tracing_subscriber::{EnvFilter, fmt};

pub const ENV_LOG: &str = "LATENCYGATE_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber filtered by `LATENCYGATE_LOG`; stdout stays
/// reserved for verdict lines. Repeated calls are no-ops.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
