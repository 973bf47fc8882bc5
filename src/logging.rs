use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `issuecheck=debug`
pub const LOG_ENV: &str = "ISSUECHECK_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber so the case report on stdout stays clean.
/// Does nothing if a subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
