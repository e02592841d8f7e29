//! Tracing subscriber setup for embedders.

use tracing_subscriber::EnvFilter;

use crate::config::RecordsConfig;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "CLINIC_RECORDS_LOG";

/// Install a fmt subscriber. Later calls are no-ops.
pub fn init(config: &RecordsConfig) {
    let directive = filter_directive(std::env::var(LOG_ENV_VAR).ok(), config);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::debug!(filter = %directive, "Logging initialized");
    }
}

/// The environment wins over the config; blank values are ignored.
fn filter_directive(env_value: Option<String>, config: &RecordsConfig) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.log_filter.clone())
}
