use tracing_subscriber::EnvFilter;

use crate::{error::LoggingError, logging::config::LoggingConfig};

/// Строит фильтр: `RUST_LOG` имеет приоритет, иначе директива из конфига.
pub fn build_filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(env_filter) => Ok(env_filter),
        Err(_) => Ok(EnvFilter::try_new(config.build_filter_directive())?),
    }
}
