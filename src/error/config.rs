use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config source error: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
