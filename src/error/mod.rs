pub mod config;
pub mod dict;
pub mod logging;

pub use self::config::ConfigError;
pub use dict::{DictError, DictResult};
pub use logging::LoggingError;
