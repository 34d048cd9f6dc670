pub mod config;
mod filters;

pub use self::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::error::LoggingError;

/// Инициализирует глобальный subscriber `tracing` по конфигурации.
///
/// Возвращает ошибку, если subscriber уже установлен (например, вторым
/// вызовом из тестов).
pub fn init_logging(mut config: LoggingConfig) -> Result<(), LoggingError> {
    config.apply_env_overrides()?;

    let env_filter = filters::build_filter_from_config(&config)?;

    let fmt_layer = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(config.ansi)
            .with_target(config.with_target)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(config.with_target)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}
