use std::str::FromStr;

use crate::error::LoggingError;

/// Формат вывода логов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Конфигурация логирования для встраивающего приложения, тестов и бенчмарков.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Уровень по умолчанию для модулей `zumic_core`.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
    /// Показывать ли target события.
    pub with_target: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl LoggingConfig {
    /// Применяет переопределения из `ZUMIC_LOG_LEVEL` и `ZUMIC_LOG_FORMAT`.
    pub fn apply_env_overrides(&mut self) -> Result<(), LoggingError> {
        if let Ok(level) = std::env::var("ZUMIC_LOG_LEVEL") {
            self.level = level;
        }

        if let Ok(format) = std::env::var("ZUMIC_LOG_FORMAT") {
            self.format = format.parse()?;
        }

        Ok(())
    }

    /// Директива для `EnvFilter`, например `zumic_core=debug`.
    pub fn build_filter_directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.level)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            ansi: true,
            with_target: true,
        }
    }
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
