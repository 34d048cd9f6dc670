use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Префикс переменных окружения для настроек словаря.
pub const ENV_PREFIX: &str = "ZUMIC_DICT";

/// Настраиваемые константы политики роста и рехеширования `Dict`.
///
/// Значения по умолчанию совпадают с классическими: начальный размер 4,
/// принудительный рост при заполнении 5:1, бюджет пустых бакетов 10 на шаг,
/// пакет из 100 бакетов для рехеширования с ограничением по времени.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictConfig {
    /// Минимальный размер таблицы (округляется до степени двойки).
    pub initial_size: usize,
    /// Отношение `used / size`, при превышении которого таблица растёт даже
    /// при выключенном изменении размера.
    pub force_resize_ratio: usize,
    /// Сколько пустых бакетов может пропустить один шаг рехеширования.
    pub rehash_empty_visits: usize,
    /// Количество шагов в одной пачке `Dict::rehash_for`.
    pub rehash_batch: usize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl DictConfig {
    /// Загружает настройки: значения по умолчанию, затем переменные окружения
    /// с префиксом `ZUMIC_DICT_` (например, `ZUMIC_DICT_REHASH_BATCH=200`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX))
    }

    /// Загружает настройки из указанного источника окружения.
    pub fn load_from(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cfg = Config::builder()
            .set_default("initial_size", defaults.initial_size as i64)?
            .set_default("force_resize_ratio", defaults.force_resize_ratio as i64)?
            .set_default("rehash_empty_visits", defaults.rehash_empty_visits as i64)?
            .set_default("rehash_batch", defaults.rehash_batch as i64)?
            .add_source(env.try_parsing(true))
            .build()?;

        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Проверяет, что все константы положительны.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("initial_size", self.initial_size),
            ("force_resize_ratio", self.force_resize_ratio),
            ("rehash_empty_visits", self.rehash_empty_visits),
            ("rehash_batch", self.rehash_batch),
        ];

        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            initial_size: 4,
            force_resize_ratio: 5,
            rehash_empty_visits: 10,
            rehash_batch: 100,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
