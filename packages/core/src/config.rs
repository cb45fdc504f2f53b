//! Настройки гибридного и порогового слоёв
//!
//! Один экземпляр на процесс. Устанавливается до первого использования
//! композитора или сессии подписи; иначе берутся значения по умолчанию.

use crate::error::{CryptoError, Result};
use std::str::FromStr;
use std::sync::OnceLock;

static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

/// HKDF-SHA256 не выдаёт больше 255 блоков
const MAX_HYBRID_SECRET_LENGTH: usize = 255 * 32;

/// Сутки; дольше раунд подписи не держится
const MAX_SESSION_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // ============================================
    // ГИБРИД
    // ============================================

    /// Дописывается к IKM после обоих компонентных секретов
    pub hybrid_context_label: Vec<u8>,

    /// Длина итогового гибридного секрета (байт)
    pub hybrid_secret_length: usize,

    /// Классический и PQ компоненты на отдельных потоках
    pub parallel_components: bool,

    // ============================================
    // ПОРОГОВЫЕ ПОДПИСИ
    // ============================================

    pub threshold_session_timeout_secs: u64,

    /// Индексы участников кодируются в u16, но скаляры долей ограничивают
    /// практический размер группы
    pub max_participants: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hybrid_context_label: b"quantum-toolkit/hybrid/v1".to_vec(),
            hybrid_secret_length: 32,
            parallel_components: true,
            threshold_session_timeout_secs: 300,
            max_participants: 255,
        }
    }
}

impl Config {
    /// Значения по умолчанию с переопределениями из `QTK_*`.
    ///
    /// Непарсящиеся значения игнорируются с предупреждением.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(label) = std::env::var("QTK_HYBRID_CONTEXT_LABEL") {
            if !label.is_empty() {
                config.hybrid_context_label = label.into_bytes();
            }
        }
        env_override("QTK_HYBRID_SECRET_LENGTH", &mut config.hybrid_secret_length);
        env_override("QTK_PARALLEL_COMPONENTS", &mut config.parallel_components);
        env_override(
            "QTK_THRESHOLD_SESSION_TIMEOUT_SECS",
            &mut config.threshold_session_timeout_secs,
        );
        env_override("QTK_MAX_PARTICIPANTS", &mut config.max_participants);

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.hybrid_context_label.is_empty() {
            return Err(CryptoError::InvalidConfig(
                "hybrid context label must not be empty".to_string(),
            ));
        }
        if self.hybrid_secret_length == 0 || self.hybrid_secret_length > MAX_HYBRID_SECRET_LENGTH {
            return Err(CryptoError::InvalidConfig(format!(
                "hybrid secret length {} outside 1..={}",
                self.hybrid_secret_length, MAX_HYBRID_SECRET_LENGTH
            )));
        }
        if self.threshold_session_timeout_secs == 0
            || self.threshold_session_timeout_secs > MAX_SESSION_TIMEOUT_SECS
        {
            return Err(CryptoError::InvalidConfig(format!(
                "threshold session timeout {}s outside 1..={}",
                self.threshold_session_timeout_secs, MAX_SESSION_TIMEOUT_SECS
            )));
        }
        if self.max_participants == 0 {
            return Err(CryptoError::InvalidConfig(
                "max participants must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Глобальный экземпляр; при первом обращении без установки берутся
    /// значения по умолчанию.
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }

    /// Устанавливает глобальную конфигурацию из окружения.
    pub fn init_from_env() -> Result<&'static Config> {
        Self::init_with(Self::from_env())
    }

    /// Устанавливает глобальную конфигурацию.
    ///
    /// # Errors
    ///
    /// `InvalidConfig`, если значения некорректны или конфигурация уже
    /// установлена (в том числе неявно через [`Config::global`]).
    pub fn init_with(config: Config) -> Result<&'static Config> {
        use tracing::info;

        config.validate()?;
        let mut fresh = Some(config);
        let installed = GLOBAL_CONFIG.get_or_init(|| fresh.take().unwrap_or_default());
        if fresh.is_some() {
            return Err(CryptoError::InvalidConfig("already initialized".to_string()));
        }

        info!(
            target: "crypto::config",
            secret_length = installed.hybrid_secret_length,
            parallel = installed.parallel_components,
            session_timeout_secs = installed.threshold_session_timeout_secs,
            max_participants = installed.max_participants,
            "Installed configuration"
        );
        Ok(installed)
    }

    pub fn is_initialized() -> bool {
        GLOBAL_CONFIG.get().is_some()
    }
}

fn env_override<T: FromStr>(name: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(name) {
        match raw.parse() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!(target: "crypto::config", variable = name, value = %raw, "Ignoring unparsable override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.hybrid_secret_length, 32);
        assert_eq!(config.threshold_session_timeout_secs, 300);
        assert_eq!(config.max_participants, 255);
        assert!(config.parallel_components);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_label = Config {
            hybrid_context_label: Vec::new(),
            ..Config::default()
        };
        assert!(matches!(empty_label.validate(), Err(CryptoError::InvalidConfig(_))));

        let oversized = Config {
            hybrid_secret_length: MAX_HYBRID_SECRET_LENGTH + 1,
            ..Config::default()
        };
        assert!(oversized.validate().is_err());

        let endless_session = Config {
            threshold_session_timeout_secs: u64::MAX,
            ..Config::default()
        };
        assert!(matches!(endless_session.validate(), Err(CryptoError::InvalidConfig(_))));

        let no_timeout = Config {
            threshold_session_timeout_secs: 0,
            ..Config::default()
        };
        assert!(no_timeout.validate().is_err());

        let no_participants = Config {
            max_participants: 0,
            ..Config::default()
        };
        assert!(no_participants.validate().is_err());
    }

    #[test]
    fn test_global_is_installed_once() {
        let global = Config::global();
        assert!(Config::is_initialized());
        assert!(matches!(
            Config::init_with(Config::default()),
            Err(CryptoError::InvalidConfig(_))
        ));
        assert_eq!(global, Config::global());
    }
}
