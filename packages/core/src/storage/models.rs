// Модели данных для хранилища
// Только публичный материал: секреты идут через SecureKeyStore

use crate::crypto::algorithm::AlgorithmId;
use crate::crypto::hybrid::HybridPublicKey;
use crate::crypto::keys::PublicKey;
use crate::crypto::threshold::GroupPublicKey;
use crate::error::{CryptoError, Result};
use crate::utils::{serialization, time, uuid};
use serde::{Deserialize, Serialize};

/// Публичный ключ одного алгоритма
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPublicKey {
    pub key_id: String,
    pub algorithm: AlgorithmId,
    pub public_key: PublicKey,
    pub fingerprint: String, // hex, первые 8 байт SHA-256
    pub created_at: i64,
}

impl StoredPublicKey {
    pub fn new(key_id: impl Into<String>, public_key: PublicKey) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: public_key.algorithm(),
            fingerprint: public_key.fingerprint(),
            public_key,
            created_at: time::current_timestamp(),
        }
    }
}

/// Гибридный публичный ключ (классический + PQ + правило комбинирования)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHybridPublicKey {
    pub key_id: String,
    pub classical: AlgorithmId,
    pub post_quantum: AlgorithmId,
    pub public_key: HybridPublicKey,
    pub created_at: i64,
}

impl StoredHybridPublicKey {
    pub fn new(key_id: impl Into<String>, public_key: HybridPublicKey) -> Self {
        let (classical, post_quantum) = public_key.algorithms();
        Self {
            key_id: key_id.into(),
            classical,
            post_quantum,
            public_key,
            created_at: time::current_timestamp(),
        }
    }
}

/// Метаданные пороговой группы: групповой ключ и публичные доли участников
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredThresholdGroup {
    pub group_id: String,
    pub threshold: u16,
    pub total: u16,
    pub group: GroupPublicKey,
    pub created_at: i64,
    pub retired_at: Option<i64>, // None пока схема активна
}

impl StoredThresholdGroup {
    pub fn new(group: GroupPublicKey) -> Self {
        Self {
            group_id: group.group_id().to_string(),
            threshold: group.threshold(),
            total: group.total(),
            group,
            created_at: time::current_timestamp(),
            retired_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.retired_at.is_none()
    }

    /// Помечает схему выведенной из эксплуатации; повторный вызов ничего не меняет
    pub fn retire(&mut self) {
        if self.retired_at.is_none() {
            self.retired_at = Some(time::current_timestamp());
        }
    }

    /// Человекочитаемый экспорт
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Разбирает экспорт и проверяет, что заголовок совпадает с групповым ключом
    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        if !uuid::is_valid(&record.group_id)
            || record.group_id != record.group.group_id()
            || record.threshold != record.group.threshold()
            || record.total != record.group.total()
        {
            return Err(CryptoError::Storage(format!(
                "Threshold group record {} does not match its group key",
                record.group_id
            )));
        }
        Ok(record)
    }
}

/// Bincode-кодирование любой записи хранилища
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serialization::to_bytes(record)
}

pub fn decode_record<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T> {
    serialization::from_bytes(bytes)
}
