// Модуль хранилища
//
// Публичные записи (ключи, метаданные пороговых групп) хранятся здесь.
// Секретный материал передаётся внешнему SecureKeyStore; в крейте есть
// только in-memory реализация.

pub mod memory;
pub mod models;

pub use memory::MemoryStorage;

use crate::crypto::algorithm::AlgorithmId;
use crate::crypto::keys::{PublicKey, SecretKey};
use crate::crypto::threshold::ThresholdShare;
use crate::error::{CryptoError, Result};
use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Хранилище секретного материала (внешний коллаборатор)
pub trait SecureKeyStore {
    fn store_secret(&mut self, key_id: &str, secret: &[u8]) -> Result<()>;

    fn load_secret(&self, key_id: &str) -> Result<Option<Zeroizing<Vec<u8>>>>;

    fn delete_secret(&mut self, key_id: &str) -> Result<()>;
}

/// Сохранить секретный ключ алгоритма
pub fn store_secret_key<S: SecureKeyStore + ?Sized>(store: &mut S, key_id: &str, key: &SecretKey) -> Result<()> {
    store.store_secret(key_id, key.expose_secret())
}

/// Загрузить секретный ключ; алгоритм задаёт вызывающий
pub fn load_secret_key<S: SecureKeyStore + ?Sized>(
    store: &S,
    key_id: &str,
    algorithm: AlgorithmId,
) -> Result<Option<SecretKey>> {
    Ok(store
        .load_secret(key_id)?
        .map(|bytes| SecretKey::from_bytes(algorithm, bytes.to_vec())))
}

/// Сохранить долю пороговой схемы под `group_id/index`
pub fn store_threshold_share<S: SecureKeyStore + ?Sized>(store: &mut S, share: &ThresholdShare) -> Result<()> {
    let key_id = threshold_share_key(share.group_id(), share.index());
    store.store_secret(&key_id, &share.secret_bytes()[..])
}

pub fn load_threshold_share<S: SecureKeyStore + ?Sized>(
    store: &S,
    group_id: &str,
    index: u16,
) -> Result<Option<ThresholdShare>> {
    match store.load_secret(&threshold_share_key(group_id, index))? {
        Some(bytes) => Ok(Some(ThresholdShare::from_secret_bytes(
            index,
            group_id.to_string(),
            &bytes,
        )?)),
        None => Ok(None),
    }
}

fn threshold_share_key(group_id: &str, index: u16) -> String {
    format!("threshold/{}/{}", group_id, index)
}

/// Экспорт публичного ключа в файл (сырые байты)
pub fn export_public_key(path: impl AsRef<Path>, key: &PublicKey) -> Result<()> {
    fs::write(path.as_ref(), key.as_bytes())?;
    tracing::debug!(
        target: "crypto::storage",
        algorithm = %key.algorithm(),
        fingerprint = %key.fingerprint(),
        path = %path.as_ref().display(),
        "Exported public key"
    );
    Ok(())
}

/// Импорт публичного ключа из файла
pub fn import_public_key(path: impl AsRef<Path>, algorithm: AlgorithmId) -> Result<PublicKey> {
    let bytes = fs::read(path.as_ref())?;
    if bytes.is_empty() {
        return Err(CryptoError::Storage(format!(
            "Public key file {} is empty",
            path.as_ref().display()
        )));
    }
    Ok(PublicKey::new(algorithm, bytes))
}
