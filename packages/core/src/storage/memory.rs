// In-memory storage для тестов и однопроцессного использования

use crate::error::Result;
use crate::storage::models::*;
use crate::storage::SecureKeyStore;
use std::collections::HashMap;
use zeroize::Zeroizing;

/// In-memory хранилище
#[derive(Default)]
pub struct MemoryStorage {
    public_keys: HashMap<String, StoredPublicKey>,
    hybrid_keys: HashMap<String, StoredHybridPublicKey>,
    threshold_groups: HashMap<String, StoredThresholdGroup>,
    secrets: HashMap<String, Zeroizing<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // === Публичные ключи ===

    pub fn save_public_key(&mut self, key: StoredPublicKey) -> Result<()> {
        self.public_keys.insert(key.key_id.clone(), key);
        Ok(())
    }

    pub fn load_public_key(&self, key_id: &str) -> Result<Option<StoredPublicKey>> {
        Ok(self.public_keys.get(key_id).cloned())
    }

    pub fn delete_public_key(&mut self, key_id: &str) -> Result<()> {
        self.public_keys.remove(key_id);
        Ok(())
    }

    // === Гибридные ключи ===

    pub fn save_hybrid_key(&mut self, key: StoredHybridPublicKey) -> Result<()> {
        self.hybrid_keys.insert(key.key_id.clone(), key);
        Ok(())
    }

    pub fn load_hybrid_key(&self, key_id: &str) -> Result<Option<StoredHybridPublicKey>> {
        Ok(self.hybrid_keys.get(key_id).cloned())
    }

    pub fn load_all_hybrid_keys(&self) -> Result<Vec<StoredHybridPublicKey>> {
        Ok(self.hybrid_keys.values().cloned().collect())
    }

    // === Пороговые группы ===

    pub fn save_threshold_group(&mut self, group: StoredThresholdGroup) -> Result<()> {
        self.threshold_groups.insert(group.group_id.clone(), group);
        Ok(())
    }

    pub fn load_threshold_group(&self, group_id: &str) -> Result<Option<StoredThresholdGroup>> {
        Ok(self.threshold_groups.get(group_id).cloned())
    }

    /// Пометить схему выведенной из эксплуатации
    pub fn retire_threshold_group(&mut self, group_id: &str, retired_at: i64) -> Result<bool> {
        match self.threshold_groups.get_mut(group_id) {
            Some(group) => {
                group.retired_at = Some(retired_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn load_active_threshold_groups(&self) -> Result<Vec<StoredThresholdGroup>> {
        Ok(self
            .threshold_groups
            .values()
            .filter(|g| g.is_active())
            .cloned()
            .collect())
    }

    // === Утилиты ===

    pub fn clear_all(&mut self) -> Result<()> {
        self.public_keys.clear();
        self.hybrid_keys.clear();
        self.threshold_groups.clear();
        self.secrets.clear();
        Ok(())
    }
}

impl SecureKeyStore for MemoryStorage {
    fn store_secret(&mut self, key_id: &str, secret: &[u8]) -> Result<()> {
        self.secrets
            .insert(key_id.to_string(), Zeroizing::new(secret.to_vec()));
        Ok(())
    }

    fn load_secret(&self, key_id: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        Ok(self.secrets.get(key_id).cloned())
    }

    fn delete_secret(&mut self, key_id: &str) -> Result<()> {
        self.secrets.remove(key_id);
        Ok(())
    }
}
