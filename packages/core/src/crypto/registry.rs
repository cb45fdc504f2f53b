//! Algorithm registry
//!
//! Registration happens on a mutable [`RegistryBuilder`]; `build()` freezes
//! it into an [`AlgorithmRegistry`] that is read without locks from any
//! thread. There is no way to register into a frozen registry.

use crate::crypto::adapter::{Adapter, AdapterFactory};
use crate::crypto::algorithm::{AlgorithmId, AlgorithmKind};
use crate::crypto::suites::classic::{Ed25519Signer, X25519Kem};
use crate::error::{CryptoError, Result};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

/// Процесс-глобальный реестр
static GLOBAL_REGISTRY: OnceCell<AlgorithmRegistry> = OnceCell::new();

/// Mutable registration phase.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    factories: BTreeMap<AlgorithmId, AdapterFactory>,
}

impl RegistryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with every provider compiled into this crate.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.insert_default(AlgorithmId::X25519, AdapterFactory::kem::<X25519Kem>());
        builder.insert_default(AlgorithmId::Ed25519, AdapterFactory::signature::<Ed25519Signer>());

        #[cfg(feature = "post-quantum")]
        {
            use crate::crypto::suites::post_quantum::*;

            builder.insert_default(AlgorithmId::Kyber512, AdapterFactory::kem::<Kyber512Kem>());
            builder.insert_default(AlgorithmId::Kyber768, AdapterFactory::kem::<Kyber768Kem>());
            builder.insert_default(AlgorithmId::Kyber1024, AdapterFactory::kem::<Kyber1024Kem>());
            builder.insert_default(
                AlgorithmId::Dilithium2,
                AdapterFactory::signature::<Dilithium2Signer>(),
            );
            builder.insert_default(
                AlgorithmId::Dilithium3,
                AdapterFactory::signature::<Dilithium3Signer>(),
            );
            builder.insert_default(
                AlgorithmId::Dilithium5,
                AdapterFactory::signature::<Dilithium5Signer>(),
            );
        }

        #[cfg(feature = "extended-pq")]
        {
            use crate::crypto::suites::post_quantum::*;

            builder.insert_default(
                AlgorithmId::Falcon512,
                AdapterFactory::signature::<Falcon512Signer>(),
            );
            builder.insert_default(
                AlgorithmId::Falcon1024,
                AdapterFactory::signature::<Falcon1024Signer>(),
            );
            builder.insert_default(
                AlgorithmId::SphincsSha2_128f,
                AdapterFactory::signature::<SphincsSha2_128fSigner>(),
            );
            builder.insert_default(
                AlgorithmId::FrodoKem640Shake,
                AdapterFactory::kem::<FrodoKem640ShakeKem>(),
            );
            builder.insert_default(
                AlgorithmId::FrodoKem976Aes,
                AdapterFactory::kem::<FrodoKem976AesKem>(),
            );
            builder.insert_default(AlgorithmId::NtruHrss701, AdapterFactory::kem::<NtruHrss701Kem>());
        }

        builder
    }

    // Built-in pairs always agree on capability
    fn insert_default(&mut self, id: AlgorithmId, factory: AdapterFactory) {
        self.factories.insert(id, factory);
    }

    /// Registers `factory` under `id`.
    ///
    /// Registering the same factory twice is a no-op; a different factory
    /// for an already registered id is an `AlgorithmConflict`.
    pub fn register(&mut self, id: AlgorithmId, factory: AdapterFactory) -> Result<&mut Self> {
        use tracing::debug;

        if factory.capability() != id.capability() {
            return Err(CryptoError::UnsupportedOperation {
                algorithm: id,
                operation: "register",
            });
        }

        match self.factories.get(&id) {
            Some(existing) if *existing == factory => {
                debug!(
                    target: "crypto::registry",
                    algorithm = %id,
                    "Algorithm already registered with the same factory"
                );
            }
            Some(existing) => {
                tracing::warn!(
                    target: "crypto::registry",
                    algorithm = %id,
                    registered = existing.provider(),
                    rejected = factory.provider(),
                    "Conflicting registration"
                );
                return Err(CryptoError::AlgorithmConflict(id));
            }
            None => {
                debug!(
                    target: "crypto::registry",
                    algorithm = %id,
                    provider = factory.provider(),
                    "Registered algorithm"
                );
                self.factories.insert(id, factory);
            }
        }

        Ok(self)
    }

    pub fn is_registered(&self, id: AlgorithmId) -> bool {
        self.factories.contains_key(&id)
    }

    /// Freezes the registration set.
    pub fn build(self) -> AlgorithmRegistry {
        let adapters = self
            .factories
            .into_iter()
            .map(|(id, factory)| (id, factory.build(id)))
            .collect();
        AlgorithmRegistry { adapters }
    }
}

/// Frozen mapping from `AlgorithmId` to its adapter.
#[derive(Debug)]
pub struct AlgorithmRegistry {
    adapters: BTreeMap<AlgorithmId, Adapter>,
}

impl AlgorithmRegistry {
    /// Resolves the adapter bound to `id`.
    pub fn resolve(&self, id: AlgorithmId) -> Result<Adapter> {
        self.adapters
            .get(&id)
            .copied()
            .ok_or(CryptoError::UnknownAlgorithm(id))
    }

    pub fn is_registered(&self, id: AlgorithmId) -> bool {
        self.adapters.contains_key(&id)
    }

    /// All registered ids in wire-code order.
    pub fn supported(&self) -> Vec<AlgorithmId> {
        self.adapters.keys().copied().collect()
    }

    pub fn supported_classical(&self) -> Vec<AlgorithmId> {
        self.supported_of_kind(AlgorithmKind::Classical)
    }

    pub fn supported_post_quantum(&self) -> Vec<AlgorithmId> {
        self.supported_of_kind(AlgorithmKind::PostQuantum)
    }

    fn supported_of_kind(&self, kind: AlgorithmKind) -> Vec<AlgorithmId> {
        self.adapters
            .keys()
            .copied()
            .filter(|id| id.kind() == kind)
            .collect()
    }

    /// Installs the process-wide registry.
    ///
    /// # Errors
    ///
    /// `RegistryFrozen` if a registry was already installed, including one
    /// installed lazily by [`AlgorithmRegistry::global`].
    pub fn install(builder: RegistryBuilder) -> Result<&'static AlgorithmRegistry> {
        use tracing::info;

        let mut fresh = Some(builder);
        let installed = GLOBAL_REGISTRY.get_or_init(|| match fresh.take() {
            Some(builder) => builder.build(),
            None => RegistryBuilder::new().build(),
        });

        if fresh.is_some() {
            return Err(CryptoError::RegistryFrozen);
        }

        info!(
            target: "crypto::registry",
            algorithms = installed.adapters.len(),
            "Installed global algorithm registry"
        );
        Ok(installed)
    }

    /// Process-wide registry; installs the default set on first use.
    pub fn global() -> &'static AlgorithmRegistry {
        GLOBAL_REGISTRY.get_or_init(|| RegistryBuilder::with_defaults().build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::algorithm::Capability;

    #[test]
    fn test_defaults_enumerate_by_kind() {
        let registry = RegistryBuilder::with_defaults().build();
        let classical = registry.supported_classical();
        assert_eq!(classical, vec![AlgorithmId::X25519, AlgorithmId::Ed25519]);
        for id in registry.supported_post_quantum() {
            assert!(id.is_post_quantum());
        }
        assert_eq!(
            registry.supported().len(),
            classical.len() + registry.supported_post_quantum().len()
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = RegistryBuilder::new().build();
        assert!(matches!(
            registry.resolve(AlgorithmId::Ed25519),
            Err(CryptoError::UnknownAlgorithm(AlgorithmId::Ed25519))
        ));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(AlgorithmId::X25519, AdapterFactory::kem::<X25519Kem>())
            .unwrap()
            .register(AlgorithmId::X25519, AdapterFactory::kem::<X25519Kem>())
            .unwrap();
        let registry = builder.build();
        assert_eq!(registry.supported(), vec![AlgorithmId::X25519]);
        assert_eq!(
            registry.resolve(AlgorithmId::X25519).unwrap().capability(),
            Capability::Kem
        );
    }

    #[test]
    fn test_register_capability_mismatch() {
        let mut builder = RegistryBuilder::new();
        assert!(matches!(
            builder.register(AlgorithmId::X25519, AdapterFactory::signature::<Ed25519Signer>()),
            Err(CryptoError::UnsupportedOperation { .. })
        ));
        assert!(!builder.is_registered(AlgorithmId::X25519));
    }
}
