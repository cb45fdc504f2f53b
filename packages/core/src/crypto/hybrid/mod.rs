//! Гибридная композиция
//!
//! [`HybridComposer`] pairs one classical and one post-quantum adapter so a
//! caller gets a single KEM or signature operation that stays secure as
//! long as either component does.
//!
//! - KEM: both components encapsulate independently; the combined secret is
//!   HKDF over `classical || post_quantum || context_label`.
//! - Signatures: both components sign the same message; verification is
//!   conjunctive.
//!
//! Component secrets never leave this module.

pub mod envelope;
pub mod kdf;
pub mod types;

pub use envelope::{AeadAlgorithm, SealedEnvelope};
pub use kdf::derive_combined_secret;
pub use types::{
    validate_pairing, CombinationRule, HybridCiphertext, HybridKeyPair, HybridPublicKey,
    HybridSecretKey, HybridSharedSecret, HybridSignature,
};

use crate::config::Config;
use crate::crypto::adapter::Adapter;
use crate::crypto::algorithm::{AlgorithmId, Capability};
use crate::crypto::registry::AlgorithmRegistry;
use crate::error::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of a hybrid pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HybridComponent {
    Classical,
    PostQuantum,
}

impl fmt::Display for HybridComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classical => write!(f, "classical"),
            Self::PostQuantum => write!(f, "post-quantum"),
        }
    }
}

/// Combines classical and post-quantum adapters resolved from a registry.
#[derive(Debug, Clone)]
pub struct HybridComposer<'a> {
    registry: &'a AlgorithmRegistry,
    rule: CombinationRule,
    context_label: Vec<u8>,
    secret_len: usize,
    parallel: bool,
}

impl<'a> HybridComposer<'a> {
    /// Composer over `registry`, configured from [`Config::global`].
    pub fn new(registry: &'a AlgorithmRegistry) -> Self {
        // Глобальная конфигурация уже проверена при установке
        Self::from_validated(registry, Config::global())
    }

    /// Composer over `registry` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `config` fails [`Config::validate`].
    pub fn with_config(registry: &'a AlgorithmRegistry, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(registry, config))
    }

    fn from_validated(registry: &'a AlgorithmRegistry, config: &Config) -> Self {
        Self {
            registry,
            rule: CombinationRule::default(),
            context_label: config.hybrid_context_label.clone(),
            secret_len: config.hybrid_secret_length,
            parallel: config.parallel_components,
        }
    }

    /// Rule recorded in newly generated hybrid key pairs.
    pub fn with_rule(mut self, rule: CombinationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &'a AlgorithmRegistry {
        self.registry
    }

    // ============================================================================
    // Key generation
    // ============================================================================

    /// Generates a hybrid key pair from a classical and a PQ algorithm of
    /// the same capability.
    pub fn hybrid_keypair(&self, classical: AlgorithmId, post_quantum: AlgorithmId) -> Result<HybridKeyPair> {
        use tracing::debug;

        validate_pairing(classical, post_quantum)?;
        let (classical_adapter, pq_adapter) = self.resolve_pair(classical, post_quantum)?;

        let (classical_pair, pq_pair) = self.run_pair(
            move || classical_adapter.generate_keypair(),
            move || pq_adapter.generate_keypair(),
        );
        let pair = HybridKeyPair::pair(Some(classical_pair?), Some(pq_pair?), self.rule)?;

        debug!(
            target: "crypto::hybrid",
            classical = %classical,
            post_quantum = %post_quantum,
            rule = ?self.rule,
            "Generated hybrid key pair"
        );
        Ok(pair)
    }

    // ============================================================================
    // KEM
    // ============================================================================

    pub fn hybrid_encapsulate(
        &self,
        public_key: &HybridPublicKey,
    ) -> Result<(HybridCiphertext, HybridSharedSecret)> {
        self.require(public_key.capability(), Capability::Kem, public_key.classical().algorithm(), "encapsulate")?;
        let (classical, post_quantum) = public_key.algorithms();
        let (classical_adapter, pq_adapter) = self.resolve_pair(classical, post_quantum)?;

        let (classical_out, pq_out) = self.run_pair(
            move || classical_adapter.encapsulate(public_key.classical()),
            move || pq_adapter.encapsulate(public_key.post_quantum()),
        );
        let (classical_ct, classical_ss) = classical_out?;
        let (pq_ct, pq_ss) = pq_out?;

        let secret = derive_combined_secret(
            public_key.rule(),
            &classical_ss,
            &pq_ss,
            &self.context_label,
            self.secret_len,
        )?;

        tracing::trace!(
            target: "crypto::hybrid",
            classical = %classical,
            post_quantum = %post_quantum,
            "Hybrid encapsulation complete"
        );
        Ok((HybridCiphertext::new(classical_ct, pq_ct)?, secret))
    }

    pub fn hybrid_decapsulate(
        &self,
        ciphertext: &HybridCiphertext,
        secret_key: &HybridSecretKey,
    ) -> Result<HybridSharedSecret> {
        self.require(secret_key.capability(), Capability::Kem, secret_key.classical().algorithm(), "decapsulate")?;
        let (classical, post_quantum) = secret_key.algorithms();
        let (classical_adapter, pq_adapter) = self.resolve_pair(classical, post_quantum)?;

        let (classical_ss, pq_ss) = self.run_pair(
            move || classical_adapter.decapsulate(ciphertext.classical(), secret_key.classical()),
            move || pq_adapter.decapsulate(ciphertext.post_quantum(), secret_key.post_quantum()),
        );

        derive_combined_secret(
            secret_key.rule(),
            &classical_ss?,
            &pq_ss?,
            &self.context_label,
            self.secret_len,
        )
    }

    // ============================================================================
    // Signatures
    // ============================================================================

    /// Signs the identical message with both components.
    pub fn hybrid_sign(&self, message: &[u8], secret_key: &HybridSecretKey) -> Result<HybridSignature> {
        self.require(secret_key.capability(), Capability::Signature, secret_key.classical().algorithm(), "sign")?;
        let (classical, post_quantum) = secret_key.algorithms();
        let (classical_adapter, pq_adapter) = self.resolve_pair(classical, post_quantum)?;

        let (classical_sig, pq_sig) = self.run_pair(
            move || classical_adapter.sign(message, secret_key.classical()),
            move || pq_adapter.sign(message, secret_key.post_quantum()),
        );
        HybridSignature::new(classical_sig?, pq_sig?)
    }

    /// Verifies both components.
    ///
    /// # Errors
    ///
    /// `PartialVerificationFailure` when exactly one component rejects,
    /// `VerificationFailed` when both do. Malformed input and primitive
    /// failures propagate as-is.
    pub fn hybrid_verify_detailed(
        &self,
        message: &[u8],
        signature: &HybridSignature,
        public_key: &HybridPublicKey,
    ) -> Result<()> {
        use tracing::warn;

        self.require(public_key.capability(), Capability::Signature, public_key.classical().algorithm(), "verify")?;
        let (classical, post_quantum) = public_key.algorithms();
        let (classical_adapter, pq_adapter) = self.resolve_pair(classical, post_quantum)?;

        // Оба компонента проверяются всегда, без short-circuit
        let (classical_ok, pq_ok) = self.run_pair(
            move || classical_adapter.verify(message, signature.classical(), public_key.classical()),
            move || pq_adapter.verify(message, signature.post_quantum(), public_key.post_quantum()),
        );

        match (classical_ok?, pq_ok?) {
            (true, true) => Ok(()),
            (false, false) => Err(CryptoError::VerificationFailed),
            (false, true) => {
                warn!(
                    target: "crypto::hybrid",
                    algorithm = %classical,
                    "Classical component rejected a hybrid signature"
                );
                Err(CryptoError::PartialVerificationFailure {
                    failed: HybridComponent::Classical,
                })
            }
            (true, false) => {
                warn!(
                    target: "crypto::hybrid",
                    algorithm = %post_quantum,
                    "Post-quantum component rejected a hybrid signature"
                );
                Err(CryptoError::PartialVerificationFailure {
                    failed: HybridComponent::PostQuantum,
                })
            }
        }
    }

    /// `true` only if both components verify.
    pub fn hybrid_verify(
        &self,
        message: &[u8],
        signature: &HybridSignature,
        public_key: &HybridPublicKey,
    ) -> Result<bool> {
        match self.hybrid_verify_detailed(message, signature, public_key) {
            Ok(()) => Ok(true),
            Err(CryptoError::PartialVerificationFailure { .. }) | Err(CryptoError::VerificationFailed) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn resolve_pair(&self, classical: AlgorithmId, post_quantum: AlgorithmId) -> Result<(Adapter, Adapter)> {
        Ok((self.registry.resolve(classical)?, self.registry.resolve(post_quantum)?))
    }

    fn require(
        &self,
        actual: Capability,
        required: Capability,
        algorithm: AlgorithmId,
        operation: &'static str,
    ) -> Result<()> {
        if actual != required {
            return Err(CryptoError::UnsupportedOperation { algorithm, operation });
        }
        Ok(())
    }

    /// Runs the classical and PQ halves, on two scoped threads when
    /// parallel execution is enabled. Both are always joined.
    fn run_pair<A, B, FA, FB>(&self, classical: FA, post_quantum: FB) -> (A, B)
    where
        FA: FnOnce() -> A + Send,
        FB: FnOnce() -> B + Send,
        A: Send,
        B: Send,
    {
        if !self.parallel {
            return (classical(), post_quantum());
        }

        std::thread::scope(|scope| {
            let pq_handle = scope.spawn(post_quantum);
            let classical_out = classical();
            let pq_out = match pq_handle.join() {
                Ok(out) => out,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (classical_out, pq_out)
        })
    }
}

impl HybridComposer<'static> {
    /// Composer over the process-wide registry.
    pub fn global() -> Self {
        Self::new(AlgorithmRegistry::global())
    }
}
