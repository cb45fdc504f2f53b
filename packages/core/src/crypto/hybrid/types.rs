// Гибридные типы
// Пары (классический, постквантовый), всегда в этом порядке

use crate::crypto::algorithm::{AlgorithmId, AlgorithmKind, Capability};
use crate::crypto::keys::{Ciphertext, KeyPair, PublicKey, SecretKey, Signature};
use crate::error::{CryptoError, Result};
use crate::protocol::wire::{encode_components, split_components};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// KDF used to combine the two component secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombinationRule {
    #[default]
    HkdfSha256,
    HkdfSha512,
}

impl CombinationRule {
    /// HKDF info string; distinct per rule.
    pub fn label(&self) -> &'static [u8] {
        match self {
            Self::HkdfSha256 => b"qtk-hybrid-kem/hkdf-sha256",
            Self::HkdfSha512 => b"qtk-hybrid-kem/hkdf-sha512",
        }
    }
}

/// Checks that `classical`/`post_quantum` form a valid hybrid pair and
/// returns their shared capability.
pub fn validate_pairing(classical: AlgorithmId, post_quantum: AlgorithmId) -> Result<Capability> {
    if classical.kind() != AlgorithmKind::Classical {
        return Err(CryptoError::AlgorithmMismatch {
            expected: "a classical algorithm".to_string(),
            actual: classical,
        });
    }
    if post_quantum.kind() != AlgorithmKind::PostQuantum {
        return Err(CryptoError::AlgorithmMismatch {
            expected: "a post-quantum algorithm".to_string(),
            actual: post_quantum,
        });
    }
    if classical.capability() != post_quantum.capability() {
        return Err(CryptoError::AlgorithmMismatch {
            expected: format!("a post-quantum {:?} algorithm to pair with {}", classical.capability(), classical),
            actual: post_quantum,
        });
    }
    Ok(classical.capability())
}

/// Публичная половина гибридной пары
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridPublicKey {
    classical: PublicKey,
    post_quantum: PublicKey,
    rule: CombinationRule,
}

impl HybridPublicKey {
    pub fn new(classical: PublicKey, post_quantum: PublicKey, rule: CombinationRule) -> Result<Self> {
        validate_pairing(classical.algorithm(), post_quantum.algorithm())?;
        Ok(Self {
            classical,
            post_quantum,
            rule,
        })
    }

    pub fn classical(&self) -> &PublicKey {
        &self.classical
    }

    pub fn post_quantum(&self) -> &PublicKey {
        &self.post_quantum
    }

    pub fn rule(&self) -> CombinationRule {
        self.rule
    }

    pub fn capability(&self) -> Capability {
        self.classical.algorithm().capability()
    }

    /// `(classical, post_quantum)` ids.
    pub fn algorithms(&self) -> (AlgorithmId, AlgorithmId) {
        (self.classical.algorithm(), self.post_quantum.algorithm())
    }
}

/// Секретная половина гибридной пары (не клонируется)
#[derive(Debug)]
pub struct HybridSecretKey {
    classical: SecretKey,
    post_quantum: SecretKey,
    rule: CombinationRule,
}

impl HybridSecretKey {
    pub fn new(classical: SecretKey, post_quantum: SecretKey, rule: CombinationRule) -> Result<Self> {
        validate_pairing(classical.algorithm(), post_quantum.algorithm())?;
        Ok(Self {
            classical,
            post_quantum,
            rule,
        })
    }

    pub fn classical(&self) -> &SecretKey {
        &self.classical
    }

    pub fn post_quantum(&self) -> &SecretKey {
        &self.post_quantum
    }

    pub fn rule(&self) -> CombinationRule {
        self.rule
    }

    pub fn capability(&self) -> Capability {
        self.classical.algorithm().capability()
    }

    pub fn algorithms(&self) -> (AlgorithmId, AlgorithmId) {
        (self.classical.algorithm(), self.post_quantum.algorithm())
    }
}

/// Гибридная пара ключей
#[derive(Debug)]
pub struct HybridKeyPair {
    pub public: HybridPublicKey,
    pub secret: HybridSecretKey,
}

impl HybridKeyPair {
    /// Combines two component key pairs.
    ///
    /// Both halves are required; a missing one is `IncompleteHybridPair`
    /// before any other check runs.
    pub fn pair(
        classical: Option<KeyPair>,
        post_quantum: Option<KeyPair>,
        rule: CombinationRule,
    ) -> Result<Self> {
        let (classical, post_quantum) = match (classical, post_quantum) {
            (Some(c), Some(p)) => (c, p),
            (None, Some(_)) => {
                return Err(CryptoError::IncompleteHybridPair(
                    "classical component missing".to_string(),
                ))
            }
            (Some(_), None) => {
                return Err(CryptoError::IncompleteHybridPair(
                    "post-quantum component missing".to_string(),
                ))
            }
            (None, None) => {
                return Err(CryptoError::IncompleteHybridPair(
                    "both components missing".to_string(),
                ))
            }
        };

        validate_pairing(classical.algorithm(), post_quantum.algorithm())?;

        let (classical_public, classical_secret) = classical.into_parts();
        let (pq_public, pq_secret) = post_quantum.into_parts();
        Ok(Self {
            public: HybridPublicKey {
                classical: classical_public,
                post_quantum: pq_public,
                rule,
            },
            secret: HybridSecretKey {
                classical: classical_secret,
                post_quantum: pq_secret,
                rule,
            },
        })
    }

    pub fn into_parts(self) -> (HybridPublicKey, HybridSecretKey) {
        (self.public, self.secret)
    }
}

/// Гибридный KEM шифртекст
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridCiphertext {
    classical: Ciphertext,
    post_quantum: Ciphertext,
}

impl HybridCiphertext {
    pub fn new(classical: Ciphertext, post_quantum: Ciphertext) -> Result<Self> {
        validate_pairing(classical.algorithm(), post_quantum.algorithm())?;
        Ok(Self {
            classical,
            post_quantum,
        })
    }

    pub fn classical(&self) -> &Ciphertext {
        &self.classical
    }

    pub fn post_quantum(&self) -> &Ciphertext {
        &self.post_quantum
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_components(&[self.classical.as_bytes(), self.post_quantum.as_bytes()])
    }

    /// Parses the framed form; the ids come from the key the ciphertext
    /// was produced for.
    pub fn from_bytes(bytes: &[u8], classical: AlgorithmId, post_quantum: AlgorithmId) -> Result<Self> {
        let parts = split_components(bytes, 2)?;
        Self::new(
            Ciphertext::new(classical, parts[0].to_vec()),
            Ciphertext::new(post_quantum, parts[1].to_vec()),
        )
    }
}

/// Гибридная подпись (две detached подписи одного сообщения)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridSignature {
    classical: Signature,
    post_quantum: Signature,
}

impl HybridSignature {
    pub fn new(classical: Signature, post_quantum: Signature) -> Result<Self> {
        validate_pairing(classical.algorithm(), post_quantum.algorithm())?;
        Ok(Self {
            classical,
            post_quantum,
        })
    }

    pub fn classical(&self) -> &Signature {
        &self.classical
    }

    pub fn post_quantum(&self) -> &Signature {
        &self.post_quantum
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_components(&[self.classical.as_bytes(), self.post_quantum.as_bytes()])
    }

    pub fn from_bytes(bytes: &[u8], classical: AlgorithmId, post_quantum: AlgorithmId) -> Result<Self> {
        let parts = split_components(bytes, 2)?;
        Self::new(
            Signature::new(classical, parts[0].to_vec()),
            Signature::new(post_quantum, parts[1].to_vec()),
        )
    }
}

/// Итоговый гибридный секрет (выход KDF)
pub struct HybridSharedSecret(Zeroizing<Vec<u8>>);

impl HybridSharedSecret {
    pub(crate) fn new(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for HybridSharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl Eq for HybridSharedSecret {}

impl fmt::Debug for HybridSharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HybridSharedSecret([REDACTED; {}])", self.0.len())
    }
}
