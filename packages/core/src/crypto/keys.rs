// Ключевой материал
// Публичные/секретные ключи, шифртексты и подписи, помеченные AlgorithmId

use crate::crypto::algorithm::AlgorithmId;
use crate::error::{CryptoError, Result};
use crate::utils::b64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Публичный ключ
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    algorithm: AlgorithmId,
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(algorithm: AlgorithmId, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Короткий отпечаток для логов (первые 8 байт SHA-256)
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.bytes);
        hex::encode(&digest[..8])
    }

    pub fn to_base64(&self) -> String {
        b64::encode(&self.bytes)
    }

    pub fn from_base64(algorithm: AlgorithmId, encoded: &str) -> Result<Self> {
        let bytes = b64::decode(encoded).map_err(CryptoError::Serialization)?;
        Ok(Self::new(algorithm, bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Секретный ключ
///
/// Не клонируется; байты затираются при drop.
pub struct SecretKey {
    algorithm: AlgorithmId,
    bytes: Zeroizing<Vec<u8>>,
}

impl SecretKey {
    pub fn from_bytes(algorithm: AlgorithmId, bytes: Vec<u8>) -> Self {
        Self {
            algorithm,
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Raw secret bytes, for handing to a secure key store.
    pub fn expose_secret(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Пара ключей одного алгоритма
#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

impl KeyPair {
    /// Собрать пару из половин; обе должны принадлежать одному алгоритму.
    pub fn from_parts(public: PublicKey, secret: SecretKey) -> Result<Self> {
        if public.algorithm() != secret.algorithm() {
            return Err(CryptoError::AlgorithmMismatch {
                expected: public.algorithm().to_string(),
                actual: secret.algorithm(),
            });
        }
        Ok(Self { public, secret })
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.public.algorithm()
    }

    pub fn into_parts(self) -> (PublicKey, SecretKey) {
        (self.public, self.secret)
    }
}

/// KEM шифртекст
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    algorithm: AlgorithmId,
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl Ciphertext {
    pub fn new(algorithm: AlgorithmId, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({}, {} bytes)", self.algorithm, self.bytes.len())
    }
}

/// Detached подпись (без копии сообщения)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    algorithm: AlgorithmId,
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl Signature {
    pub fn new(algorithm: AlgorithmId, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}, {})", self.algorithm, hex::encode(&self.bytes))
    }
}

/// Общий секрет KEM
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
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

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl Eq for SharedSecret {}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED; {}])", self.0.len())
    }
}
