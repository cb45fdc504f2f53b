// Гибридный конверт (KEM-DEM)
// Гибридная инкапсуляция + AEAD на ключе, выведенном из гибридного секрета

use super::kdf::derive_envelope_key;
use super::types::{HybridCiphertext, HybridPublicKey, HybridSecretKey};
use super::HybridComposer;
use crate::crypto::algorithm::AlgorithmId;
use crate::error::{CryptoError, Result};
use crate::protocol::wire::{pack_raw, unpack_raw};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::ChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Длина nonce для обоих AEAD (96 бит)
pub const NONCE_LENGTH: usize = 12;

/// AEAD used for the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AeadAlgorithm {
    #[default]
    ChaCha20Poly1305,
    Aes256Gcm,
}

/// Sealed payload plus everything needed to open it with the hybrid
/// secret key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    pub classical: AlgorithmId,
    pub post_quantum: AlgorithmId,
    pub aead: AeadAlgorithm,
    #[serde(with = "serde_bytes")]
    pub kem_ciphertext: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub nonce: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// MessagePack form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        pack_raw(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        unpack_raw(bytes)
    }
}

impl HybridComposer<'_> {
    /// Encrypts `plaintext` to a hybrid KEM public key.
    pub fn seal(
        &self,
        public_key: &HybridPublicKey,
        plaintext: &[u8],
        aad: &[u8],
        aead: AeadAlgorithm,
    ) -> Result<SealedEnvelope> {
        let (kem_ciphertext, secret) = self.hybrid_encapsulate(public_key)?;
        let key = derive_envelope_key(&secret)?;

        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);

        let payload = Payload { msg: plaintext, aad };
        let ciphertext = match aead {
            AeadAlgorithm::ChaCha20Poly1305 => ChaCha20Poly1305::new(chacha20poly1305::Key::from_slice(&key[..]))
                .encrypt(chacha20poly1305::Nonce::from_slice(&nonce), payload)?,
            AeadAlgorithm::Aes256Gcm => Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(&key[..]))
                .encrypt(aes_gcm::Nonce::from_slice(&nonce), payload)?,
        };

        let (classical, post_quantum) = public_key.algorithms();
        tracing::debug!(
            target: "crypto::hybrid",
            classical = %classical,
            post_quantum = %post_quantum,
            aead = ?aead,
            plaintext_len = plaintext.len(),
            "Sealed hybrid envelope"
        );

        Ok(SealedEnvelope {
            classical,
            post_quantum,
            aead,
            kem_ciphertext: kem_ciphertext.to_bytes()?,
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Decrypts an envelope. Any tampering surfaces as `Aead`.
    pub fn open(&self, envelope: &SealedEnvelope, secret_key: &HybridSecretKey, aad: &[u8]) -> Result<Vec<u8>> {
        if (envelope.classical, envelope.post_quantum) != secret_key.algorithms() {
            let (expected_classical, expected_pq) = secret_key.algorithms();
            let actual = if envelope.classical != expected_classical {
                envelope.classical
            } else {
                envelope.post_quantum
            };
            return Err(CryptoError::AlgorithmMismatch {
                expected: format!("{} + {}", expected_classical, expected_pq),
                actual,
            });
        }
        if envelope.nonce.len() != NONCE_LENGTH {
            return Err(CryptoError::LengthMismatch(format!(
                "envelope nonce is {} bytes, expected {}",
                envelope.nonce.len(),
                NONCE_LENGTH
            )));
        }

        let kem_ciphertext =
            HybridCiphertext::from_bytes(&envelope.kem_ciphertext, envelope.classical, envelope.post_quantum)?;
        let secret = self.hybrid_decapsulate(&kem_ciphertext, secret_key)?;
        let key = derive_envelope_key(&secret)?;

        let payload = Payload {
            msg: &envelope.ciphertext,
            aad,
        };
        let plaintext = match envelope.aead {
            AeadAlgorithm::ChaCha20Poly1305 => ChaCha20Poly1305::new(chacha20poly1305::Key::from_slice(&key[..]))
                .decrypt(chacha20poly1305::Nonce::from_slice(&envelope.nonce), payload)?,
            AeadAlgorithm::Aes256Gcm => Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(&key[..]))
                .decrypt(aes_gcm::Nonce::from_slice(&envelope.nonce), payload)?,
        };
        Ok(plaintext)
    }
}
