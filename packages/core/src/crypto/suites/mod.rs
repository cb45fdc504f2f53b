//! Криптографические наборы (провайдеры примитивов)
//!
//! Этот модуль содержит реализации `KemPrimitive` / `SignaturePrimitive`.
//!
//! ## Доступные провайдеры
//!
//! ### Classic (всегда)
//! - **KEM**: X25519 (ephemeral-static DH)
//! - **Signatures**: Ed25519
//!
//! ### Post-Quantum (feature `post-quantum`, по умолчанию)
//! - **KEM**: ML-KEM-512/768/1024 (Kyber)
//! - **Signatures**: ML-DSA-44/65/87 (Dilithium)
//!
//! ### Extended (feature `extended-pq`)
//! - **KEM**: FrodoKEM-640-SHAKE, FrodoKEM-976-AES, NTRU-HRSS-701
//! - **Signatures**: Falcon-512/1024, SPHINCS+-SHA2-128f
//!
//! Провайдеры не используются напрямую: их регистрирует
//! [`crate::crypto::registry::RegistryBuilder::with_defaults`].

pub mod classic;

#[cfg(feature = "post-quantum")]
pub mod post_quantum;
