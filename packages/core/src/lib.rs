// Quantum Toolkit Core
// Algorithm-agile KEM/signature layer with hybrid and threshold composition

#![warn(clippy::all)]

// Модули
pub mod config;
pub mod crypto;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod utils;

// Re-exports для удобства
pub use crypto::adapter::{Adapter, AdapterFactory};
pub use crypto::algorithm::{AlgorithmId, AlgorithmKind, Capability};
pub use crypto::hybrid::{
    AeadAlgorithm, CombinationRule, HybridCiphertext, HybridComponent, HybridComposer,
    HybridKeyPair, HybridPublicKey, HybridSecretKey, HybridSharedSecret, HybridSignature,
    SealedEnvelope,
};
pub use crypto::keys::{Ciphertext, KeyPair, PublicKey, SecretKey, SharedSecret, Signature};
pub use crypto::registry::{AlgorithmRegistry, RegistryBuilder};
pub use crypto::threshold::{
    GroupPublicKey, SessionState, SignatureShare, SigningRound, SigningSession, ThresholdShare,
    TrustedDealer,
};
pub use error::{CryptoError, Result};
