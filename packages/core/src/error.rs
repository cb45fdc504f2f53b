use crate::crypto::algorithm::AlgorithmId;
use crate::crypto::hybrid::HybridComponent;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(AlgorithmId),
    #[error("Algorithm {0} is already registered with a different factory")]
    AlgorithmConflict(AlgorithmId),
    #[error("Algorithm registry is already frozen")]
    RegistryFrozen,
    #[error("Malformed {what} for {algorithm}: expected {expected} bytes, got {actual}")]
    MalformedKeyMaterial {
        algorithm: AlgorithmId,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Algorithm mismatch: expected {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: String,
        actual: AlgorithmId,
    },
    #[error("Operation {operation} is not supported by {algorithm}")]
    UnsupportedOperation {
        algorithm: AlgorithmId,
        operation: &'static str,
    },
    #[error("Primitive {algorithm} failed: {reason}")]
    ComponentPrimitiveFailure {
        algorithm: AlgorithmId,
        reason: String,
    },
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),
    #[error("Incomplete hybrid pair: {0}")]
    IncompleteHybridPair(String),
    #[error("Hybrid signature only partially verified: {failed} component rejected")]
    PartialVerificationFailure { failed: HybridComponent },
    #[error("Signature verification failed")]
    VerificationFailed,
    #[error("Signature share is bound to a different message")]
    MessageMismatch,
    #[error("Signing session is closed ({0})")]
    SessionClosed(&'static str),
    #[error("Threshold not met: {collected} of {threshold} shares collected")]
    ThresholdNotMet { collected: usize, threshold: u16 },
    #[error("Unknown participant {index} (participants are 1..={total})")]
    UnknownParticipant { index: u16, total: u16 },
    #[error("Invalid signature share from participant {index}")]
    InvalidSignatureShare { index: u16 },
    #[error("Invalid threshold parameters: threshold {threshold}, participants {total}")]
    InvalidThresholdParameters { threshold: u16, total: u16 },
    #[error("Aggregation already in progress")]
    AggregationInProgress,
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("AEAD operation failed: {0}")]
    Aead(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<chacha20poly1305::Error> for CryptoError {
    fn from(err: chacha20poly1305::Error) -> Self {
        CryptoError::Aead(err.to_string())
    }
}

impl From<hkdf::InvalidLength> for CryptoError {
    fn from(err: hkdf::InvalidLength) -> Self {
        CryptoError::KeyDerivation(err.to_string())
    }
}

impl From<bincode::Error> for CryptoError {
    fn from(err: bincode::Error) -> Self {
        CryptoError::Serialization(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for CryptoError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        CryptoError::Serialization(format!("MessagePack pack error: {}", err))
    }
}

impl From<rmp_serde::decode::Error> for CryptoError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        CryptoError::Serialization(format!("MessagePack unpack error: {}", err))
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
