//! Algorithm identifiers.
//!
//! `AlgorithmId` is a closed set: adding a primitive means adding a variant
//! here and a provider in [`crate::crypto::suites`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classical or post-quantum family of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    Classical,
    PostQuantum,
}

/// What a primitive can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Kem,
    Signature,
}

/// Identifier of a specific primitive and parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlgorithmId {
    // Классические
    X25519,
    Ed25519,

    // ML-KEM (Kyber)
    Kyber512,
    Kyber768,
    Kyber1024,

    // ML-DSA (Dilithium)
    Dilithium2,
    Dilithium3,
    Dilithium5,

    // Расширенный набор
    Falcon512,
    Falcon1024,
    SphincsSha2_128f,
    FrodoKem640Shake,
    FrodoKem976Aes,
    NtruHrss701,
}

impl AlgorithmId {
    pub const ALL: [AlgorithmId; 14] = [
        AlgorithmId::X25519,
        AlgorithmId::Ed25519,
        AlgorithmId::Kyber512,
        AlgorithmId::Kyber768,
        AlgorithmId::Kyber1024,
        AlgorithmId::Dilithium2,
        AlgorithmId::Dilithium3,
        AlgorithmId::Dilithium5,
        AlgorithmId::Falcon512,
        AlgorithmId::Falcon1024,
        AlgorithmId::SphincsSha2_128f,
        AlgorithmId::FrodoKem640Shake,
        AlgorithmId::FrodoKem976Aes,
        AlgorithmId::NtruHrss701,
    ];

    /// Stable textual name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X25519 => "x25519",
            Self::Ed25519 => "ed25519",
            Self::Kyber512 => "ml-kem-512",
            Self::Kyber768 => "ml-kem-768",
            Self::Kyber1024 => "ml-kem-1024",
            Self::Dilithium2 => "ml-dsa-44",
            Self::Dilithium3 => "ml-dsa-65",
            Self::Dilithium5 => "ml-dsa-87",
            Self::Falcon512 => "falcon-512",
            Self::Falcon1024 => "falcon-1024",
            Self::SphincsSha2_128f => "sphincs+-sha2-128f",
            Self::FrodoKem640Shake => "frodokem-640-shake",
            Self::FrodoKem976Aes => "frodokem-976-aes",
            Self::NtruHrss701 => "ntru-hrss-701",
        }
    }

    /// Numeric code used in wire framing and storage records.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::X25519 => 0x0001,
            Self::Ed25519 => 0x0002,
            Self::Kyber512 => 0x0101,
            Self::Kyber768 => 0x0102,
            Self::Kyber1024 => 0x0103,
            Self::Dilithium2 => 0x0201,
            Self::Dilithium3 => 0x0202,
            Self::Dilithium5 => 0x0203,
            Self::Falcon512 => 0x0301,
            Self::Falcon1024 => 0x0302,
            Self::SphincsSha2_128f => 0x0401,
            Self::FrodoKem640Shake => 0x0501,
            Self::FrodoKem976Aes => 0x0502,
            Self::NtruHrss701 => 0x0601,
        }
    }

    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.code() == code)
    }

    #[must_use]
    pub const fn kind(self) -> AlgorithmKind {
        match self {
            Self::X25519 | Self::Ed25519 => AlgorithmKind::Classical,
            _ => AlgorithmKind::PostQuantum,
        }
    }

    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::X25519
            | Self::Kyber512
            | Self::Kyber768
            | Self::Kyber1024
            | Self::FrodoKem640Shake
            | Self::FrodoKem976Aes
            | Self::NtruHrss701 => Capability::Kem,
            Self::Ed25519
            | Self::Dilithium2
            | Self::Dilithium3
            | Self::Dilithium5
            | Self::Falcon512
            | Self::Falcon1024
            | Self::SphincsSha2_128f => Capability::Signature,
        }
    }

    #[must_use]
    pub const fn is_post_quantum(self) -> bool {
        matches!(self.kind(), AlgorithmKind::PostQuantum)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| format!("unknown algorithm name: {}", s))
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classical => f.write_str("classical"),
            Self::PostQuantum => f.write_str("post-quantum"),
        }
    }
}
