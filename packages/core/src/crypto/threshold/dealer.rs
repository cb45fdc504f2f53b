// Доверенный дилер
// Генерирует групповой ключ, доли ключа и доли nonce для каждого раунда подписи

use super::field::split_secret;
use super::share::ThresholdShare;
use crate::config::Config;
use crate::crypto::algorithm::AlgorithmId;
use crate::crypto::keys::{PublicKey, SecretKey};
use crate::error::{CryptoError, Result};
use crate::utils::uuid;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use zeroize::{Zeroize, Zeroizing};

/// Public record of one participant. Never contains secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareMetadata {
    pub index: u16,
    pub algorithm: AlgorithmId,
    /// Compressed `s_i·B`.
    pub verification_share: [u8; 32],
}

/// Group verifying key plus the public half of every share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPublicKey {
    group_id: String,
    threshold: u16,
    total: u16,
    verifying_key: PublicKey,
    shares: Vec<ShareMetadata>,
}

impl GroupPublicKey {
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn total(&self) -> u16 {
        self.total
    }

    /// Ordinary Ed25519 public key that verifies aggregate signatures.
    pub fn verifying_key(&self) -> &PublicKey {
        &self.verifying_key
    }

    pub fn participants(&self) -> &[ShareMetadata] {
        &self.shares
    }

    pub fn contains(&self, index: u16) -> bool {
        (1..=self.total).contains(&index)
    }

    pub(crate) fn verification_point(&self, index: u16) -> Result<EdwardsPoint> {
        let metadata = self
            .shares
            .iter()
            .find(|m| m.index == index)
            .ok_or(CryptoError::UnknownParticipant {
                index,
                total: self.total,
            })?;
        decompress(&metadata.verification_share)
    }

    pub(crate) fn group_point(&self) -> Result<EdwardsPoint> {
        let bytes: [u8; 32] = self.verifying_key.as_bytes().try_into().map_err(|_| {
            CryptoError::MalformedKeyMaterial {
                algorithm: AlgorithmId::Ed25519,
                what: "group public key",
                expected: 32,
                actual: self.verifying_key.as_bytes().len(),
            }
        })?;
        decompress(&bytes)
    }
}

/// Commitment `R_i = r_i·B` of one participant's nonce share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCommitment {
    pub index: u16,
    pub commitment: [u8; 32],
}

/// Public data of one signing round, bound to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRound {
    pub round_id: String,
    pub group_id: String,
    /// SHA-256 of the message.
    pub message_digest: [u8; 32],
    /// Compressed group nonce `R`.
    pub nonce_commitment: [u8; 32],
    pub commitments: Vec<RoundCommitment>,
    /// `SHA-512(R || A || M) mod ℓ`.
    pub challenge: [u8; 32],
}

impl SigningRound {
    pub(crate) fn challenge_scalar(&self) -> Result<Scalar> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(self.challenge))
            .ok_or_else(|| CryptoError::Serialization("Non-canonical round challenge".to_string()))
    }

    pub(crate) fn commitment_point(&self, index: u16) -> Result<EdwardsPoint> {
        let commitment = self
            .commitments
            .iter()
            .find(|c| c.index == index)
            .ok_or(CryptoError::InvalidSignatureShare { index })?;
        decompress(&commitment.commitment)
    }
}

/// Single-use nonce share of one participant; consumed by signing.
pub struct NonceShare {
    pub(crate) round_id: String,
    pub(crate) index: u16,
    pub(crate) secret: Scalar,
}

impl NonceShare {
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn round_id(&self) -> &str {
        &self.round_id
    }
}

impl Drop for NonceShare {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl std::fmt::Debug for NonceShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceShare")
            .field("round_id", &self.round_id)
            .field("index", &self.index)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Trusted dealer of the Ed25519 threshold scheme.
///
/// The dealer sees the full group secret during setup and every nonce it
/// deals; it must be trusted by all participants.
pub struct TrustedDealer;

impl TrustedDealer {
    /// Generates a fresh group key split `threshold`-of-`total`.
    pub fn generate(threshold: u16, total: u16) -> Result<(GroupPublicKey, Vec<ThresholdShare>)> {
        let mut secret = Scalar::random(&mut OsRng);
        let result = Self::deal_key(&secret, threshold, total);
        secret.zeroize();
        result
    }

    /// Splits an existing Ed25519 signing key. The group verifying key
    /// equals the key's ordinary Ed25519 public key.
    pub fn split_signing_key(
        signing_key: &SecretKey,
        threshold: u16,
        total: u16,
    ) -> Result<(GroupPublicKey, Vec<ThresholdShare>)> {
        if signing_key.algorithm() != AlgorithmId::Ed25519 {
            return Err(CryptoError::AlgorithmMismatch {
                expected: AlgorithmId::Ed25519.to_string(),
                actual: signing_key.algorithm(),
            });
        }
        let seed = signing_key.expose_secret();
        if seed.len() != 32 {
            return Err(CryptoError::MalformedKeyMaterial {
                algorithm: AlgorithmId::Ed25519,
                what: "signing key",
                expected: 32,
                actual: seed.len(),
            });
        }

        // Ed25519 expands the seed with SHA-512 and clamps the lower half
        let mut expanded = Zeroizing::new([0u8; 64]);
        expanded.copy_from_slice(&Sha512::digest(seed));
        let mut lower = Zeroizing::new([0u8; 32]);
        lower.copy_from_slice(&expanded[..32]);
        let mut secret = Scalar::from_bytes_mod_order(clamp_integer(*lower));

        let result = Self::deal_key(&secret, threshold, total);
        secret.zeroize();
        result
    }

    fn deal_key(secret: &Scalar, threshold: u16, total: u16) -> Result<(GroupPublicKey, Vec<ThresholdShare>)> {
        use tracing::info;

        let max_participants = Config::global().max_participants;
        if total > max_participants {
            return Err(CryptoError::InvalidThresholdParameters { threshold, total });
        }

        let points = split_secret(secret, threshold, total, &mut OsRng)?;
        let group_id = uuid::generate_v4();

        let metadata = points
            .iter()
            .map(|(index, share)| ShareMetadata {
                index: *index,
                algorithm: AlgorithmId::Ed25519,
                verification_share: EdwardsPoint::mul_base(share).compress().to_bytes(),
            })
            .collect();

        let verifying_key = PublicKey::new(
            AlgorithmId::Ed25519,
            EdwardsPoint::mul_base(secret).compress().to_bytes().to_vec(),
        );

        let shares = points
            .into_iter()
            .map(|(index, share)| ThresholdShare::new(index, group_id.clone(), share))
            .collect();

        info!(
            target: "crypto::threshold",
            group_id = %group_id,
            threshold = threshold,
            total = total,
            verifying_key = %verifying_key.fingerprint(),
            "Dealt threshold key shares"
        );

        Ok((
            GroupPublicKey {
                group_id,
                threshold,
                total,
                verifying_key,
                shares: metadata,
            },
            shares,
        ))
    }

    /// Deals a fresh nonce for signing `message` with `group`.
    ///
    /// Each returned `NonceShare` goes to the participant with the same
    /// index and may be used for exactly one signature share.
    pub fn deal_round(group: &GroupPublicKey, message: &[u8]) -> Result<(SigningRound, Vec<NonceShare>)> {
        use tracing::debug;

        let mut nonce = Scalar::random(&mut OsRng);
        let points = split_secret(&nonce, group.threshold(), group.total(), &mut OsRng);
        let nonce_commitment = EdwardsPoint::mul_base(&nonce).compress();
        nonce.zeroize();
        let points = points?;

        let group_point = group.group_point()?;
        let challenge = challenge(&nonce_commitment, &group_point.compress(), message);
        let round_id = uuid::generate_v4();

        let commitments = points
            .iter()
            .map(|(index, share)| RoundCommitment {
                index: *index,
                commitment: EdwardsPoint::mul_base(share).compress().to_bytes(),
            })
            .collect();

        let nonce_shares = points
            .into_iter()
            .map(|(index, secret)| NonceShare {
                round_id: round_id.clone(),
                index,
                secret,
            })
            .collect();

        debug!(
            target: "crypto::threshold",
            group_id = %group.group_id(),
            round_id = %round_id,
            "Dealt signing round"
        );

        Ok((
            SigningRound {
                round_id,
                group_id: group.group_id().to_string(),
                message_digest: message_digest(message),
                nonce_commitment: nonce_commitment.to_bytes(),
                commitments,
                challenge: challenge.to_bytes(),
            },
            nonce_shares,
        ))
    }
}

/// SHA-256 digest binding shares to one message.
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    Sha256::digest(message).into()
}

/// Ed25519 challenge `SHA-512(R || A || M) mod ℓ`.
pub(crate) fn challenge(nonce_commitment: &CompressedEdwardsY, group_key: &CompressedEdwardsY, message: &[u8]) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update(nonce_commitment.as_bytes());
    hasher.update(group_key.as_bytes());
    hasher.update(message);
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    Scalar::from_bytes_mod_order_wide(&wide)
}

pub(crate) fn decompress(bytes: &[u8; 32]) -> Result<EdwardsPoint> {
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or_else(|| CryptoError::MalformedKeyMaterial {
            algorithm: AlgorithmId::Ed25519,
            what: "curve point",
            expected: 32,
            actual: 32,
        })
}
