// Доли ключа и частичные подписи

use super::dealer::{message_digest, NonceShare, SigningRound};
use crate::error::{CryptoError, Result};
use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Secret share `s_i` of one participant. Zeroized on drop.
pub struct ThresholdShare {
    index: u16,
    group_id: String,
    secret: Scalar,
}

impl ThresholdShare {
    pub(crate) fn new(index: u16, group_id: String, secret: Scalar) -> Self {
        Self {
            index,
            group_id,
            secret,
        }
    }

    /// Restores a share previously exported with [`ThresholdShare::secret_bytes`].
    pub fn from_secret_bytes(index: u16, group_id: String, bytes: &[u8]) -> Result<Self> {
        let mut array = Zeroizing::new([0u8; 32]);
        if bytes.len() != 32 {
            return Err(CryptoError::Serialization(format!(
                "Threshold share must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        array.copy_from_slice(bytes);
        let secret = Option::<Scalar>::from(Scalar::from_canonical_bytes(*array))
            .ok_or_else(|| CryptoError::Serialization("Non-canonical threshold share".to_string()))?;
        Ok(Self::new(index, group_id, secret))
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Raw share bytes, for handing to a secure key store.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes())
    }

    /// Produces this participant's partial signature `z_i = r_i + c·s_i`.
    ///
    /// `nonce` is consumed; a nonce share is never used twice.
    pub fn sign(&self, round: &SigningRound, nonce: NonceShare, message: &[u8]) -> Result<SignatureShare> {
        if round.group_id != self.group_id {
            return Err(CryptoError::InvalidSignatureShare { index: self.index });
        }
        if nonce.index != self.index || nonce.round_id != round.round_id {
            return Err(CryptoError::InvalidSignatureShare { index: self.index });
        }
        let digest = message_digest(message);
        if digest != round.message_digest {
            return Err(CryptoError::MessageMismatch);
        }

        let challenge = round.challenge_scalar()?;
        let response = nonce.secret + challenge * self.secret;

        Ok(SignatureShare {
            index: self.index,
            round_id: round.round_id.clone(),
            message_digest: digest,
            response: response.to_bytes(),
        })
    }
}

impl Drop for ThresholdShare {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for ThresholdShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdShare")
            .field("index", &self.index)
            .field("group_id", &self.group_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Partial signature of one participant within one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureShare {
    pub index: u16,
    pub round_id: String,
    /// SHA-256 of the message this share signs.
    pub message_digest: [u8; 32],
    /// `z_i` in canonical little-endian encoding.
    pub response: [u8; 32],
}

impl SignatureShare {
    pub(crate) fn response_scalar(&self) -> Result<Scalar> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(self.response))
            .ok_or(CryptoError::InvalidSignatureShare { index: self.index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::threshold::dealer::TrustedDealer;

    #[test]
    fn test_share_bytes_restore() {
        let (_, shares) = TrustedDealer::generate(2, 3).unwrap();
        let bytes = shares[0].secret_bytes();
        let restored =
            ThresholdShare::from_secret_bytes(shares[0].index(), shares[0].group_id().to_string(), &bytes[..]).unwrap();
        assert_eq!(restored.secret_bytes()[..], bytes[..]);
    }

    #[test]
    fn test_sign_rejects_other_message() {
        let (group, shares) = TrustedDealer::generate(2, 3).unwrap();
        let (round, mut nonces) = TrustedDealer::deal_round(&group, b"hello").unwrap();
        let nonce = nonces.remove(0);
        assert!(matches!(
            shares[0].sign(&round, nonce, b"world"),
            Err(CryptoError::MessageMismatch)
        ));
    }

    #[test]
    fn test_sign_rejects_foreign_nonce() {
        let (group, shares) = TrustedDealer::generate(2, 3).unwrap();
        let (round, mut nonces) = TrustedDealer::deal_round(&group, b"hello").unwrap();
        let nonce_of_second = nonces.remove(1);
        assert!(matches!(
            shares[0].sign(&round, nonce_of_second, b"hello"),
            Err(CryptoError::InvalidSignatureShare { index: 1 })
        ));
    }
}
