// Комбинирование компонентных секретов
//
// IKM = classical || post_quantum || context_label, info = метка правила.
// Порядок фиксирован: классический секрет всегда первый.

use super::types::{CombinationRule, HybridSharedSecret};
use crate::crypto::keys::SharedSecret;
use crate::error::{CryptoError, Result};
use hkdf::Hkdf;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

const ENVELOPE_KEY_INFO: &[u8] = b"qtk-hybrid-envelope/key";

/// Derives the hybrid secret from both component secrets.
pub fn derive_combined_secret(
    rule: CombinationRule,
    classical: &SharedSecret,
    post_quantum: &SharedSecret,
    context_label: &[u8],
    output_len: usize,
) -> Result<HybridSharedSecret> {
    if output_len == 0 {
        return Err(CryptoError::KeyDerivation(
            "hybrid secret length must be non-zero".to_string(),
        ));
    }

    let mut ikm = Zeroizing::new(Vec::with_capacity(
        classical.len() + post_quantum.len() + context_label.len(),
    ));
    ikm.extend_from_slice(classical.as_bytes());
    ikm.extend_from_slice(post_quantum.as_bytes());
    ikm.extend_from_slice(context_label);

    let mut okm = Zeroizing::new(vec![0u8; output_len]);
    match rule {
        CombinationRule::HkdfSha256 => {
            Hkdf::<Sha256>::new(None, &ikm).expand(rule.label(), &mut okm)?;
        }
        CombinationRule::HkdfSha512 => {
            Hkdf::<Sha512>::new(None, &ikm).expand(rule.label(), &mut okm)?;
        }
    }

    Ok(HybridSharedSecret::new(okm))
}

/// 32-байтный AEAD ключ конверта из гибридного секрета
pub(crate) fn derive_envelope_key(secret: &HybridSharedSecret) -> Result<Zeroizing<[u8; 32]>> {
    let hkdf = Hkdf::<Sha256>::new(None, secret.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    hkdf.expand(ENVELOPE_KEY_INFO, &mut key[..])?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(byte: u8) -> SharedSecret {
        SharedSecret::new(vec![byte; 32])
    }

    #[test]
    fn test_deterministic() {
        let a = derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"ctx", 32).unwrap();
        let b = derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"ctx", 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_component_order_matters() {
        let forward = derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"ctx", 32).unwrap();
        let reversed = derive_combined_secret(CombinationRule::HkdfSha256, &secret(2), &secret(1), b"ctx", 32).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_rule_and_label_separate_outputs() {
        let base = derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"ctx", 32).unwrap();
        let sha512 = derive_combined_secret(CombinationRule::HkdfSha512, &secret(1), &secret(2), b"ctx", 32).unwrap();
        let relabeled = derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"other", 32).unwrap();
        assert_ne!(base, sha512);
        assert_ne!(base, relabeled);
    }

    #[test]
    fn test_empty_output_is_rejected() {
        assert!(matches!(
            derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"ctx", 0),
            Err(CryptoError::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_oversized_output_is_rejected() {
        // HKDF-SHA256 caps output at 255 * 32 bytes
        assert!(derive_combined_secret(CombinationRule::HkdfSha256, &secret(1), &secret(2), b"", 255 * 32 + 1).is_err());
    }
}
