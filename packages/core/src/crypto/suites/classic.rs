use crate::crypto::provider::{KemPrimitive, KemSizes, SignaturePrimitive, SignatureSizes};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// X25519 used as an ephemeral-static DH KEM.
///
/// The ciphertext is the sender's ephemeral public key; the shared secret is
/// the raw DH output.
pub struct X25519Kem;

/// Ed25519 signatures.
pub struct Ed25519Signer;

fn array32(bytes: &[u8], what: &str) -> Result<[u8; 32], String> {
    bytes
        .try_into()
        .map_err(|_| format!("Invalid {} length", what))
}

impl KemPrimitive for X25519Kem {
    fn sizes() -> KemSizes {
        KemSizes {
            public_key: 32,
            secret_key: 32,
            ciphertext: 32,
            shared_secret: 32,
        }
    }

    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        let private_key = StaticSecret::random_from_rng(OsRng);
        let public_key = X25519PublicKey::from(&private_key);
        Ok((
            public_key.to_bytes().to_vec(),
            Zeroizing::new(private_key.to_bytes().to_vec()),
        ))
    }

    fn encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        let recipient_public_key = X25519PublicKey::from(array32(public_key, "KEM public key")?);
        let ephemeral_secret = EphemeralSecret::random_from_rng(OsRng);

        // Get ephemeral public key before consuming ephemeral_secret
        let ephemeral_public_key = X25519PublicKey::from(&ephemeral_secret);
        let shared_secret = ephemeral_secret.diffie_hellman(&recipient_public_key);

        // Low-order recipient key gives an all-zero output
        if !shared_secret.was_contributory() {
            return Err("Non-contributory X25519 public key".to_string());
        }

        Ok((
            ephemeral_public_key.to_bytes().to_vec(),
            Zeroizing::new(shared_secret.to_bytes().to_vec()),
        ))
    }

    fn decapsulate(secret_key: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, String> {
        let secret_bytes = Zeroizing::new(array32(secret_key, "KEM private key")?);
        let static_secret = StaticSecret::from(*secret_bytes);

        let ephemeral_public_key = X25519PublicKey::from(array32(ciphertext, "KEM ciphertext")?);
        let shared_secret = static_secret.diffie_hellman(&ephemeral_public_key);
        if !shared_secret.was_contributory() {
            return Err("Non-contributory X25519 ciphertext".to_string());
        }
        Ok(Zeroizing::new(shared_secret.to_bytes().to_vec()))
    }
}

impl SignaturePrimitive for Ed25519Signer {
    fn sizes() -> SignatureSizes {
        SignatureSizes {
            public_key: 32,
            secret_key: 32,
            signature: 64,
            variable_signature: false,
        }
    }

    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Ok((
            verifying_key.to_bytes().to_vec(),
            Zeroizing::new(signing_key.to_bytes().to_vec()),
        ))
    }

    fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
        let bytes = Zeroizing::new(array32(secret_key, "signing key")?);
        let signing_key = SigningKey::from_bytes(&bytes);
        let signature = signing_key.sign(message);
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, String> {
        let vk_bytes = array32(public_key, "verifying key")?;
        let verifying_key = VerifyingKey::from_bytes(&vk_bytes)
            .map_err(|e| format!("Invalid verifying key: {}", e))?;

        let sig_bytes: [u8; 64] = signature
            .try_into()
            .map_err(|_| "Invalid signature length".to_string())?;
        let signature_obj = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(message, &signature_obj).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x25519_kem_round_trip() {
        let (public_key, secret_key) = X25519Kem::generate_keypair().unwrap();
        let (ciphertext, sender_secret) = X25519Kem::encapsulate(&public_key).unwrap();
        let receiver_secret = X25519Kem::decapsulate(&secret_key, &ciphertext).unwrap();
        assert_eq!(*sender_secret, *receiver_secret);
        assert_eq!(ciphertext.len(), 32);
    }

    #[test]
    fn test_x25519_rejects_low_order_point() {
        // Identity point encodes as all zeros
        assert!(X25519Kem::encapsulate(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let (public_key, secret_key) = Ed25519Signer::generate_keypair().unwrap();
        let signature = Ed25519Signer::sign(&secret_key, b"message").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(Ed25519Signer::verify(&public_key, b"message", &signature).unwrap());
        assert!(!Ed25519Signer::verify(&public_key, b"other", &signature).unwrap());
    }
}
