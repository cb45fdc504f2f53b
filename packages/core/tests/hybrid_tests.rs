//! Tests for hybrid composition
//!
//! Signature scenarios run against mock providers registered under the
//! Ed25519 and Dilithium2 ids, so failures can be attributed to the
//! composer rather than to a primitive.

use quantum_toolkit_core::config::Config;
use quantum_toolkit_core::crypto::hybrid::derive_combined_secret;
use quantum_toolkit_core::crypto::provider::{SignaturePrimitive, SignatureSizes};
use quantum_toolkit_core::{
    AdapterFactory, AlgorithmId, AlgorithmRegistry, CombinationRule, CryptoError, HybridComponent,
    HybridComposer, HybridSignature, KeyPair, RegistryBuilder, SharedSecret, Signature,
};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

/// Ed25519-like mock: 32-byte keys, 32-byte "signature" = SHA-256(pk || msg)
struct MockClassicalSigner;

/// Dilithium2-like mock: 32-byte keys, 64-byte "signature" = SHA-512(pk || msg)
struct MockPostQuantumSigner;

fn mock_public(tag: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(tag);
    hasher.update(secret);
    hasher.finalize().to_vec()
}

fn mock_keypair(tag: &[u8]) -> (Vec<u8>, Zeroizing<Vec<u8>>) {
    let mut secret = Zeroizing::new(vec![0u8; 32]);
    OsRng.fill_bytes(&mut secret);
    (mock_public(tag, &secret), secret)
}

impl SignaturePrimitive for MockClassicalSigner {
    fn sizes() -> SignatureSizes {
        SignatureSizes {
            public_key: 32,
            secret_key: 32,
            signature: 32,
            variable_signature: false,
        }
    }

    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        Ok(mock_keypair(b"classical"))
    }

    fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
        let public = mock_public(b"classical", secret_key);
        Ok(Sha256::new().chain_update(&public).chain_update(message).finalize().to_vec())
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, String> {
        let expected = Sha256::new().chain_update(public_key).chain_update(message).finalize();
        Ok(expected.as_slice() == signature)
    }
}

impl SignaturePrimitive for MockPostQuantumSigner {
    fn sizes() -> SignatureSizes {
        SignatureSizes {
            public_key: 32,
            secret_key: 32,
            signature: 64,
            variable_signature: false,
        }
    }

    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        Ok(mock_keypair(b"post-quantum"))
    }

    fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
        let public = mock_public(b"post-quantum", secret_key);
        Ok(Sha512::new().chain_update(&public).chain_update(message).finalize().to_vec())
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, String> {
        let expected = Sha512::new().chain_update(public_key).chain_update(message).finalize();
        Ok(expected.as_slice() == signature)
    }
}

fn mock_registry() -> AlgorithmRegistry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(AlgorithmId::Ed25519, AdapterFactory::signature::<MockClassicalSigner>())
        .unwrap()
        .register(AlgorithmId::Dilithium2, AdapterFactory::signature::<MockPostQuantumSigner>())
        .unwrap();
    builder.build()
}

fn flip_last_byte(signature: &Signature) -> Signature {
    let mut bytes = signature.as_bytes().to_vec();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    Signature::new(signature.algorithm(), bytes)
}

/// Test the hello/world scenario with mocked components
#[test]
fn test_hybrid_sign_verify_hello_world() {
    let registry = mock_registry();
    let composer = HybridComposer::new(&registry);

    let pair = composer
        .hybrid_keypair(AlgorithmId::Ed25519, AlgorithmId::Dilithium2)
        .unwrap();
    let signature = composer.hybrid_sign(b"hello", &pair.secret).unwrap();

    assert!(composer.hybrid_verify(b"hello", &signature, &pair.public).unwrap());
    assert!(!composer.hybrid_verify(b"world", &signature, &pair.public).unwrap());
    assert!(matches!(
        composer.hybrid_verify_detailed(b"world", &signature, &pair.public),
        Err(CryptoError::VerificationFailed)
    ));
}

/// Test that one broken component is a partial failure, not a total one
#[test]
fn test_hybrid_partial_verification_failure() {
    let registry = mock_registry();
    let composer = HybridComposer::new(&registry).with_parallel(false);
    let pair = composer
        .hybrid_keypair(AlgorithmId::Ed25519, AlgorithmId::Dilithium2)
        .unwrap();
    let signature = composer.hybrid_sign(b"hello", &pair.secret).unwrap();

    let broken_pq = HybridSignature::new(
        signature.classical().clone(),
        flip_last_byte(signature.post_quantum()),
    )
    .unwrap();
    assert!(!composer.hybrid_verify(b"hello", &broken_pq, &pair.public).unwrap());
    assert!(matches!(
        composer.hybrid_verify_detailed(b"hello", &broken_pq, &pair.public),
        Err(CryptoError::PartialVerificationFailure {
            failed: HybridComponent::PostQuantum
        })
    ));

    // Нетронутый компонент по-прежнему проверяется сам по себе
    let classical = registry.resolve(AlgorithmId::Ed25519).unwrap();
    assert!(classical
        .verify(b"hello", broken_pq.classical(), pair.public.classical())
        .unwrap());

    let broken_classical = HybridSignature::new(
        flip_last_byte(signature.classical()),
        signature.post_quantum().clone(),
    )
    .unwrap();
    assert!(matches!(
        composer.hybrid_verify_detailed(b"hello", &broken_classical, &pair.public),
        Err(CryptoError::PartialVerificationFailure {
            failed: HybridComponent::Classical
        })
    ));
}

/// Test that framed hybrid signatures survive the wire and reject truncation
#[test]
fn test_hybrid_signature_wire_form() {
    let registry = mock_registry();
    let composer = HybridComposer::new(&registry);
    let pair = composer
        .hybrid_keypair(AlgorithmId::Ed25519, AlgorithmId::Dilithium2)
        .unwrap();
    let signature = composer.hybrid_sign(b"hello", &pair.secret).unwrap();

    let bytes = signature.to_bytes().unwrap();
    assert_eq!(bytes.len(), 4 + 32 + 4 + 64);

    let (classical, post_quantum) = pair.public.algorithms();
    let parsed = HybridSignature::from_bytes(&bytes, classical, post_quantum).unwrap();
    assert!(composer.hybrid_verify(b"hello", &parsed, &pair.public).unwrap());

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(matches!(
        HybridSignature::from_bytes(&trailing, classical, post_quantum),
        Err(CryptoError::LengthMismatch(_))
    ));
}

/// Test that mismatched pairings surface immediately
#[test]
fn test_hybrid_pairing_mismatch() {
    let registry = mock_registry();
    let composer = HybridComposer::new(&registry);

    assert!(matches!(
        composer.hybrid_keypair(AlgorithmId::Dilithium2, AlgorithmId::Ed25519),
        Err(CryptoError::AlgorithmMismatch { .. })
    ));
    assert!(matches!(
        composer.hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Dilithium2),
        Err(CryptoError::AlgorithmMismatch { .. })
    ));

    // Пара из одного компонента
    let adapter = registry.resolve(AlgorithmId::Ed25519).unwrap();
    let classical: KeyPair = adapter.generate_keypair().unwrap();
    assert!(matches!(
        quantum_toolkit_core::HybridKeyPair::pair(Some(classical), None, CombinationRule::default()),
        Err(CryptoError::IncompleteHybridPair(_))
    ));
}

/// Test that the order of component secrets changes the combined secret
#[test]
fn test_combined_secret_order_matters() {
    let label = &Config::global().hybrid_context_label;
    let classical = SharedSecret::new(vec![0x11; 32]);
    let post_quantum = SharedSecret::new(vec![0x22; 32]);

    let forward =
        derive_combined_secret(CombinationRule::HkdfSha256, &classical, &post_quantum, label, 32).unwrap();
    let swapped =
        derive_combined_secret(CombinationRule::HkdfSha256, &post_quantum, &classical, label, 32).unwrap();
    assert_ne!(forward, swapped);
}

/// Test that a composer refuses a configuration that would empty the hybrid secret
#[test]
fn test_composer_rejects_invalid_config() {
    let registry = mock_registry();

    let empty_secret = Config {
        hybrid_secret_length: 0,
        ..Config::default()
    };
    assert!(matches!(
        HybridComposer::with_config(&registry, &empty_secret),
        Err(CryptoError::InvalidConfig(_))
    ));

    let empty_label = Config {
        hybrid_context_label: Vec::new(),
        ..Config::default()
    };
    assert!(matches!(
        HybridComposer::with_config(&registry, &empty_label),
        Err(CryptoError::InvalidConfig(_))
    ));

    // Прямой вызов KDF тоже не выдаёт пустой секрет
    let classical = SharedSecret::new(vec![1u8; 32]);
    let post_quantum = SharedSecret::new(vec![2u8; 32]);
    assert!(matches!(
        derive_combined_secret(CombinationRule::HkdfSha256, &classical, &post_quantum, b"ctx", 0),
        Err(CryptoError::KeyDerivation(_))
    ));
}

#[cfg(feature = "post-quantum")]
mod post_quantum {
    use super::*;
    use quantum_toolkit_core::{AeadAlgorithm, HybridCiphertext, SealedEnvelope};

    /// Test hybrid KEM over real X25519 + ML-KEM-768
    #[test]
    fn test_hybrid_kem_round_trip() {
        let registry = RegistryBuilder::with_defaults().build();
        let composer = HybridComposer::new(&registry);
        let pair = composer
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber768)
            .unwrap();

        let (ciphertext, sent) = composer.hybrid_encapsulate(&pair.public).unwrap();
        assert_eq!(sent.len(), Config::global().hybrid_secret_length);

        let bytes = ciphertext.to_bytes().unwrap();
        let (classical, post_quantum) = pair.public.algorithms();
        let parsed = HybridCiphertext::from_bytes(&bytes, classical, post_quantum).unwrap();

        let received = composer.hybrid_decapsulate(&parsed, &pair.secret).unwrap();
        assert_eq!(sent, received);
    }

    /// Test that an explicit configuration sets the hybrid secret length
    #[test]
    fn test_custom_config_secret_length() {
        let registry = RegistryBuilder::with_defaults().build();
        let config = Config {
            hybrid_secret_length: 64,
            hybrid_context_label: b"custom-context".to_vec(),
            ..Config::default()
        };
        let composer = HybridComposer::with_config(&registry, &config).unwrap();
        let pair = composer
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber768)
            .unwrap();

        let (ciphertext, sent) = composer.hybrid_encapsulate(&pair.public).unwrap();
        assert_eq!(sent.len(), 64);
        assert_eq!(composer.hybrid_decapsulate(&ciphertext, &pair.secret).unwrap(), sent);

        let envelope = composer
            .seal(&pair.public, b"secret payload", b"", AeadAlgorithm::default())
            .unwrap();
        assert_eq!(composer.open(&envelope, &pair.secret, b"").unwrap(), b"secret payload");
    }

    /// Test that both combination rules round trip and disagree with each other
    #[test]
    fn test_hybrid_kem_combination_rules() {
        let registry = RegistryBuilder::with_defaults().build();
        let sha512 = HybridComposer::new(&registry).with_rule(CombinationRule::HkdfSha512);
        let pair = sha512
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber512)
            .unwrap();
        assert_eq!(pair.public.rule(), CombinationRule::HkdfSha512);

        let (ciphertext, sent) = sha512.hybrid_encapsulate(&pair.public).unwrap();
        let received = sha512.hybrid_decapsulate(&ciphertext, &pair.secret).unwrap();
        assert_eq!(sent, received);
    }

    /// Test hybrid signatures over real Ed25519 + ML-DSA-44
    #[test]
    fn test_hybrid_signature_real_primitives() {
        let registry = RegistryBuilder::with_defaults().build();
        let composer = HybridComposer::new(&registry);
        let pair = composer
            .hybrid_keypair(AlgorithmId::Ed25519, AlgorithmId::Dilithium2)
            .unwrap();

        let signature = composer.hybrid_sign(b"hello", &pair.secret).unwrap();
        assert!(composer.hybrid_verify(b"hello", &signature, &pair.public).unwrap());
        assert!(!composer.hybrid_verify(b"world", &signature, &pair.public).unwrap());
    }

    /// Test sealed envelopes with both AEADs, including tamper detection
    #[test]
    fn test_envelope_seal_open() {
        let registry = RegistryBuilder::with_defaults().build();
        let composer = HybridComposer::new(&registry);
        let pair = composer
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber768)
            .unwrap();

        for aead in [AeadAlgorithm::ChaCha20Poly1305, AeadAlgorithm::Aes256Gcm] {
            let envelope = composer
                .seal(&pair.public, b"quantum-safe payload", b"header", aead)
                .unwrap();

            let packed = envelope.to_bytes().unwrap();
            let unpacked = SealedEnvelope::from_bytes(&packed).unwrap();
            assert_eq!(unpacked, envelope);

            let plaintext = composer.open(&unpacked, &pair.secret, b"header").unwrap();
            assert_eq!(plaintext, b"quantum-safe payload");

            assert!(matches!(
                composer.open(&unpacked, &pair.secret, b"other header"),
                Err(CryptoError::Aead(_))
            ));

            let mut tampered = unpacked.clone();
            tampered.ciphertext[0] ^= 0x01;
            assert!(matches!(
                composer.open(&tampered, &pair.secret, b"header"),
                Err(CryptoError::Aead(_))
            ));
        }
    }

    /// Test that an envelope cannot be opened with a key of another pairing
    #[test]
    fn test_envelope_wrong_pairing() {
        let registry = RegistryBuilder::with_defaults().build();
        let composer = HybridComposer::new(&registry);
        let sender_target = composer
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber768)
            .unwrap();
        let other = composer
            .hybrid_keypair(AlgorithmId::X25519, AlgorithmId::Kyber1024)
            .unwrap();

        let envelope = composer
            .seal(&sender_target.public, b"payload", b"", AeadAlgorithm::default())
            .unwrap();
        assert!(matches!(
            composer.open(&envelope, &other.secret, b""),
            Err(CryptoError::AlgorithmMismatch { .. })
        ));
    }
}
