//! Tests for primitive adapters and the algorithm registry
//!
//! This test suite covers:
//! - KEM round trips for every registered KEM
//! - Sign/verify and single-byte mutation for every registered signature scheme
//! - Input validation (length, algorithm tag, capability)
//! - Registry registration rules and enumeration

use quantum_toolkit_core::crypto::provider::{SignaturePrimitive, SignatureSizes};
use quantum_toolkit_core::crypto::suites::classic::{Ed25519Signer, X25519Kem};
use quantum_toolkit_core::{
    AdapterFactory, AlgorithmId, AlgorithmKind, AlgorithmRegistry, Capability, CryptoError,
    PublicKey, RegistryBuilder, Signature,
};
use zeroize::Zeroizing;

/// Stand-in Ed25519 provider used to provoke conflicting registrations
struct OtherEd25519;

impl SignaturePrimitive for OtherEd25519 {
    fn sizes() -> SignatureSizes {
        Ed25519Signer::sizes()
    }

    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
        Ed25519Signer::generate_keypair()
    }

    fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
        Ed25519Signer::sign(secret_key, message)
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, String> {
        Ed25519Signer::verify(public_key, message, signature)
    }
}

fn default_registry() -> AlgorithmRegistry {
    RegistryBuilder::with_defaults().build()
}

/// Test that every registered KEM decapsulates to the encapsulated secret
#[test]
fn test_kem_round_trip_for_all_registered() {
    let registry = default_registry();

    for id in registry.supported() {
        if id.capability() != Capability::Kem {
            continue;
        }
        let adapter = registry.resolve(id).unwrap();
        let keypair = adapter.generate_keypair().unwrap();
        let (ciphertext, sent) = adapter.encapsulate(&keypair.public).unwrap();
        let received = adapter.decapsulate(&ciphertext, &keypair.secret).unwrap();

        assert_eq!(sent, received, "KEM round trip failed for {}", id);
        assert_eq!(ciphertext.algorithm(), id);
    }
}

/// Test sign/verify and that a single flipped byte breaks verification
#[test]
fn test_signature_properties_for_all_registered() {
    let registry = default_registry();
    let message = b"Hello, Quantum Toolkit!";

    for id in registry.supported() {
        if id.capability() != Capability::Signature {
            continue;
        }
        let adapter = registry.resolve(id).unwrap();
        let keypair = adapter.generate_keypair().unwrap();
        let signature = adapter.sign(message, &keypair.secret).unwrap();

        assert!(adapter.verify(message, &signature, &keypair.public).unwrap(), "{}", id);

        let mut mutated_message = message.to_vec();
        mutated_message[0] ^= 0x01;
        assert!(
            !adapter.verify(&mutated_message, &signature, &keypair.public).unwrap(),
            "{} accepted a mutated message",
            id
        );

        let mut mutated_signature = signature.as_bytes().to_vec();
        let last = mutated_signature.len() - 1;
        mutated_signature[last] ^= 0x01;
        let mutated_signature = Signature::new(id, mutated_signature);
        assert!(
            matches!(adapter.verify(message, &mutated_signature, &keypair.public), Ok(false)),
            "{} did not reject a mutated signature with false",
            id
        );
    }
}

/// Test that a key of the wrong length is rejected before reaching the provider
#[test]
fn test_adapter_rejects_wrong_length() {
    let registry = default_registry();
    let adapter = registry.resolve(AlgorithmId::Ed25519).unwrap();
    let keypair = adapter.generate_keypair().unwrap();
    let signature = adapter.sign(b"msg", &keypair.secret).unwrap();

    let truncated = PublicKey::new(AlgorithmId::Ed25519, keypair.public.as_bytes()[..16].to_vec());
    assert!(matches!(
        adapter.verify(b"msg", &signature, &truncated),
        Err(CryptoError::MalformedKeyMaterial {
            what: "public key",
            expected: 32,
            actual: 16,
            ..
        })
    ));
}

/// Test that KEM operations on a signature adapter are unsupported
#[test]
fn test_adapter_capability_enforced() {
    let registry = default_registry();
    let signer = registry.resolve(AlgorithmId::Ed25519).unwrap();
    let keypair = signer.generate_keypair().unwrap();

    assert!(matches!(
        signer.encapsulate(&keypair.public),
        Err(CryptoError::UnsupportedOperation { operation: "encapsulate", .. })
    ));
}

/// Test that registering an id twice with different factories conflicts
#[test]
fn test_registry_conflicting_registration() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(AlgorithmId::Ed25519, AdapterFactory::signature::<Ed25519Signer>())
        .unwrap();

    let result = builder.register(AlgorithmId::Ed25519, AdapterFactory::signature::<OtherEd25519>());
    assert!(matches!(result, Err(CryptoError::AlgorithmConflict(AlgorithmId::Ed25519))));

    // Первая регистрация остаётся в силе
    let registry = builder.build();
    let adapter = registry.resolve(AlgorithmId::Ed25519).unwrap();
    let keypair = adapter.generate_keypair().unwrap();
    let signature = adapter.sign(b"still works", &keypair.secret).unwrap();
    assert!(adapter.verify(b"still works", &signature, &keypair.public).unwrap());
}

/// Test that an unregistered id is reported as unknown
#[test]
fn test_registry_unknown_algorithm() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(AlgorithmId::X25519, AdapterFactory::kem::<X25519Kem>())
        .unwrap();
    let registry = builder.build();

    assert!(registry.is_registered(AlgorithmId::X25519));
    assert!(matches!(
        registry.resolve(AlgorithmId::Kyber768),
        Err(CryptoError::UnknownAlgorithm(AlgorithmId::Kyber768))
    ));
}

/// Test classical / post-quantum enumeration of the default registry
#[test]
fn test_registry_enumeration() {
    let registry = default_registry();

    for id in registry.supported_classical() {
        assert_eq!(id.kind(), AlgorithmKind::Classical);
    }
    for id in registry.supported_post_quantum() {
        assert_eq!(id.kind(), AlgorithmKind::PostQuantum);
    }

    #[cfg(feature = "post-quantum")]
    {
        let pq = registry.supported_post_quantum();
        assert!(pq.contains(&AlgorithmId::Kyber768));
        assert!(pq.contains(&AlgorithmId::Dilithium2));
    }
}

/// Test that the global registry is installed once and then frozen
#[test]
fn test_global_registry_is_frozen() {
    let global = AlgorithmRegistry::global();
    assert!(global.is_registered(AlgorithmId::Ed25519));

    assert!(matches!(
        AlgorithmRegistry::install(RegistryBuilder::new()),
        Err(CryptoError::RegistryFrozen)
    ));
    // Установленный реестр не изменился
    assert!(AlgorithmRegistry::global().is_registered(AlgorithmId::Ed25519));
}
