//! Primitive adapters.
//!
//! An [`Adapter`] binds one `AlgorithmId` to one provider. It validates
//! algorithm tags and byte lengths before delegating, so a provider never
//! sees malformed input, and it tags everything it returns with the
//! algorithm that produced it.
//!
//! Adapters hold the provider's functions as plain `fn` pointers: the set
//! of providers is fixed at compile time and dispatch does not need trait
//! objects. `Adapter` is `Copy` and carries no mutable state.

use crate::crypto::algorithm::{AlgorithmId, Capability};
use crate::crypto::keys::{Ciphertext, KeyPair, PublicKey, SecretKey, SharedSecret, Signature};
use crate::crypto::provider::{KemPrimitive, KemSizes, SignaturePrimitive, SignatureSizes};
use crate::error::{CryptoError, Result};
use std::fmt;
use zeroize::Zeroizing;

type KeypairFn = fn() -> std::result::Result<(Vec<u8>, Zeroizing<Vec<u8>>), String>;

#[derive(Clone, Copy)]
struct KemOps {
    sizes: fn() -> KemSizes,
    keypair: KeypairFn,
    encapsulate: fn(&[u8]) -> std::result::Result<(Vec<u8>, Zeroizing<Vec<u8>>), String>,
    decapsulate: fn(&[u8], &[u8]) -> std::result::Result<Zeroizing<Vec<u8>>, String>,
}

#[derive(Clone, Copy)]
struct SignatureOps {
    sizes: fn() -> SignatureSizes,
    keypair: KeypairFn,
    sign: fn(&[u8], &[u8]) -> std::result::Result<Vec<u8>, String>,
    verify: fn(&[u8], &[u8], &[u8]) -> std::result::Result<bool, String>,
}

#[derive(Clone, Copy)]
enum Operations {
    Kem(KemOps),
    Signature(SignatureOps),
}

/// Uniform capability interface over one external primitive.
#[derive(Clone, Copy)]
pub struct Adapter {
    algorithm: AlgorithmId,
    ops: Operations,
}

impl Adapter {
    /// Adapter for a KEM provider.
    pub fn kem<P: KemPrimitive>(algorithm: AlgorithmId) -> Self {
        Self {
            algorithm,
            ops: Operations::Kem(KemOps {
                sizes: P::sizes,
                keypair: P::generate_keypair,
                encapsulate: P::encapsulate,
                decapsulate: P::decapsulate,
            }),
        }
    }

    /// Adapter for a signature provider.
    pub fn signature<P: SignaturePrimitive>(algorithm: AlgorithmId) -> Self {
        Self {
            algorithm,
            ops: Operations::Signature(SignatureOps {
                sizes: P::sizes,
                keypair: P::generate_keypair,
                sign: P::sign,
                verify: P::verify,
            }),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn capability(&self) -> Capability {
        match self.ops {
            Operations::Kem(_) => Capability::Kem,
            Operations::Signature(_) => Capability::Signature,
        }
    }

    pub fn kem_sizes(&self) -> Option<KemSizes> {
        match self.ops {
            Operations::Kem(ops) => Some((ops.sizes)()),
            Operations::Signature(_) => None,
        }
    }

    pub fn signature_sizes(&self) -> Option<SignatureSizes> {
        match self.ops {
            Operations::Signature(ops) => Some((ops.sizes)()),
            Operations::Kem(_) => None,
        }
    }

    /// Generates a fresh key pair for this adapter's algorithm.
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        let (keypair_fn, public_len, secret_len) = match self.ops {
            Operations::Kem(ops) => {
                let sizes = (ops.sizes)();
                (ops.keypair, sizes.public_key, sizes.secret_key)
            }
            Operations::Signature(ops) => {
                let sizes = (ops.sizes)();
                (ops.keypair, sizes.public_key, sizes.secret_key)
            }
        };

        let (public, secret) = keypair_fn().map_err(|reason| self.failure(reason))?;
        if public.len() != public_len || secret.len() != secret_len {
            return Err(self.failure(format!(
                "provider returned {}/{} byte key pair, expected {}/{}",
                public.len(),
                secret.len(),
                public_len,
                secret_len
            )));
        }

        tracing::debug!(
            target: "crypto::adapter",
            algorithm = %self.algorithm,
            "Generated key pair"
        );

        Ok(KeyPair {
            public: PublicKey::new(self.algorithm, public),
            secret: SecretKey::from_bytes(self.algorithm, secret.to_vec()),
        })
    }

    /// Encapsulates a fresh shared secret to `public_key`.
    pub fn encapsulate(&self, public_key: &PublicKey) -> Result<(Ciphertext, SharedSecret)> {
        let ops = self.kem_ops("encapsulate")?;
        let sizes = (ops.sizes)();
        self.check_algorithm(public_key.algorithm())?;
        self.check_len("public key", sizes.public_key, public_key.as_bytes().len())?;

        let (ciphertext, shared) =
            (ops.encapsulate)(public_key.as_bytes()).map_err(|reason| self.failure(reason))?;
        if ciphertext.len() != sizes.ciphertext {
            return Err(self.failure(format!(
                "provider returned {} byte ciphertext, expected {}",
                ciphertext.len(),
                sizes.ciphertext
            )));
        }
        self.check_shared_secret(sizes.shared_secret, shared.len())?;

        Ok((
            Ciphertext::new(self.algorithm, ciphertext),
            SharedSecret::new(shared.to_vec()),
        ))
    }

    /// Recovers the shared secret encapsulated in `ciphertext`.
    pub fn decapsulate(&self, ciphertext: &Ciphertext, secret_key: &SecretKey) -> Result<SharedSecret> {
        let ops = self.kem_ops("decapsulate")?;
        let sizes = (ops.sizes)();
        self.check_algorithm(ciphertext.algorithm())?;
        self.check_algorithm(secret_key.algorithm())?;
        self.check_len("ciphertext", sizes.ciphertext, ciphertext.as_bytes().len())?;
        self.check_len("secret key", sizes.secret_key, secret_key.expose_secret().len())?;

        let shared = (ops.decapsulate)(secret_key.expose_secret(), ciphertext.as_bytes())
            .map_err(|reason| self.failure(reason))?;
        self.check_shared_secret(sizes.shared_secret, shared.len())?;
        Ok(SharedSecret::new(shared.to_vec()))
    }

    /// Produces a detached signature over `message`.
    pub fn sign(&self, message: &[u8], secret_key: &SecretKey) -> Result<Signature> {
        let ops = self.signature_ops("sign")?;
        let sizes = (ops.sizes)();
        self.check_algorithm(secret_key.algorithm())?;
        self.check_len("secret key", sizes.secret_key, secret_key.expose_secret().len())?;

        let signature = (ops.sign)(secret_key.expose_secret(), message)
            .map_err(|reason| self.failure(reason))?;
        if !sizes.accepts_signature_len(signature.len()) {
            return Err(self.failure(format!(
                "provider returned {} byte signature",
                signature.len()
            )));
        }
        Ok(Signature::new(self.algorithm, signature))
    }

    /// Verifies a detached signature. A well-formed signature that does not
    /// match is `Ok(false)`.
    pub fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> Result<bool> {
        let ops = self.signature_ops("verify")?;
        let sizes = (ops.sizes)();
        self.check_algorithm(signature.algorithm())?;
        self.check_algorithm(public_key.algorithm())?;
        self.check_len("public key", sizes.public_key, public_key.as_bytes().len())?;
        if !sizes.accepts_signature_len(signature.as_bytes().len()) {
            return Err(CryptoError::MalformedKeyMaterial {
                algorithm: self.algorithm,
                what: "signature",
                expected: sizes.signature,
                actual: signature.as_bytes().len(),
            });
        }

        (ops.verify)(public_key.as_bytes(), message, signature.as_bytes())
            .map_err(|reason| self.failure(reason))
    }

    fn kem_ops(&self, operation: &'static str) -> Result<KemOps> {
        match self.ops {
            Operations::Kem(ops) => Ok(ops),
            Operations::Signature(_) => Err(CryptoError::UnsupportedOperation {
                algorithm: self.algorithm,
                operation,
            }),
        }
    }

    fn signature_ops(&self, operation: &'static str) -> Result<SignatureOps> {
        match self.ops {
            Operations::Signature(ops) => Ok(ops),
            Operations::Kem(_) => Err(CryptoError::UnsupportedOperation {
                algorithm: self.algorithm,
                operation,
            }),
        }
    }

    fn check_algorithm(&self, actual: AlgorithmId) -> Result<()> {
        if actual != self.algorithm {
            return Err(CryptoError::AlgorithmMismatch {
                expected: self.algorithm.to_string(),
                actual,
            });
        }
        Ok(())
    }

    fn check_len(&self, what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(CryptoError::MalformedKeyMaterial {
                algorithm: self.algorithm,
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    // Короткий секрет от провайдера ослабил бы гибридную комбинацию
    fn check_shared_secret(&self, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(self.failure(format!(
                "provider returned {} byte shared secret, expected {}",
                actual, expected
            )));
        }
        Ok(())
    }

    fn failure(&self, reason: String) -> CryptoError {
        CryptoError::ComponentPrimitiveFailure {
            algorithm: self.algorithm,
            reason,
        }
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("algorithm", &self.algorithm)
            .field("capability", &self.capability())
            .finish()
    }
}

/// Builds an [`Adapter`] for an `AlgorithmId`.
///
/// Two factories are the same when they wrap the same provider type.
#[derive(Clone, Copy)]
pub struct AdapterFactory {
    provider: &'static str,
    capability: Capability,
    build: fn(AlgorithmId) -> Adapter,
}

impl AdapterFactory {
    pub fn kem<P: KemPrimitive>() -> Self {
        Self {
            provider: std::any::type_name::<P>(),
            capability: Capability::Kem,
            build: Adapter::kem::<P>,
        }
    }

    pub fn signature<P: SignaturePrimitive>() -> Self {
        Self {
            provider: std::any::type_name::<P>(),
            capability: Capability::Signature,
            build: Adapter::signature::<P>,
        }
    }

    /// Type name of the wrapped provider.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn build(&self, algorithm: AlgorithmId) -> Adapter {
        (self.build)(algorithm)
    }
}

impl PartialEq for AdapterFactory {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider && self.capability == other.capability
    }
}

impl Eq for AdapterFactory {}

impl fmt::Debug for AdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterFactory")
            .field("provider", &self.provider)
            .field("capability", &self.capability)
            .finish()
    }
}
