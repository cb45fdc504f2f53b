//! Defines the primitive traits for crypto-agility.
//!
//! Each external primitive (one parameter set of one scheme) is implemented
//! by a zero-sized provider type. Providers work on raw byte slices and
//! report failures as plain strings; [`crate::crypto::adapter::Adapter`]
//! performs length validation before calling in and attaches the
//! `AlgorithmId` to errors coming out.

use zeroize::Zeroizing;

/// Fixed byte lengths of a KEM parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemSizes {
    pub public_key: usize,
    pub secret_key: usize,
    pub ciphertext: usize,
    pub shared_secret: usize,
}

/// Byte lengths of a signature parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSizes {
    pub public_key: usize,
    pub secret_key: usize,
    /// Exact signature length, or the maximum when `variable_signature` is set.
    pub signature: usize,
    /// Falcon signatures are compressed and shorter than the maximum.
    pub variable_signature: bool,
}

impl SignatureSizes {
    pub fn accepts_signature_len(&self, len: usize) -> bool {
        if self.variable_signature {
            len > 0 && len <= self.signature
        } else {
            len == self.signature
        }
    }
}

/// Key encapsulation primitive.
pub trait KemPrimitive: Send + Sync + 'static {
    fn sizes() -> KemSizes;

    /// Generates a new key pair. Returns `(public_key, secret_key)`.
    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String>;

    /// Encapsulates a fresh shared secret to `public_key`.
    /// Returns `(ciphertext, shared_secret)`.
    fn encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String>;

    /// Recovers the shared secret from `ciphertext`.
    fn decapsulate(secret_key: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, String>;
}

/// Detached signature primitive.
pub trait SignaturePrimitive: Send + Sync + 'static {
    fn sizes() -> SignatureSizes;

    /// Generates a new key pair. Returns `(public_key, secret_key)`.
    fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String>;

    /// Signs `message` with `secret_key`.
    fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String>;

    /// Verifies a detached signature.
    ///
    /// A well-formed but wrong signature is `Ok(false)`; `Err` is reserved
    /// for inputs the primitive cannot even parse.
    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, String>;
}
