//! Post-quantum providers over the `pqcrypto` family of crates.
//!
//! Every parameter set is a zero-sized type generated by one of the two
//! macros below; the macros only translate between raw bytes and the
//! `pqcrypto_traits` wrapper types.

use crate::crypto::provider::{KemPrimitive, KemSizes, SignaturePrimitive, SignatureSizes};
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use zeroize::Zeroizing;

macro_rules! pqcrypto_kem {
    ($(#[$meta:meta])* $name:ident, $krate:ident :: $module:ident) => {
        $(#[$meta])*
        pub struct $name;

        impl KemPrimitive for $name {
            fn sizes() -> KemSizes {
                KemSizes {
                    public_key: $krate::$module::public_key_bytes(),
                    secret_key: $krate::$module::secret_key_bytes(),
                    ciphertext: $krate::$module::ciphertext_bytes(),
                    shared_secret: $krate::$module::shared_secret_bytes(),
                }
            }

            fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
                let (pk, sk) = $krate::$module::keypair();
                Ok((pk.as_bytes().to_vec(), Zeroizing::new(sk.as_bytes().to_vec())))
            }

            fn encapsulate(public_key: &[u8]) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
                let pk = $krate::$module::PublicKey::from_bytes(public_key)
                    .map_err(|e| format!("Invalid public key: {:?}", e))?;
                let (ss, ct) = $krate::$module::encapsulate(&pk);
                Ok((ct.as_bytes().to_vec(), Zeroizing::new(ss.as_bytes().to_vec())))
            }

            fn decapsulate(
                secret_key: &[u8],
                ciphertext: &[u8],
            ) -> Result<Zeroizing<Vec<u8>>, String> {
                let sk = $krate::$module::SecretKey::from_bytes(secret_key)
                    .map_err(|e| format!("Invalid secret key: {:?}", e))?;
                let ct = $krate::$module::Ciphertext::from_bytes(ciphertext)
                    .map_err(|e| format!("Invalid ciphertext: {:?}", e))?;
                let ss = $krate::$module::decapsulate(&ct, &sk);
                Ok(Zeroizing::new(ss.as_bytes().to_vec()))
            }
        }
    };
}

macro_rules! pqcrypto_signature {
    ($(#[$meta:meta])* $name:ident, $krate:ident :: $module:ident, variable = $variable:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl SignaturePrimitive for $name {
            fn sizes() -> SignatureSizes {
                SignatureSizes {
                    public_key: $krate::$module::public_key_bytes(),
                    secret_key: $krate::$module::secret_key_bytes(),
                    signature: $krate::$module::signature_bytes(),
                    variable_signature: $variable,
                }
            }

            fn generate_keypair() -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), String> {
                let (pk, sk) = $krate::$module::keypair();
                Ok((pk.as_bytes().to_vec(), Zeroizing::new(sk.as_bytes().to_vec())))
            }

            fn sign(secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
                let sk = $krate::$module::SecretKey::from_bytes(secret_key)
                    .map_err(|e| format!("Invalid secret key: {:?}", e))?;
                let signature = $krate::$module::detached_sign(message, &sk);
                Ok(signature.as_bytes().to_vec())
            }

            fn verify(
                public_key: &[u8],
                message: &[u8],
                signature: &[u8],
            ) -> Result<bool, String> {
                let pk = $krate::$module::PublicKey::from_bytes(public_key)
                    .map_err(|e| format!("Invalid public key: {:?}", e))?;
                let sig = $krate::$module::DetachedSignature::from_bytes(signature)
                    .map_err(|e| format!("Invalid signature: {:?}", e))?;
                Ok($krate::$module::verify_detached_signature(&sig, message, &pk).is_ok())
            }
        }
    };
}

pqcrypto_kem!(
    /// ML-KEM-512 (Kyber512).
    Kyber512Kem, pqcrypto_kyber::kyber512
);
pqcrypto_kem!(
    /// ML-KEM-768 (Kyber768).
    Kyber768Kem, pqcrypto_kyber::kyber768
);
pqcrypto_kem!(
    /// ML-KEM-1024 (Kyber1024).
    Kyber1024Kem, pqcrypto_kyber::kyber1024
);

pqcrypto_signature!(
    /// ML-DSA-44 (Dilithium2).
    Dilithium2Signer, pqcrypto_dilithium::dilithium2, variable = false
);
pqcrypto_signature!(
    /// ML-DSA-65 (Dilithium3).
    Dilithium3Signer, pqcrypto_dilithium::dilithium3, variable = false
);
pqcrypto_signature!(
    /// ML-DSA-87 (Dilithium5).
    Dilithium5Signer, pqcrypto_dilithium::dilithium5, variable = false
);

#[cfg(feature = "extended-pq")]
pub use extended::*;

#[cfg(feature = "extended-pq")]
mod extended {
    use crate::crypto::provider::{KemPrimitive, KemSizes, SignaturePrimitive, SignatureSizes};
    use pqcrypto_traits::kem::{
        Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
    };
    use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
    use zeroize::Zeroizing;

    pqcrypto_signature!(
        /// Falcon-512; signatures are variable length up to the maximum.
        Falcon512Signer, pqcrypto_falcon::falcon512, variable = true
    );
    pqcrypto_signature!(
        /// Falcon-1024.
        Falcon1024Signer, pqcrypto_falcon::falcon1024, variable = true
    );
    pqcrypto_signature!(
        /// SPHINCS+-SHA2-128f-simple.
        SphincsSha2_128fSigner, pqcrypto_sphincsplus::sphincssha2128fsimple, variable = false
    );
    pqcrypto_kem!(
        /// FrodoKEM-640-SHAKE.
        FrodoKem640ShakeKem, pqcrypto_frodo::frodokem640shake
    );
    pqcrypto_kem!(
        /// FrodoKEM-976-AES.
        FrodoKem976AesKem, pqcrypto_frodo::frodokem976aes
    );
    pqcrypto_kem!(
        /// NTRU-HRSS-701.
        NtruHrss701Kem, pqcrypto_ntru::ntruhrss701
    );
}
