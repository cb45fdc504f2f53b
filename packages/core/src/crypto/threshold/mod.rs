//! Пороговые подписи Ed25519 (T-of-N, доверенный дилер)
//!
//! ```text
//!  TrustedDealer::generate / split_signing_key
//!        │  GroupPublicKey + ThresholdShare × N
//!        ▼
//!  TrustedDealer::deal_round(message)
//!        │  SigningRound + NonceShare × N
//!        ▼
//!  ThresholdShare::sign ──► SignatureShare ──► SigningSession::submit
//!                                                   │ ≥ T shares
//!                                                   ▼
//!                                         SigningSession::aggregate
//!                                                   │
//!                                                   ▼
//!                                     ordinary Ed25519 signature (R || z)
//! ```
//!
//! The aggregate verifies with any Ed25519 verifier under
//! [`GroupPublicKey::verifying_key`].

pub mod dealer;
pub mod field;
pub mod session;
pub mod share;

pub use dealer::{
    message_digest, GroupPublicKey, NonceShare, RoundCommitment, ShareMetadata, SigningRound,
    TrustedDealer,
};
pub use session::{SessionState, SigningSession};
pub use share::{SignatureShare, ThresholdShare};
