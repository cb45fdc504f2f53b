// Сессия сбора частичных подписей
//
// Collecting → Aggregating → Complete
// Collecting → Aborted (таймаут или cancel)
//
// Мьютекс держится только на время вставки доли / проверки порога /
// смены состояния. Проверка долей и комбинирование идут без блокировки.

use super::dealer::{GroupPublicKey, SigningRound};
use super::field::interpolate_at_zero;
use super::share::SignatureShare;
use crate::config::Config;
use crate::crypto::adapter::Adapter;
use crate::crypto::algorithm::AlgorithmId;
use crate::crypto::keys::Signature;
use crate::crypto::registry::AlgorithmRegistry;
use crate::error::{CryptoError, Result};
use crate::utils::uuid;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Lifecycle state of a [`SigningSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Collecting,
    Aggregating,
    Complete,
    Aborted,
}

struct SessionInner {
    state: SessionState,
    shares: BTreeMap<u16, Scalar>,
    signature: Option<Signature>,
}

/// Coordinator of one threshold signing round.
///
/// Shared between submitters (`&self` everywhere); wrap in an `Arc` to hand
/// it to several threads.
pub struct SigningSession {
    session_id: String,
    group: GroupPublicKey,
    round: SigningRound,
    message: Vec<u8>,
    verifier: Adapter,
    deadline: Instant,
    inner: Mutex<SessionInner>,
}

impl SigningSession {
    /// Opens a session for `round`, verifying the aggregate with the
    /// registry's Ed25519 adapter. Timeout comes from [`Config::global`].
    pub fn new(
        registry: &AlgorithmRegistry,
        group: GroupPublicKey,
        round: SigningRound,
        message: &[u8],
    ) -> Result<Self> {
        let timeout = Duration::from_secs(Config::global().threshold_session_timeout_secs);
        Self::with_timeout(registry, group, round, message, timeout)
    }

    pub fn with_timeout(
        registry: &AlgorithmRegistry,
        group: GroupPublicKey,
        round: SigningRound,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Self> {
        use tracing::debug;

        if round.group_id != group.group_id() {
            return Err(CryptoError::InvalidThresholdParameters {
                threshold: group.threshold(),
                total: group.total(),
            });
        }
        if super::dealer::message_digest(message) != round.message_digest {
            return Err(CryptoError::MessageMismatch);
        }

        let deadline = Instant::now().checked_add(timeout).ok_or_else(|| {
            CryptoError::InvalidConfig(format!("session timeout {:?} is out of range", timeout))
        })?;
        let verifier = registry.resolve(AlgorithmId::Ed25519)?;
        let session_id = uuid::generate_v4();

        debug!(
            target: "crypto::threshold",
            session_id = %session_id,
            round_id = %round.round_id,
            threshold = group.threshold(),
            total = group.total(),
            timeout_secs = timeout.as_secs(),
            "Opened signing session"
        );

        Ok(Self {
            session_id,
            group,
            round,
            message: message.to_vec(),
            verifier,
            deadline,
            inner: Mutex::new(SessionInner {
                state: SessionState::Collecting,
                shares: BTreeMap::new(),
                signature: None,
            }),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn group(&self) -> &GroupPublicKey {
        &self.group
    }

    /// Current state; an expired collecting session reports `Aborted`.
    pub fn state(&self) -> SessionState {
        let mut inner = self.lock();
        self.expire_if_due(&mut inner);
        inner.state
    }

    /// Number of distinct participants with an accepted share.
    pub fn collected(&self) -> usize {
        self.lock().shares.len()
    }

    /// Accepts one participant's share; returns the number of distinct
    /// shares collected so far. A second share from the same participant
    /// replaces the first.
    pub fn submit(&self, share: SignatureShare) -> Result<usize> {
        use tracing::{debug, warn};

        self.ensure_collecting()?;

        if !self.group.contains(share.index) {
            return Err(CryptoError::UnknownParticipant {
                index: share.index,
                total: self.group.total(),
            });
        }
        if share.message_digest != self.round.message_digest {
            return Err(CryptoError::MessageMismatch);
        }
        if share.round_id != self.round.round_id {
            return Err(CryptoError::InvalidSignatureShare { index: share.index });
        }

        // z_i·B == R_i + c·Y_i, без блокировки
        let response = match self.verify_share(&share) {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    target: "crypto::threshold",
                    session_id = %self.session_id,
                    participant = share.index,
                    "Rejected signature share"
                );
                return Err(e);
            }
        };

        let mut inner = self.lock();
        self.expire_if_due(&mut inner);
        Self::check_open(inner.state)?;
        inner.shares.insert(share.index, response);
        let collected = inner.shares.len();
        drop(inner);

        debug!(
            target: "crypto::threshold",
            session_id = %self.session_id,
            participant = share.index,
            collected = collected,
            threshold = self.group.threshold(),
            "Accepted signature share"
        );
        Ok(collected)
    }

    /// Combines the collected shares into an ordinary Ed25519 signature.
    ///
    /// Once complete, later calls return the same signature.
    pub fn aggregate(&self) -> Result<Signature> {
        use tracing::{info, warn};

        let points: Vec<(u16, Scalar)> = {
            let mut inner = self.lock();
            self.expire_if_due(&mut inner);
            match inner.state {
                SessionState::Complete => {
                    if let Some(signature) = &inner.signature {
                        return Ok(signature.clone());
                    }
                    return Err(CryptoError::SessionClosed("complete"));
                }
                SessionState::Aggregating => return Err(CryptoError::AggregationInProgress),
                SessionState::Aborted => return Err(CryptoError::SessionClosed("aborted")),
                SessionState::Collecting => {}
            }

            let threshold = self.group.threshold();
            if inner.shares.len() < threshold as usize {
                return Err(CryptoError::ThresholdNotMet {
                    collected: inner.shares.len(),
                    threshold,
                });
            }

            inner.state = SessionState::Aggregating;
            inner
                .shares
                .iter()
                .take(threshold as usize)
                .map(|(index, response)| (*index, *response))
                .collect()
        };

        let result = self.combine(&points);

        let mut inner = self.lock();
        match result {
            Ok(signature) => {
                inner.state = SessionState::Complete;
                inner.signature = Some(signature.clone());
                drop(inner);

                info!(
                    target: "crypto::threshold",
                    session_id = %self.session_id,
                    participants = ?points.iter().map(|(index, _)| *index).collect::<Vec<_>>(),
                    "Aggregated threshold signature"
                );
                Ok(signature)
            }
            Err(e) => {
                inner.state = SessionState::Aborted;
                drop(inner);

                warn!(
                    target: "crypto::threshold",
                    session_id = %self.session_id,
                    error = %e,
                    "Aggregation failed, session aborted"
                );
                Err(e)
            }
        }
    }

    /// Aborts a collecting session. Idempotent on an aborted session.
    pub fn cancel(&self) -> Result<()> {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Collecting | SessionState::Aborted => {
                inner.state = SessionState::Aborted;
                drop(inner);
                tracing::debug!(
                    target: "crypto::threshold",
                    session_id = %self.session_id,
                    "Signing session cancelled"
                );
                Ok(())
            }
            SessionState::Aggregating => Err(CryptoError::AggregationInProgress),
            SessionState::Complete => Err(CryptoError::SessionClosed("complete")),
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // Состояние остаётся согласованным даже после паники другого потока
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn expire_if_due(&self, inner: &mut SessionInner) {
        if inner.state == SessionState::Collecting && Instant::now() >= self.deadline {
            inner.state = SessionState::Aborted;
            tracing::warn!(
                target: "crypto::threshold",
                session_id = %self.session_id,
                collected = inner.shares.len(),
                "Signing session timed out"
            );
        }
    }

    fn ensure_collecting(&self) -> Result<()> {
        let mut inner = self.lock();
        self.expire_if_due(&mut inner);
        Self::check_open(inner.state)
    }

    fn check_open(state: SessionState) -> Result<()> {
        match state {
            SessionState::Collecting => Ok(()),
            SessionState::Aggregating => Err(CryptoError::SessionClosed("aggregating")),
            SessionState::Complete => Err(CryptoError::SessionClosed("complete")),
            SessionState::Aborted => Err(CryptoError::SessionClosed("aborted")),
        }
    }

    fn verify_share(&self, share: &SignatureShare) -> Result<Scalar> {
        let response = share.response_scalar()?;
        let challenge = self.round.challenge_scalar()?;
        let commitment = self.round.commitment_point(share.index)?;
        let verification_share = self.group.verification_point(share.index)?;

        let lhs = EdwardsPoint::mul_base(&response);
        let rhs = commitment + challenge * verification_share;
        if lhs != rhs {
            return Err(CryptoError::InvalidSignatureShare { index: share.index });
        }
        Ok(response)
    }

    fn combine(&self, points: &[(u16, Scalar)]) -> Result<Signature> {
        let response = interpolate_at_zero(points);

        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(&self.round.nonce_commitment);
        bytes.extend_from_slice(response.as_bytes());
        let signature = Signature::new(AlgorithmId::Ed25519, bytes);

        if !self
            .verifier
            .verify(&self.message, &signature, self.group.verifying_key())?
        {
            return Err(CryptoError::VerificationFailed);
        }
        Ok(signature)
    }
}

impl std::fmt::Debug for SigningSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSession")
            .field("session_id", &self.session_id)
            .field("round_id", &self.round.round_id)
            .field("state", &self.state())
            .finish()
    }
}
