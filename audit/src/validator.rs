//! Consistency validation — binding disclosed public signals to state.
//!
//! Both rounds run the cheap structural comparison first; the expensive
//! external proof verification is only reached when every disclosed signal
//! already agrees with stored and submitted state. A mismatch here is
//! `ConsistencyMismatch`, never `ProofInvalid` — the Proof Gateway must not
//! be invoked for a round that structural checks already disproved.
//!
//! Wire contract (fixed by the companion circuits):
//! - Tag round signals, length 2R+1: `[0,R) = sigma`, `[R,2R) = hashData`,
//!   `[2R] = hashAlpha`.
//! - Challenge round signals, length ≥ S+2: `[0,S) = Miu`, `[S] = Tau`,
//!   `[S+1] = hashAlpha` (offsets 10 and 11 in the reference instance).

use crate::error::AuditError;
use pora_types::{AuditParams, FieldElement, ShapeError};

pub struct ConsistencyValidator {
    params: AuditParams,
}

impl ConsistencyValidator {
    pub fn new(params: AuditParams) -> Self {
        Self { params }
    }

    /// Tag round: every signal slice must equal the submitted metadata and
    /// commitments, and the trailing signal must equal the certificate's
    /// stored alpha digest.
    pub fn check_tag_round(
        &self,
        signals: &[FieldElement],
        sigma: &[FieldElement],
        hash_data: &[FieldElement],
        stored_hash_alpha: FieldElement,
    ) -> Result<(), AuditError> {
        let rows = self.params.rows;

        if signals.len() != self.params.tag_signal_len() {
            return Err(
                ShapeError::new("tag public signals", self.params.tag_signal_len(), signals.len())
                    .into(),
            );
        }
        if sigma.len() != rows {
            return Err(ShapeError::new("metadata sigma", rows, sigma.len()).into());
        }
        if hash_data.len() != rows {
            return Err(ShapeError::new("data commitments", rows, hash_data.len()).into());
        }

        for (index, (signal, expected)) in signals[..rows].iter().zip(sigma).enumerate() {
            if signal != expected {
                return Err(AuditError::ConsistencyMismatch {
                    slice: "sigma",
                    index,
                });
            }
        }

        for (index, (signal, expected)) in signals[rows..2 * rows].iter().zip(hash_data).enumerate()
        {
            if signal != expected {
                return Err(AuditError::ConsistencyMismatch {
                    slice: "hashData",
                    index,
                });
            }
        }

        if signals[2 * rows] != stored_hash_alpha {
            return Err(AuditError::ConsistencyMismatch {
                slice: "hashAlpha",
                index: 2 * rows,
            });
        }

        tracing::debug!(rows, "tag round signals structurally consistent");
        Ok(())
    }

    /// Challenge round: the Tau signal must equal the auditor's own
    /// recomputation and the alpha digest signal must equal the stored
    /// certificate digest.
    pub fn check_challenge_round(
        &self,
        signals: &[FieldElement],
        expected_tau: FieldElement,
        stored_hash_alpha: FieldElement,
    ) -> Result<(), AuditError> {
        let min_len = self.params.min_challenge_signal_len();
        if signals.len() < min_len {
            return Err(
                ShapeError::new("challenge public signals", min_len, signals.len()).into(),
            );
        }

        let tau_index = self.params.tau_signal_index();
        if signals[tau_index] != expected_tau {
            return Err(AuditError::ConsistencyMismatch {
                slice: "tau",
                index: tau_index,
            });
        }

        let alpha_index = self.params.alpha_signal_index();
        if signals[alpha_index] != stored_hash_alpha {
            return Err(AuditError::ConsistencyMismatch {
                slice: "hashAlpha",
                index: alpha_index,
            });
        }

        tracing::debug!("challenge round signals structurally consistent");
        Ok(())
    }
}
