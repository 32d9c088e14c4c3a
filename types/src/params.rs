//! Audit protocol parameters.
//!
//! The instance geometry (R, S, C, CoeffMax) is fixed by the companion
//! circuit pair; changing it requires recompiled circuits and a full
//! re-onboarding of every blob.

use serde::{Deserialize, Serialize};

/// Parameters shared by provider and auditor for one deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditParams {
    /// R — number of blocks in a blob.
    pub rows: usize,

    /// S — number of sectors per block.
    pub sectors: usize,

    /// C — number of blocks challenged per audit round.
    pub challenge_size: usize,

    /// Exclusive upper bound on challenge coefficients.
    pub coeff_domain: u64,

    /// Deadline in seconds for a single proof-gateway call. Exceeding it is
    /// a fatal failure of the round; the identical call may be retried.
    pub gateway_deadline_secs: u64,
}

impl AuditParams {
    /// The reference instance: 50×10 blobs, 5 challenged blocks,
    /// coefficients below 100.
    pub fn reference() -> Self {
        Self {
            rows: 50,
            sectors: 10,
            challenge_size: 5,
            coeff_domain: 100,
            gateway_deadline_secs: 30,
        }
    }

    /// Length of the tag-round public signal vector:
    /// `[0,R) = sigma`, `[R,2R) = hashData`, `[2R] = hashAlpha`.
    pub fn tag_signal_len(&self) -> usize {
        2 * self.rows + 1
    }

    /// Offset of Tau in the challenge-round signal vector. Fixed by the
    /// companion circuit; S (= 10) in the reference instance.
    pub fn tau_signal_index(&self) -> usize {
        self.sectors
    }

    /// Offset of hashAlpha in the challenge-round signal vector. Fixed by
    /// the companion circuit; S + 1 (= 11) in the reference instance.
    pub fn alpha_signal_index(&self) -> usize {
        self.sectors + 1
    }

    /// Minimum length of the challenge-round public signal vector:
    /// `[0,S) = Miu`, `[S] = Tau`, `[S+1] = hashAlpha`.
    pub fn min_challenge_signal_len(&self) -> usize {
        self.sectors + 2
    }
}
