use pora_gateway::GatewayError;
use pora_store::StoreError;
use pora_types::{BlobId, ShapeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which proof round an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    Tag,
    Challenge,
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Round::Tag => write!(f, "tag"),
            Round::Challenge => write!(f, "challenge"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    /// Malformed dimensions — fatal to the round.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A round was attempted out of order for this blob.
    #[error("blob {blob}: {expected} required, but {found}")]
    MissingPrerequisite {
        blob: BlobId,
        expected: &'static str,
        found: String,
    },

    /// A disclosed public signal disagrees with stored or submitted state.
    /// Reported by slice name and index only — never by field contents.
    /// No state was mutated; re-submission is allowed.
    #[error("public signal mismatch in {slice} at index {index}")]
    ConsistencyMismatch { slice: &'static str, index: usize },

    /// The external verifier rejected a structurally consistent proof —
    /// a higher-severity signal suggesting possible fraud.
    #[error("{round} round proof rejected by the verifier")]
    ProofInvalid { round: Round },

    /// External prover/verifier fault — transient, the identical call is
    /// safe to retry.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The outstanding challenge seed was already consumed; a fresh seed
    /// must be issued before another response is accepted.
    #[error("blob {blob}: challenge seed already consumed")]
    SeedReuseViolation { blob: BlobId },

    /// Defensive guard: a challenge index exceeded the block count. Should
    /// be unreachable given the scheduler's contract.
    #[error("challenge index {index} out of range for {rows} blocks")]
    IndexOutOfRange { index: usize, rows: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}
