//! Per-blob audit state tracking.

use crate::challenge::ChallengeSeed;
use pora_store::StoreError;
use pora_types::{BlobId, FieldElement, Timestamp};
use serde::{Deserialize, Serialize};

/// Where a blob stands in the audit lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditPhase {
    /// Certificate accepted; waiting for the tag round.
    Onboarded,
    /// Tags and commitments proven and persisted.
    TagCommitted,
    /// A challenge seed is outstanding.
    ChallengeIssued,
    /// The latest possession response verified; eligible for re-audit.
    ChallengeVerified,
}

impl std::fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditPhase::Onboarded => write!(f, "onboarded"),
            AuditPhase::TagCommitted => write!(f, "tag-committed"),
            AuditPhase::ChallengeIssued => write!(f, "challenge-issued"),
            AuditPhase::ChallengeVerified => write!(f, "challenge-verified"),
        }
    }
}

/// An issued challenge seed. `consumed` flips on the first response
/// submission and survives a failed round: the same seed never backs two
/// Tau recomputations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedSeed {
    pub seed: ChallengeSeed,
    pub issued_at: Timestamp,
    pub consumed: bool,
}

/// The persisted audit record for one blob. Seed state is isolated per
/// blob — nothing here is process-global.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    pub blob_id: BlobId,
    pub phase: AuditPhase,
    /// Commitment to the secret exponent, from the provider certificate.
    pub hash_alpha: FieldElement,
    /// Per-block tags; write-once at the tag round, empty before it.
    pub sigma: Vec<FieldElement>,
    /// Per-block data commitments; write-once at the tag round.
    pub hash_data: Vec<FieldElement>,
    /// The currently outstanding seed, if any.
    pub outstanding_seed: Option<IssuedSeed>,
    /// Tau of the last verified challenge round.
    pub last_tau: Option<FieldElement>,
}

impl BlobRecord {
    /// Fresh record at onboarding. Re-onboarding the same blob id resets
    /// every field — blob replacement is never an in-place mutation.
    pub fn onboarded(blob_id: BlobId, hash_alpha: FieldElement) -> Self {
        Self {
            blob_id,
            phase: AuditPhase::Onboarded,
            hash_alpha,
            sigma: Vec::new(),
            hash_data: Vec::new(),
            outstanding_seed: None,
            last_tau: None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(self).map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Corruption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_bytes() {
        let mut record = BlobRecord::onboarded(BlobId::new("blob-1"), FieldElement::from_u64(7));
        record.phase = AuditPhase::ChallengeIssued;
        record.sigma = vec![FieldElement::from_u64(55), FieldElement::from_u64(115)];
        record.outstanding_seed = Some(IssuedSeed {
            seed: ChallengeSeed::new(1, 2),
            issued_at: Timestamp::new(1000),
            consumed: false,
        });

        let bytes = record.to_bytes().unwrap();
        assert_eq!(BlobRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn corrupt_bytes_surface_as_store_error() {
        assert!(matches!(
            BlobRecord::from_bytes(b"not a record"),
            Err(StoreError::Corruption(_))
        ));
    }

    #[test]
    fn onboarding_resets_everything() {
        let record = BlobRecord::onboarded(BlobId::new("b"), FieldElement::from_u64(1));
        assert_eq!(record.phase, AuditPhase::Onboarded);
        assert!(record.sigma.is_empty());
        assert!(record.hash_data.is_empty());
        assert!(record.outstanding_seed.is_none());
        assert!(record.last_tau.is_none());
    }
}
