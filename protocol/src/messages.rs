//! Request/response types — the wire contract between provider and auditor.

use pora_audit::{AuditError, Metadata};
use pora_gateway::{GatewayError, ProofBytes};
use pora_types::{BlobId, FieldElement};
use serde::{Deserialize, Serialize};

/// Provider certificate delivering the alpha commitment. The remaining
/// fields belong to the external authentication layer and are carried
/// opaquely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "hashAlpha")]
    pub hash_alpha: FieldElement,
    pub issuer: String,
    pub signature: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadCertificate {
    pub blob_id: BlobId,
    pub certificate: Certificate,
}

/// Tag round upload: metadata, commitments, and the proof binding them.
/// Signal layout: `[0,R) = sigma`, `[R,2R) = hashData`, `[2R] = hashAlpha`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadTagRound {
    pub blob_id: BlobId,
    #[serde(rename = "metaData")]
    pub meta_data: Metadata,
    #[serde(rename = "dataHash")]
    pub data_hash: Vec<FieldElement>,
    #[serde(rename = "alphaHash")]
    pub alpha_hash: FieldElement,
    #[serde(rename = "tagProof")]
    pub tag_proof: ProofBytes,
    #[serde(rename = "tagPublicSignals")]
    pub tag_public_signals: Vec<FieldElement>,
}

/// Challenge seed handed to the provider: `[seed1, seed2]`, single-use.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ChallengeSeedReply {
    pub seed: [u64; 2],
}

/// Challenge round upload. Signal layout: `[0,S) = Miu`, `[S] = Tau`,
/// `[S+1] = hashAlpha` (offsets 10 and 11 in the reference instance).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadChallengeRound {
    pub blob_id: BlobId,
    #[serde(rename = "metaData")]
    pub meta_data: Metadata,
    #[serde(rename = "respProof")]
    pub resp_proof: ProofBytes,
    #[serde(rename = "respPublicSignals")]
    pub resp_public_signals: Vec<FieldElement>,
}

/// Wire-level rejection categories, mirroring the audit error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectKind {
    Shape,
    MissingPrerequisite,
    ConsistencyMismatch,
    ProofInvalid,
    GatewayTimeout,
    GatewayError,
    SeedReuse,
    Internal,
}

/// A rejected round. `detail` names the failing slice and index, never raw
/// field-element contents.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reject {
    pub kind: RejectKind,
    pub detail: String,
}

impl Reject {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            kind: RejectKind::Internal,
            detail: detail.into(),
        }
    }
}

impl From<AuditError> for Reject {
    fn from(err: AuditError) -> Self {
        let kind = match &err {
            AuditError::Shape(_) => RejectKind::Shape,
            AuditError::MissingPrerequisite { .. } => RejectKind::MissingPrerequisite,
            AuditError::ConsistencyMismatch { .. } => RejectKind::ConsistencyMismatch,
            AuditError::ProofInvalid { .. } => RejectKind::ProofInvalid,
            AuditError::Gateway(GatewayError::Timeout { .. }) => RejectKind::GatewayTimeout,
            AuditError::Gateway(_) => RejectKind::GatewayError,
            AuditError::SeedReuseViolation { .. } => RejectKind::SeedReuse,
            AuditError::IndexOutOfRange { .. } | AuditError::Store(_) => RejectKind::Internal,
        };
        Self {
            kind,
            detail: err.to_string(),
        }
    }
}

impl std::fmt::Display for Reject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.detail)
    }
}
