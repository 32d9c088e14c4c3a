//! Provider-side session — assembles round submissions from a locally held
//! blob and secret exponent.

use crate::messages::{Certificate, UploadChallengeRound, UploadTagRound};
use pora_audit::{AuditError, ChallengeScheduler, ChallengeSeed, Metadata, ResponseComputer, TagGenerator};
use pora_crypto::{CommitmentHasher, FieldHash};
use pora_gateway::{CircuitId, ProofGateway};
use pora_types::{AuditParams, BlobId, DataBlob, FieldElement};
use serde_json::json;

/// A provider holding blobs and proving possession on demand. The blob and
/// the secret exponent alpha never leave this side; only commitments,
/// aggregates, and proofs go on the wire.
pub struct Provider<H, G> {
    params: AuditParams,
    hasher: CommitmentHasher<H>,
    tags: TagGenerator,
    scheduler: ChallengeScheduler,
    responses: ResponseComputer,
    gateway: G,
}

impl<H: FieldHash, G: ProofGateway> Provider<H, G> {
    pub fn new(params: AuditParams, hash: H, gateway: G) -> Self {
        Self {
            hasher: CommitmentHasher::new(hash, params.sectors),
            tags: TagGenerator::new(params.clone()),
            scheduler: ChallengeScheduler::new(params.clone()),
            responses: ResponseComputer::new(params.clone()),
            params,
            gateway,
        }
    }

    /// Produce the certificate delivering the alpha commitment. Issuer and
    /// signature come from the external authentication layer.
    pub fn certificate(
        &self,
        alpha: FieldElement,
        issuer: impl Into<String>,
        signature: impl Into<String>,
    ) -> Certificate {
        Certificate {
            hash_alpha: self.hasher.commit_alpha(alpha),
            issuer: issuer.into(),
            signature: signature.into(),
        }
    }

    /// Compute tags, commit to blocks and alpha, and prove the tag circuit.
    /// The disclosed signals come from the prover, not from local
    /// recomputation, so the auditor's binding check is meaningful.
    pub fn prepare_tag_round(
        &self,
        blob_id: &BlobId,
        blob: &DataBlob,
        alpha: FieldElement,
    ) -> Result<UploadTagRound, AuditError> {
        let metadata = self.tags.generate(blob, alpha)?;
        let data_hash = self.hasher.commit_blob(blob)?;
        let alpha_hash = self.hasher.commit_alpha(alpha);

        let private_input = json!({
            "Data": rows(blob),
            "alpha": alpha,
        });
        let witness = self
            .gateway
            .prove_witness(CircuitId::TagRound, &private_input)?;
        let (tag_proof, tag_public_signals) =
            self.gateway.generate_proof(CircuitId::TagRound, &witness)?;

        tracing::debug!(blob = %blob_id, signals = tag_public_signals.len(), "tag round prepared");
        Ok(UploadTagRound {
            blob_id: blob_id.clone(),
            meta_data: metadata,
            data_hash,
            alpha_hash,
            tag_proof,
            tag_public_signals,
        })
    }

    /// Derive the challenge from the auditor's seed, aggregate the answer,
    /// and prove the challenge circuit.
    pub fn answer_challenge(
        &self,
        blob_id: &BlobId,
        blob: &DataBlob,
        metadata: &Metadata,
        alpha: FieldElement,
        seed: [u64; 2],
    ) -> Result<UploadChallengeRound, AuditError> {
        let challenge = self.scheduler.derive(ChallengeSeed::from(seed));
        let response = self.responses.compute(blob, metadata, &challenge)?;

        let private_input = json!({
            "Data": rows(blob),
            "sigma": metadata.sigma,
            "alpha": alpha,
            "indices": challenge.indices,
            "coefficients": challenge.coefficients,
            "Miu": response.miu,
            "Tau": response.tau,
        });
        let witness = self
            .gateway
            .prove_witness(CircuitId::ChallengeRound, &private_input)?;
        let (resp_proof, resp_public_signals) = self
            .gateway
            .generate_proof(CircuitId::ChallengeRound, &witness)?;

        tracing::debug!(blob = %blob_id, "challenge answered");
        Ok(UploadChallengeRound {
            blob_id: blob_id.clone(),
            meta_data: metadata.clone(),
            resp_proof,
            resp_public_signals,
        })
    }

    pub fn params(&self) -> &AuditParams {
        &self.params
    }
}

/// The blob as a bare matrix for the circuit input document.
fn rows(blob: &DataBlob) -> Vec<Vec<FieldElement>> {
    blob.blocks().map(<[FieldElement]>::to_vec).collect()
}
