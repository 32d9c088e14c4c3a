//! Async audit service — the auditor's protocol surface.
//!
//! Wraps the orchestrator behind a mutex and runs every round on the
//! blocking pool, keeping proof verification off the async executor. The
//! mutex also serializes seed issuance, so two concurrent seed requests for
//! one blob observe the single-outstanding-seed rule instead of racing.

use crate::messages::{
    ChallengeSeedReply, Reject, UploadCertificate, UploadChallengeRound, UploadTagRound,
};
use pora_audit::{
    AuditEvent, AuditOrchestrator, AuditPhase, ChallengeRoundSubmission, TagRoundSubmission,
};
use pora_gateway::ProofGateway;
use pora_store::AuditStore;
use pora_types::BlobId;
use std::sync::{Arc, Mutex};

pub struct AuditService<S, G> {
    orchestrator: Arc<Mutex<AuditOrchestrator<S, G>>>,
}

impl<S, G> Clone for AuditService<S, G> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}

impl<S, G> AuditService<S, G>
where
    S: AuditStore + 'static,
    G: ProofGateway + 'static,
{
    pub fn new(orchestrator: AuditOrchestrator<S, G>) -> Self {
        Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
        }
    }

    /// Accept a certificate and open the blob's audit record.
    pub async fn upload_certificate(&self, request: UploadCertificate) -> Result<(), Reject> {
        tracing::info!(blob = %request.blob_id, "certificate upload");
        self.run(move |orch| {
            orch.onboard(request.blob_id, request.certificate.hash_alpha)
        })
        .await
    }

    /// Accept a tag round submission.
    pub async fn upload_tag_round(&self, request: UploadTagRound) -> Result<(), Reject> {
        tracing::info!(blob = %request.blob_id, "tag round upload");
        self.run(move |orch| {
            let submission = TagRoundSubmission {
                metadata: request.meta_data,
                hash_data: request.data_hash,
                hash_alpha: request.alpha_hash,
                proof: request.tag_proof,
                public_signals: request.tag_public_signals,
            };
            orch.submit_tag_round(&request.blob_id, submission)
        })
        .await
    }

    /// Issue (or re-deliver) the blob's challenge seed.
    pub async fn challenge_seed(&self, blob_id: BlobId) -> Result<ChallengeSeedReply, Reject> {
        tracing::info!(blob = %blob_id, "challenge seed request");
        self.run(move |orch| {
            let seed = orch.issue_challenge_seed(&blob_id, &mut rand::rng())?;
            Ok(ChallengeSeedReply {
                seed: seed.as_pair(),
            })
        })
        .await
    }

    /// Accept a challenge round submission.
    pub async fn upload_challenge_round(
        &self,
        request: UploadChallengeRound,
    ) -> Result<(), Reject> {
        tracing::info!(blob = %request.blob_id, "challenge round upload");
        self.run(move |orch| {
            let submission = ChallengeRoundSubmission {
                metadata: request.meta_data,
                proof: request.resp_proof,
                public_signals: request.resp_public_signals,
            };
            orch.submit_challenge_round(&request.blob_id, submission)
        })
        .await
    }

    /// Retire a blob from auditing.
    pub async fn retire(&self, blob_id: BlobId) -> Result<(), Reject> {
        tracing::info!(blob = %blob_id, "blob retirement");
        self.run(move |orch| orch.retire(&blob_id)).await
    }

    /// Current audit phase of a blob.
    pub async fn phase(&self, blob_id: BlobId) -> Result<AuditPhase, Reject> {
        self.run(move |orch| orch.phase(&blob_id)).await
    }

    /// Drain events accumulated by completed rounds.
    pub fn drain_events(&self) -> Vec<AuditEvent> {
        self.orchestrator.lock().unwrap().drain_events()
    }

    async fn run<T, F>(&self, op: F) -> Result<T, Reject>
    where
        T: Send + 'static,
        F: FnOnce(&mut AuditOrchestrator<S, G>) -> Result<T, pora_audit::AuditError>
            + Send
            + 'static,
    {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::task::spawn_blocking(move || {
            let mut orch = orchestrator.lock().unwrap();
            op(&mut orch).map_err(Reject::from)
        })
        .await
        .map_err(|e| Reject::internal(format!("audit task failed: {e}")))?
    }
}
