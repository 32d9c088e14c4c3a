//! Audit orchestrator — the per-blob state machine sequencing tag and
//! challenge rounds over the storage and proof-gateway ports.
//!
//! Transition rules:
//! - `Onboarded → TagCommitted` on a consistent, verified tag round.
//! - `TagCommitted → ChallengeIssued` when a seed is issued.
//! - `ChallengeIssued → ChallengeVerified` on a consistent, verified
//!   response; `ChallengeVerified → ChallengeIssued` again on re-audit.
//!
//! No transition partially commits: a rejected round leaves the persisted
//! record exactly as it was, with one deliberate exception — submitting a
//! response consumes the outstanding seed even when the round fails, so a
//! provider can never answer the same challenge twice.

use crate::challenge::{ChallengeScheduler, ChallengeSeed};
use crate::error::{AuditError, Round};
use crate::response::ResponseComputer;
use crate::state::{AuditPhase, BlobRecord, IssuedSeed};
use crate::tag::Metadata;
use crate::validator::ConsistencyValidator;
use pora_gateway::{CircuitId, ProofBytes, ProofGateway};
use pora_store::AuditStore;
use pora_types::{AuditParams, BlobId, FieldElement, Timestamp};
use rand::Rng;

/// Events emitted for the embedding node/service to process.
#[derive(Clone, Debug)]
pub enum AuditEvent {
    /// Tags and commitments accepted and persisted.
    TagCommitted { blob: BlobId },
    /// A fresh challenge seed went outstanding.
    SeedIssued { blob: BlobId, seed: ChallengeSeed },
    /// A possession response passed consistency checks and verification.
    ChallengeVerified { blob: BlobId },
}

/// Provider submission for the tag round.
#[derive(Clone, Debug)]
pub struct TagRoundSubmission {
    pub metadata: Metadata,
    pub hash_data: Vec<FieldElement>,
    pub hash_alpha: FieldElement,
    pub proof: ProofBytes,
    pub public_signals: Vec<FieldElement>,
}

/// Provider submission for the challenge round.
#[derive(Clone, Debug)]
pub struct ChallengeRoundSubmission {
    /// The provider resends its metadata; it must match the stored tags.
    pub metadata: Metadata,
    pub proof: ProofBytes,
    pub public_signals: Vec<FieldElement>,
}

pub struct AuditOrchestrator<S, G> {
    store: S,
    gateway: G,
    params: AuditParams,
    validator: ConsistencyValidator,
    scheduler: ChallengeScheduler,
    responses: ResponseComputer,
    pending_events: Vec<AuditEvent>,
}

impl<S: AuditStore, G: ProofGateway> AuditOrchestrator<S, G> {
    pub fn new(store: S, gateway: G, params: AuditParams) -> Self {
        Self {
            validator: ConsistencyValidator::new(params.clone()),
            scheduler: ChallengeScheduler::new(params.clone()),
            responses: ResponseComputer::new(params.clone()),
            store,
            gateway,
            params,
            pending_events: Vec::new(),
        }
    }

    /// Accept a provider certificate and open (or reset) the blob's audit
    /// record. Re-onboarding replaces the record wholesale.
    pub fn onboard(&mut self, blob_id: BlobId, hash_alpha: FieldElement) -> Result<(), AuditError> {
        let record = BlobRecord::onboarded(blob_id.clone(), hash_alpha);
        self.persist(&record)?;
        tracing::info!(blob = %blob_id, "blob onboarded");
        Ok(())
    }

    /// Retire a blob entirely. A retired blob must be re-onboarded before
    /// any further round.
    pub fn retire(&mut self, blob_id: &BlobId) -> Result<(), AuditError> {
        self.store.remove(blob_id)?;
        tracing::info!(blob = %blob_id, "blob retired");
        Ok(())
    }

    /// Tag round: validate the disclosed signals against the submission and
    /// the stored certificate, verify the proof, then persist tags and
    /// commitments write-once.
    pub fn submit_tag_round(
        &mut self,
        blob_id: &BlobId,
        submission: TagRoundSubmission,
    ) -> Result<(), AuditError> {
        let mut record = self.load(blob_id)?;
        self.require_phase(&record, AuditPhase::Onboarded, "onboarded phase")?;

        // The submitted alpha digest must be the certificate's digest.
        if submission.hash_alpha != record.hash_alpha {
            tracing::warn!(blob = %blob_id, "tag round alpha digest disagrees with certificate");
            return Err(AuditError::ConsistencyMismatch {
                slice: "hashAlpha",
                index: 2 * self.params.rows,
            });
        }

        self.validator.check_tag_round(
            &submission.public_signals,
            &submission.metadata.sigma,
            &submission.hash_data,
            record.hash_alpha,
        )?;

        let valid = self.gateway.verify_proof(
            CircuitId::TagRound,
            &submission.public_signals,
            &submission.proof,
        )?;
        if !valid {
            tracing::warn!(blob = %blob_id, "tag round proof rejected");
            return Err(AuditError::ProofInvalid { round: Round::Tag });
        }

        record.sigma = submission.metadata.sigma;
        record.hash_data = submission.hash_data;
        record.phase = AuditPhase::TagCommitted;
        self.persist(&record)?;

        tracing::info!(blob = %blob_id, "tag round committed");
        self.pending_events.push(AuditEvent::TagCommitted {
            blob: blob_id.clone(),
        });
        Ok(())
    }

    /// Issue a challenge seed. While an unconsumed seed is outstanding the
    /// same seed is returned — two live seeds for one blob would let the
    /// provider answer a stale challenge.
    pub fn issue_challenge_seed<R: Rng>(
        &mut self,
        blob_id: &BlobId,
        rng: &mut R,
    ) -> Result<ChallengeSeed, AuditError> {
        let mut record = self.load(blob_id)?;

        match record.phase {
            AuditPhase::Onboarded => {
                return Err(AuditError::MissingPrerequisite {
                    blob: blob_id.clone(),
                    expected: "committed tag round",
                    found: format!("{} phase", record.phase),
                });
            }
            AuditPhase::ChallengeIssued => {
                if let Some(issued) = &record.outstanding_seed {
                    if !issued.consumed {
                        tracing::debug!(blob = %blob_id, "returning outstanding seed");
                        return Ok(issued.seed);
                    }
                }
            }
            AuditPhase::TagCommitted | AuditPhase::ChallengeVerified => {}
        }

        let seed = ChallengeSeed::generate(rng);
        record.outstanding_seed = Some(IssuedSeed {
            seed,
            issued_at: Timestamp::now(),
            consumed: false,
        });
        record.phase = AuditPhase::ChallengeIssued;
        self.persist(&record)?;

        tracing::info!(blob = %blob_id, "challenge seed issued");
        self.pending_events.push(AuditEvent::SeedIssued {
            blob: blob_id.clone(),
            seed,
        });
        Ok(seed)
    }

    /// Challenge round: consume the outstanding seed, recompute Tau from
    /// stored tags, bind the disclosed signals, verify the proof.
    pub fn submit_challenge_round(
        &mut self,
        blob_id: &BlobId,
        submission: ChallengeRoundSubmission,
    ) -> Result<(), AuditError> {
        let mut record = self.load(blob_id)?;
        self.require_phase(&record, AuditPhase::ChallengeIssued, "outstanding challenge")?;

        let issued = record
            .outstanding_seed
            .as_mut()
            .ok_or_else(|| AuditError::MissingPrerequisite {
                blob: blob_id.clone(),
                expected: "outstanding challenge",
                found: "no issued seed".to_string(),
            })?;
        if issued.consumed {
            return Err(AuditError::SeedReuseViolation {
                blob: blob_id.clone(),
            });
        }

        // Consume before validating: the one mutation that survives a
        // failed round. A retry needs a fresh seed.
        issued.consumed = true;
        let seed = issued.seed;
        self.persist(&record)?;

        // The resubmitted metadata must be the committed tags.
        if submission.metadata.sigma.len() != record.sigma.len() {
            return Err(pora_types::ShapeError::new(
                "metadata sigma",
                record.sigma.len(),
                submission.metadata.sigma.len(),
            )
            .into());
        }
        for (index, (submitted, stored)) in submission
            .metadata
            .sigma
            .iter()
            .zip(&record.sigma)
            .enumerate()
        {
            if submitted != stored {
                tracing::warn!(blob = %blob_id, index, "resubmitted sigma disagrees with committed tags");
                return Err(AuditError::ConsistencyMismatch {
                    slice: "sigma",
                    index,
                });
            }
        }

        let challenge = self.scheduler.derive(seed);
        let stored_metadata = Metadata {
            sigma: record.sigma.clone(),
        };
        let expected_tau = self.responses.expected_tau(&stored_metadata, &challenge)?;

        self.validator.check_challenge_round(
            &submission.public_signals,
            expected_tau,
            record.hash_alpha,
        )?;

        let valid = self.gateway.verify_proof(
            CircuitId::ChallengeRound,
            &submission.public_signals,
            &submission.proof,
        )?;
        if !valid {
            tracing::warn!(blob = %blob_id, "challenge round proof rejected");
            return Err(AuditError::ProofInvalid {
                round: Round::Challenge,
            });
        }

        record.phase = AuditPhase::ChallengeVerified;
        record.last_tau = Some(expected_tau);
        record.outstanding_seed = None;
        self.persist(&record)?;

        tracing::info!(blob = %blob_id, "challenge round verified");
        self.pending_events.push(AuditEvent::ChallengeVerified {
            blob: blob_id.clone(),
        });
        Ok(())
    }

    /// Current phase of a blob.
    pub fn phase(&self, blob_id: &BlobId) -> Result<AuditPhase, AuditError> {
        Ok(self.load(blob_id)?.phase)
    }

    /// The full persisted record of a blob.
    pub fn record(&self, blob_id: &BlobId) -> Result<BlobRecord, AuditError> {
        self.load(blob_id)
    }

    /// Drain pending events for the embedding node to process.
    pub fn drain_events(&mut self) -> Vec<AuditEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn params(&self) -> &AuditParams {
        &self.params
    }

    fn load(&self, blob_id: &BlobId) -> Result<BlobRecord, AuditError> {
        let bytes = self
            .store
            .get(blob_id)?
            .ok_or_else(|| AuditError::MissingPrerequisite {
                blob: blob_id.clone(),
                expected: "certificate upload",
                found: "no audit record".to_string(),
            })?;
        Ok(BlobRecord::from_bytes(&bytes)?)
    }

    fn persist(&self, record: &BlobRecord) -> Result<(), AuditError> {
        self.store.put(&record.blob_id, &record.to_bytes()?)?;
        Ok(())
    }

    fn require_phase(
        &self,
        record: &BlobRecord,
        expected: AuditPhase,
        expected_name: &'static str,
    ) -> Result<(), AuditError> {
        if record.phase != expected {
            return Err(AuditError::MissingPrerequisite {
                blob: record.blob_id.clone(),
                expected: expected_name,
                found: format!("{} phase", record.phase),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;
    use crate::tag::TagGenerator;
    use pora_gateway::NullGateway;
    use pora_store::MemoryAuditStore;
    use pora_types::DataBlob;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    fn small_params() -> AuditParams {
        AuditParams {
            rows: 2,
            sectors: 2,
            challenge_size: 1,
            coeff_domain: 100,
            gateway_deadline_secs: 30,
        }
    }

    fn small_blob() -> DataBlob {
        DataBlob::new(vec![vec![fe(1), fe(2)], vec![fe(3), fe(4)]], 2, 2).unwrap()
    }

    /// sigma for small_blob with alpha = 5.
    fn small_metadata() -> Metadata {
        TagGenerator::new(small_params())
            .generate(&small_blob(), fe(5))
            .unwrap()
    }

    const HASH_ALPHA: u64 = 777;

    struct Fixture {
        orch: AuditOrchestrator<Arc<MemoryAuditStore>, Arc<NullGateway>>,
        store: Arc<MemoryAuditStore>,
        gateway: Arc<NullGateway>,
        blob_id: BlobId,
    }

    fn fixture_with(gateway: NullGateway) -> Fixture {
        let store = Arc::new(MemoryAuditStore::new());
        let gateway = Arc::new(gateway);
        let orch = AuditOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            small_params(),
        );
        Fixture {
            orch,
            store,
            gateway,
            blob_id: BlobId::new("blob-1"),
        }
    }

    fn fixture() -> Fixture {
        fixture_with(NullGateway::accepting())
    }

    fn tag_submission() -> TagRoundSubmission {
        let metadata = small_metadata();
        let hash_data = vec![fe(900), fe(901)];
        let mut signals = metadata.sigma.clone();
        signals.extend(hash_data.iter().copied());
        signals.push(fe(HASH_ALPHA));
        TagRoundSubmission {
            metadata,
            hash_data,
            hash_alpha: fe(HASH_ALPHA),
            proof: ProofBytes(b"tag-proof".to_vec()),
            public_signals: signals,
        }
    }

    fn challenge_submission(seed: ChallengeSeed) -> ChallengeRoundSubmission {
        let metadata = small_metadata();
        let challenge = ChallengeScheduler::new(small_params()).derive(seed);
        let Response { miu, tau } = ResponseComputer::new(small_params())
            .compute(&small_blob(), &metadata, &challenge)
            .unwrap();

        let mut signals = miu;
        signals.push(tau);
        signals.push(fe(HASH_ALPHA));
        ChallengeRoundSubmission {
            metadata,
            proof: ProofBytes(b"resp-proof".to_vec()),
            public_signals: signals,
        }
    }

    fn onboard_and_commit(f: &mut Fixture) {
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();
        f.orch
            .submit_tag_round(&f.blob_id, tag_submission())
            .unwrap();
    }

    // ── Full audit flow ─────────────────────────────────────────────────

    #[test]
    fn full_audit_flow() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(42);

        onboard_and_commit(&mut f);
        assert_eq!(f.orch.phase(&f.blob_id).unwrap(), AuditPhase::TagCommitted);

        let seed = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        assert_eq!(
            f.orch.phase(&f.blob_id).unwrap(),
            AuditPhase::ChallengeIssued
        );

        f.orch
            .submit_challenge_round(&f.blob_id, challenge_submission(seed))
            .unwrap();

        let record = f.orch.record(&f.blob_id).unwrap();
        assert_eq!(record.phase, AuditPhase::ChallengeVerified);
        assert!(record.last_tau.is_some());
        assert!(record.outstanding_seed.is_none());

        let events = f.orch.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, AuditEvent::TagCommitted { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, AuditEvent::SeedIssued { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, AuditEvent::ChallengeVerified { .. })));

        // Both rounds reached the verifier exactly once.
        assert_eq!(f.gateway.verify_calls(), 2);
    }

    #[test]
    fn re_audit_issues_fresh_seed_after_verification() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(7);

        onboard_and_commit(&mut f);
        let first = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        f.orch
            .submit_challenge_round(&f.blob_id, challenge_submission(first))
            .unwrap();

        let second = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        assert_ne!(first, second);
        assert_eq!(
            f.orch.phase(&f.blob_id).unwrap(),
            AuditPhase::ChallengeIssued
        );
    }

    // ── Ordering ────────────────────────────────────────────────────────

    #[test]
    fn rounds_require_onboarding() {
        let mut f = fixture();
        let err = f
            .orch
            .submit_tag_round(&f.blob_id, tag_submission())
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingPrerequisite { .. }));
    }

    #[test]
    fn seed_requires_committed_tags() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();

        let err = f
            .orch
            .issue_challenge_seed(&f.blob_id, &mut rng)
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingPrerequisite { .. }));
    }

    #[test]
    fn challenge_round_requires_outstanding_seed() {
        let mut f = fixture();
        onboard_and_commit(&mut f);

        let err = f
            .orch
            .submit_challenge_round(&f.blob_id, challenge_submission(ChallengeSeed::new(1, 1)))
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingPrerequisite { .. }));
    }

    #[test]
    fn tag_round_cannot_be_replayed_after_commit() {
        let mut f = fixture();
        onboard_and_commit(&mut f);

        let err = f
            .orch
            .submit_tag_round(&f.blob_id, tag_submission())
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingPrerequisite { .. }));
    }

    // ── Consistency short-circuit ───────────────────────────────────────

    #[test]
    fn flipped_tag_signal_short_circuits_before_verifier() {
        let mut f = fixture();
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();

        let mut submission = tag_submission();
        submission.public_signals[0] = fe(56);

        let err = f
            .orch
            .submit_tag_round(&f.blob_id, submission)
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::ConsistencyMismatch { slice: "sigma", index: 0 }
        ));
        assert_eq!(f.gateway.verify_calls(), 0, "verifier must not run");

        // No partial commit: still onboarded, tags still empty.
        let record = f.orch.record(&f.blob_id).unwrap();
        assert_eq!(record.phase, AuditPhase::Onboarded);
        assert!(record.sigma.is_empty());
        assert!(record.hash_data.is_empty());
    }

    #[test]
    fn certificate_digest_binds_the_tag_round() {
        let mut f = fixture();
        f.orch.onboard(f.blob_id.clone(), fe(778)).unwrap();

        let err = f
            .orch
            .submit_tag_round(&f.blob_id, tag_submission())
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::ConsistencyMismatch { slice: "hashAlpha", .. }
        ));
        assert_eq!(f.gateway.verify_calls(), 0);
    }

    #[test]
    fn invalid_tag_proof_is_distinct_from_mismatch() {
        let mut f = fixture_with(NullGateway::rejecting());
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();

        let err = f
            .orch
            .submit_tag_round(&f.blob_id, tag_submission())
            .unwrap_err();
        assert!(matches!(err, AuditError::ProofInvalid { round: Round::Tag }));
        assert_eq!(f.orch.phase(&f.blob_id).unwrap(), AuditPhase::Onboarded);
    }

    // ── Seed single-use ─────────────────────────────────────────────────

    #[test]
    fn outstanding_seed_is_returned_not_reissued() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(9);
        onboard_and_commit(&mut f);

        let first = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        let second = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        assert_eq!(first, second, "never two live seeds");

        let seed_events = f
            .orch
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, AuditEvent::SeedIssued { .. }))
            .count();
        assert_eq!(seed_events, 1);
    }

    #[test]
    fn failed_round_consumes_the_seed() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(3);
        onboard_and_commit(&mut f);
        let seed = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        let verify_calls_after_tag = f.gateway.verify_calls();

        // Corrupt the Tau signal: consistency fails, seed is spent anyway.
        let mut submission = challenge_submission(seed);
        let tau_index = small_params().tau_signal_index();
        submission.public_signals[tau_index] = fe(1);

        let err = f
            .orch
            .submit_challenge_round(&f.blob_id, submission)
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::ConsistencyMismatch { slice: "tau", .. }
        ));
        assert_eq!(
            f.gateway.verify_calls(),
            verify_calls_after_tag,
            "mismatch must not reach the verifier"
        );

        // Re-answering the same challenge is a protocol violation.
        let err = f
            .orch
            .submit_challenge_round(&f.blob_id, challenge_submission(seed))
            .unwrap_err();
        assert!(matches!(err, AuditError::SeedReuseViolation { .. }));

        // Recovery path: a fresh seed, then a clean round.
        let fresh = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        assert_ne!(fresh, seed);
        f.orch
            .submit_challenge_round(&f.blob_id, challenge_submission(fresh))
            .unwrap();
        assert_eq!(
            f.orch.phase(&f.blob_id).unwrap(),
            AuditPhase::ChallengeVerified
        );
    }

    #[test]
    fn invalid_challenge_proof_keeps_phase_and_spends_seed() {
        let mut f = fixture_with(NullGateway::rejecting());
        let mut rng = StdRng::seed_from_u64(4);
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();

        // Commit tags directly through the store: the rejecting gateway
        // would fail the tag round too.
        let mut record = f.orch.record(&f.blob_id).unwrap();
        record.sigma = small_metadata().sigma;
        record.hash_data = vec![fe(900), fe(901)];
        record.phase = AuditPhase::TagCommitted;
        f.store
            .put(&f.blob_id, &record.to_bytes().unwrap())
            .unwrap();

        let seed = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        let err = f
            .orch
            .submit_challenge_round(&f.blob_id, challenge_submission(seed))
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::ProofInvalid { round: Round::Challenge }
        ));

        let record = f.orch.record(&f.blob_id).unwrap();
        assert_eq!(record.phase, AuditPhase::ChallengeIssued);
        let issued = record.outstanding_seed.unwrap();
        assert!(issued.consumed);
    }

    #[test]
    fn resubmitted_sigma_must_match_committed_tags() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(5);
        onboard_and_commit(&mut f);
        let seed = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();

        let mut submission = challenge_submission(seed);
        submission.metadata.sigma[1] = fe(116);

        let err = f
            .orch
            .submit_challenge_round(&f.blob_id, submission)
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::ConsistencyMismatch { slice: "sigma", index: 1 }
        ));
    }

    // ── Onboarding semantics ────────────────────────────────────────────

    #[test]
    fn re_onboarding_resets_the_record() {
        let mut f = fixture();
        let mut rng = StdRng::seed_from_u64(6);
        onboard_and_commit(&mut f);
        let seed = f.orch.issue_challenge_seed(&f.blob_id, &mut rng).unwrap();
        f.orch
            .submit_challenge_round(&f.blob_id, challenge_submission(seed))
            .unwrap();

        f.orch.onboard(f.blob_id.clone(), fe(888)).unwrap();
        let record = f.orch.record(&f.blob_id).unwrap();
        assert_eq!(record.phase, AuditPhase::Onboarded);
        assert_eq!(record.hash_alpha, fe(888));
        assert!(record.sigma.is_empty());
        assert!(record.last_tau.is_none());
    }

    #[test]
    fn retired_blob_has_no_record() {
        let mut f = fixture();
        f.orch.onboard(f.blob_id.clone(), fe(HASH_ALPHA)).unwrap();
        f.orch.retire(&f.blob_id).unwrap();
        assert!(matches!(
            f.orch.phase(&f.blob_id),
            Err(AuditError::MissingPrerequisite { .. })
        ));
    }
}
