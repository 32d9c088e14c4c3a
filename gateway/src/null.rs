//! Null gateway — deterministic prove/verify for testing.
//!
//! Never touches circuits or keys. Proof artifacts are canned, verify
//! verdicts are configurable, and every verify invocation is counted so
//! tests can assert the short-circuit contract (structural mismatch must
//! mean zero verifier calls).

use crate::{CircuitId, GatewayError, ProofBytes, ProofGateway, Witness};
use pora_types::FieldElement;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct NullGateway {
    verdict: bool,
    queued_signals: Mutex<VecDeque<Vec<FieldElement>>>,
    verify_calls: AtomicUsize,
    prove_calls: AtomicUsize,
}

impl NullGateway {
    /// A gateway whose verifier accepts every proof.
    pub fn accepting() -> Self {
        Self::with_verdict(true)
    }

    /// A gateway whose verifier rejects every proof (fraud signal).
    pub fn rejecting() -> Self {
        Self::with_verdict(false)
    }

    fn with_verdict(verdict: bool) -> Self {
        Self {
            verdict,
            queued_signals: Mutex::new(VecDeque::new()),
            verify_calls: AtomicUsize::new(0),
            prove_calls: AtomicUsize::new(0),
        }
    }

    /// Queue the public signals the next `generate_proof` call returns.
    pub fn queue_signals(&self, signals: Vec<FieldElement>) {
        self.queued_signals.lock().unwrap().push_back(signals);
    }

    /// How many times `verify_proof` has been invoked.
    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// How many times `prove_witness` has been invoked.
    pub fn prove_calls(&self) -> usize {
        self.prove_calls.load(Ordering::SeqCst)
    }
}

impl ProofGateway for NullGateway {
    fn prove_witness(
        &self,
        _circuit: CircuitId,
        private_input: &serde_json::Value,
    ) -> Result<Witness, GatewayError> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);
        let bytes = serde_json::to_vec(private_input)
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;
        Ok(Witness(bytes))
    }

    fn generate_proof(
        &self,
        circuit: CircuitId,
        _witness: &Witness,
    ) -> Result<(ProofBytes, Vec<FieldElement>), GatewayError> {
        let signals = self
            .queued_signals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        let proof = ProofBytes(format!("null-proof:{circuit}").into_bytes());
        Ok((proof, signals))
    }

    fn verify_proof(
        &self,
        _circuit: CircuitId,
        _public_signals: &[FieldElement],
        _proof: &ProofBytes,
    ) -> Result<bool, GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_verify_invocations() {
        let gateway = NullGateway::accepting();
        assert_eq!(gateway.verify_calls(), 0);
        gateway
            .verify_proof(CircuitId::TagRound, &[], &ProofBytes(Vec::new()))
            .unwrap();
        assert_eq!(gateway.verify_calls(), 1);
    }

    #[test]
    fn rejecting_gateway_returns_false() {
        let gateway = NullGateway::rejecting();
        let verdict = gateway
            .verify_proof(CircuitId::ChallengeRound, &[], &ProofBytes(Vec::new()))
            .unwrap();
        assert!(!verdict);
    }

    #[test]
    fn queued_signals_come_back_in_order() {
        let gateway = NullGateway::accepting();
        gateway.queue_signals(vec![FieldElement::from_u64(1)]);
        gateway.queue_signals(vec![FieldElement::from_u64(2)]);

        let witness = gateway
            .prove_witness(CircuitId::TagRound, &serde_json::json!({}))
            .unwrap();
        let (_, first) = gateway.generate_proof(CircuitId::TagRound, &witness).unwrap();
        let (_, second) = gateway.generate_proof(CircuitId::TagRound, &witness).unwrap();
        assert_eq!(first, vec![FieldElement::from_u64(1)]);
        assert_eq!(second, vec![FieldElement::from_u64(2)]);
    }
}
