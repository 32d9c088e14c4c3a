//! Deadline enforcement for gateway calls.
//!
//! Witness computation and Groth16 prove/verify can take arbitrarily long
//! when circuit or key binaries misbehave. Every call through this adapter
//! is bounded: exceeding the deadline is a fatal failure of that audit
//! round, surfaced as [`GatewayError::Timeout`]. There is no automatic
//! retry — re-invoking the identical call is the caller's decision.

use crate::{CircuitId, GatewayError, ProofBytes, ProofGateway, Witness};
use pora_types::FieldElement;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Wraps a gateway so every call observes a fixed deadline.
///
/// The inner call keeps running on its worker thread after a timeout; its
/// result is discarded. Gateway calls are side-effect-free on audit state,
/// so an abandoned call cannot corrupt a round.
pub struct DeadlineGateway<G> {
    inner: Arc<G>,
    deadline: Duration,
}

impl<G: ProofGateway + 'static> DeadlineGateway<G> {
    pub fn new(inner: G, deadline_secs: u64) -> Self {
        Self {
            inner: Arc::new(inner),
            deadline: Duration::from_secs(deadline_secs),
        }
    }

    fn call<T, F>(&self, f: F) -> Result<T, GatewayError>
    where
        T: Send + 'static,
        F: FnOnce(&G) -> Result<T, GatewayError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            // Receiver may be gone if the deadline already fired.
            let _ = tx.send(f(&inner));
        });
        match rx.recv_timeout(self.deadline) {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(deadline_secs = self.deadline.as_secs(), "gateway call timed out");
                Err(GatewayError::Timeout {
                    deadline_secs: self.deadline.as_secs(),
                })
            }
        }
    }
}

impl<G: ProofGateway + 'static> ProofGateway for DeadlineGateway<G> {
    fn prove_witness(
        &self,
        circuit: CircuitId,
        private_input: &serde_json::Value,
    ) -> Result<Witness, GatewayError> {
        let input = private_input.clone();
        self.call(move |g| g.prove_witness(circuit, &input))
    }

    fn generate_proof(
        &self,
        circuit: CircuitId,
        witness: &Witness,
    ) -> Result<(ProofBytes, Vec<FieldElement>), GatewayError> {
        let witness = witness.clone();
        self.call(move |g| g.generate_proof(circuit, &witness))
    }

    fn verify_proof(
        &self,
        circuit: CircuitId,
        public_signals: &[FieldElement],
        proof: &ProofBytes,
    ) -> Result<bool, GatewayError> {
        let signals = public_signals.to_vec();
        let proof = proof.clone();
        self.call(move |g| g.verify_proof(circuit, &signals, &proof))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullGateway;

    struct SlowGateway;

    impl ProofGateway for SlowGateway {
        fn prove_witness(
            &self,
            _circuit: CircuitId,
            _private_input: &serde_json::Value,
        ) -> Result<Witness, GatewayError> {
            thread::sleep(Duration::from_secs(5));
            Ok(Witness(Vec::new()))
        }

        fn generate_proof(
            &self,
            _circuit: CircuitId,
            _witness: &Witness,
        ) -> Result<(ProofBytes, Vec<FieldElement>), GatewayError> {
            thread::sleep(Duration::from_secs(5));
            Ok((ProofBytes(Vec::new()), Vec::new()))
        }

        fn verify_proof(
            &self,
            _circuit: CircuitId,
            _public_signals: &[FieldElement],
            _proof: &ProofBytes,
        ) -> Result<bool, GatewayError> {
            thread::sleep(Duration::from_secs(5));
            Ok(true)
        }
    }

    #[test]
    fn times_out_slow_calls() {
        let gateway = DeadlineGateway::new(SlowGateway, 0);
        let result = gateway.verify_proof(CircuitId::TagRound, &[], &ProofBytes(Vec::new()));
        assert!(matches!(result, Err(GatewayError::Timeout { .. })));
    }

    #[test]
    fn passes_fast_calls_through() {
        let gateway = DeadlineGateway::new(NullGateway::accepting(), 30);
        let result = gateway
            .verify_proof(CircuitId::TagRound, &[], &ProofBytes(Vec::new()))
            .unwrap();
        assert!(result);
    }
}
