//! The Proof Gateway port.
//!
//! The zk-SNARK machinery (witness computation, Groth16 prove/verify,
//! circuit and key binaries) is an external subsystem. This crate defines
//! the port the audit core consumes, a deadline adapter for the calls that
//! may block, and a recording null implementation for tests. Pairing
//! cryptography is never reimplemented here.

pub mod deadline;
pub mod error;
pub mod null;

pub use deadline::DeadlineGateway;
pub use error::GatewayError;
pub use null::NullGateway;

use pora_types::FieldElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which companion circuit a call targets. The gateway implementation binds
/// each id to its circuit, proving key, and verification key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitId {
    /// Tag round: proves sigma/commitment consistency over the full blob.
    TagRound,
    /// Challenge round: proves the aggregated possession response.
    ChallengeRound,
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitId::TagRound => write!(f, "tag-round"),
            CircuitId::ChallengeRound => write!(f, "challenge-round"),
        }
    }
}

/// Opaque witness bytes produced by the external witness generator.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness(pub Vec<u8>);

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Witness({} bytes)", self.0.len())
    }
}

/// Opaque proof bytes. The audit core never inspects them — they are bound
/// to public signals and handed back to the verifier as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBytes(pub Vec<u8>);

impl ProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.0[..self.0.len().min(4)];
        write!(f, "ProofBytes({}…)", hex::encode(head))
    }
}

/// External prove/verify subsystem.
///
/// Implementations translate their own transport faults into
/// [`GatewayError`]; no other error kind crosses this boundary. Calls are
/// expensive and deterministic — the only safe retry is the identical call.
pub trait ProofGateway: Send + Sync {
    /// Compute the witness for a circuit from its private input document.
    fn prove_witness(
        &self,
        circuit: CircuitId,
        private_input: &serde_json::Value,
    ) -> Result<Witness, GatewayError>;

    /// Produce a proof and its disclosed public signals from a witness.
    fn generate_proof(
        &self,
        circuit: CircuitId,
        witness: &Witness,
    ) -> Result<(ProofBytes, Vec<FieldElement>), GatewayError>;

    /// Verify a proof against its public signals. `Ok(false)` means the
    /// proof is well-formed but invalid — a distinct, higher-severity
    /// signal than any gateway fault.
    fn verify_proof(
        &self,
        circuit: CircuitId,
        public_signals: &[FieldElement],
        proof: &ProofBytes,
    ) -> Result<bool, GatewayError>;
}

impl<G: ProofGateway + ?Sized> ProofGateway for std::sync::Arc<G> {
    fn prove_witness(
        &self,
        circuit: CircuitId,
        private_input: &serde_json::Value,
    ) -> Result<Witness, GatewayError> {
        (**self).prove_witness(circuit, private_input)
    }

    fn generate_proof(
        &self,
        circuit: CircuitId,
        witness: &Witness,
    ) -> Result<(ProofBytes, Vec<FieldElement>), GatewayError> {
        (**self).generate_proof(circuit, witness)
    }

    fn verify_proof(
        &self,
        circuit: CircuitId,
        public_signals: &[FieldElement],
        proof: &ProofBytes,
    ) -> Result<bool, GatewayError> {
        (**self).verify_proof(circuit, public_signals, proof)
    }
}
