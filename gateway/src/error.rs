use thiserror::Error;

/// Faults raised by the external prover/verifier subsystem.
///
/// Both kinds are transient: the identical call may be retried once the
/// subsystem recovers. Retrying with mutated inputs is never safe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("proof gateway call exceeded the {deadline_secs}s deadline")]
    Timeout { deadline_secs: u64 },

    #[error("proof gateway unavailable: {0}")]
    Unavailable(String),

    #[error("proof gateway returned a malformed artifact: {0}")]
    Malformed(String),
}
