//! Audit core for the PORA protocol.
//!
//! A provider proves it still holds a client's blob without the auditor
//! ever seeing the data. Two proof rounds per blob:
//! 1. **Tag round**: the provider commits to per-block tags (sigma), block
//!    digests, and the secret exponent digest, backed by a zk proof.
//! 2. **Challenge round**: the auditor issues a single-use seed; the
//!    provider aggregates the challenged blocks into a response (Miu, Tau)
//!    and proves it consistent with the committed tags.
//!
//! The structural checks (shape, signal binding, Tau recomputation) live
//! here; the zk prove/verify machinery stays behind the Proof Gateway port.

pub mod challenge;
pub mod error;
pub mod orchestrator;
pub mod response;
pub mod state;
pub mod stream;
pub mod tag;
pub mod validator;

pub use challenge::{Challenge, ChallengeScheduler, ChallengeSeed};
pub use error::{AuditError, Round};
pub use orchestrator::{
    AuditEvent, AuditOrchestrator, ChallengeRoundSubmission, TagRoundSubmission,
};
pub use response::{Response, ResponseComputer};
pub use state::{AuditPhase, BlobRecord, IssuedSeed};
pub use tag::{Metadata, TagGenerator};
pub use validator::ConsistencyValidator;
