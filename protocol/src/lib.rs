//! Logical protocol surface for PORA audits.
//!
//! Transport framing (HTTP, auth middleware, upload UI) is out of scope;
//! this crate defines the request/response contract, an async service that
//! drives the orchestrator off the request-handling path, and the
//! provider-side session that assembles round submissions.

pub mod messages;
pub mod provider;
pub mod service;

pub use messages::{
    Certificate, ChallengeSeedReply, Reject, RejectKind, UploadCertificate,
    UploadChallengeRound, UploadTagRound,
};
pub use provider::Provider;
pub use service::AuditService;
