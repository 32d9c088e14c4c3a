//! Fundamental types for the PORA audit protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: field elements, the blob matrix, blob identifiers, protocol
//! parameters, timestamps, and shape errors.

pub mod blob;
pub mod error;
pub mod field;
pub mod id;
pub mod params;
pub mod time;

pub use blob::DataBlob;
pub use error::ShapeError;
pub use field::{FieldElement, FieldParseError};
pub use id::BlobId;
pub use params::AuditParams;
pub use time::Timestamp;
