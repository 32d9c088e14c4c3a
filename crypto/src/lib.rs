//! Commitment hashing for the PORA audit protocol.
//!
//! The collision-resistant field hash (Poseidon-class in production) is an
//! external primitive consumed through the [`FieldHash`] port. This crate
//! supplies the port, a Blake2b-based stand-in implementation for tests and
//! development, and the [`CommitmentHasher`] that turns blobs and secret
//! exponents into commitments.

pub mod commitment;
pub mod field_hash;

pub use commitment::CommitmentHasher;
pub use field_hash::{Blake2FieldHash, FieldHash};
