//! The field hash port and its Blake2b stand-in.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use pora_types::FieldElement;

type Blake2b256 = Blake2b<U32>;

/// Collision-resistant hash over field element vectors, producing a field
/// element digest.
///
/// Production deployments bind this to the same Poseidon instance the
/// companion circuits use; the protocol itself only relies on determinism
/// and collision resistance.
pub trait FieldHash: Send + Sync {
    fn hash(&self, input: &[FieldElement]) -> FieldElement;
}

/// Blake2b-256 stand-in: hashes the fixed-width big-endian encoding of each
/// element in sequence and reduces the digest into the field.
///
/// Not circuit-compatible — use only where the companion circuits are also
/// stubbed (tests, development).
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake2FieldHash;

impl FieldHash for Blake2FieldHash {
    fn hash(&self, input: &[FieldElement]) -> FieldElement {
        let mut hasher = Blake2b256::new();
        for element in input {
            hasher.update(element.to_bytes_be());
        }
        FieldElement::from_be_bytes_mod_order(&hasher.finalize())
    }
}
