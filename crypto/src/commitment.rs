//! Commitments to data blocks and the secret exponent.

use crate::field_hash::FieldHash;
use pora_types::{DataBlob, FieldElement, ShapeError};

/// Commits to blob blocks (one digest per block) and to the secret exponent
/// alpha, delegating collision resistance to the wrapped [`FieldHash`].
pub struct CommitmentHasher<H> {
    hash: H,
    sectors: usize,
}

impl<H: FieldHash> CommitmentHasher<H> {
    /// `sectors` is S, the exact block length accepted by `commit_block`.
    pub fn new(hash: H, sectors: usize) -> Self {
        Self { hash, sectors }
    }

    /// Commitment of a single S-sector block.
    pub fn commit_block(&self, block: &[FieldElement]) -> Result<FieldElement, ShapeError> {
        if block.len() != self.sectors {
            return Err(ShapeError::new("block sectors", self.sectors, block.len()));
        }
        Ok(self.hash.hash(block))
    }

    /// Per-block commitments for a whole blob, in block order.
    pub fn commit_blob(&self, blob: &DataBlob) -> Result<Vec<FieldElement>, ShapeError> {
        blob.blocks().map(|block| self.commit_block(block)).collect()
    }

    /// Commitment of the secret exponent.
    pub fn commit_alpha(&self, alpha: FieldElement) -> FieldElement {
        self.hash.hash(&[alpha])
    }
}
