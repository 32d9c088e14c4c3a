//! Challenge seeds and deterministic challenge derivation.

use crate::stream::bounded_stream;
use pora_types::AuditParams;
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

/// A single-use pair of stream seeds, auditor-generated per audit round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSeed {
    /// Seed for the block index stream.
    pub index_seed: u64,
    /// Seed for the coefficient stream.
    pub coeff_seed: u64,
}

impl ChallengeSeed {
    pub fn new(index_seed: u64, coeff_seed: u64) -> Self {
        Self {
            index_seed,
            coeff_seed,
        }
    }

    /// Draw a fresh seed from the auditor's RNG.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self {
            index_seed: rng.random(),
            coeff_seed: rng.random(),
        }
    }

    /// Wire form: `[seed1, seed2]`.
    pub fn as_pair(&self) -> [u64; 2] {
        [self.index_seed, self.coeff_seed]
    }
}

impl From<[u64; 2]> for ChallengeSeed {
    fn from(pair: [u64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// The auditor's chosen subset: C block indices in `[0, R)` and C
/// coefficients in `[0, CoeffMax)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub indices: Vec<usize>,
    pub coefficients: Vec<u64>,
}

/// Derives challenges from seeds. Both sides of the protocol run this
/// independently and must agree exactly — see [`crate::stream`] for the
/// wire-contract generator.
pub struct ChallengeScheduler {
    params: AuditParams,
}

impl ChallengeScheduler {
    pub fn new(params: AuditParams) -> Self {
        Self { params }
    }

    pub fn derive(&self, seed: ChallengeSeed) -> Challenge {
        let indices = bounded_stream(
            seed.index_seed,
            self.params.challenge_size,
            self.params.rows as u64,
        )
        .into_iter()
        .map(|v| v as usize)
        .collect();

        let coefficients = bounded_stream(
            seed.coeff_seed,
            self.params.challenge_size,
            self.params.coeff_domain,
        );

        Challenge {
            indices,
            coefficients,
        }
    }
}
