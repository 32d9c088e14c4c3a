//! Tag generation — per-block linear authenticators.

use crate::error::AuditError;
use pora_types::{AuditParams, DataBlob, FieldElement, ShapeError};
use serde::{Deserialize, Serialize};

/// The per-blob tag sequence: `sigma[i]` binds block `i` to the secret
/// exponent. Computed once per (blob, alpha) and immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub sigma: Vec<FieldElement>,
}

/// Computes `sigma[i] = Σ_{j=0}^{S-1} data[i][j]·alpha^(j+1)` in the
/// scalar field consumed by the companion circuit. Pure and deterministic.
pub struct TagGenerator {
    params: AuditParams,
}

impl TagGenerator {
    pub fn new(params: AuditParams) -> Self {
        Self { params }
    }

    pub fn generate(&self, blob: &DataBlob, alpha: FieldElement) -> Result<Metadata, AuditError> {
        if blob.row_count() != self.params.rows {
            return Err(ShapeError::new("data blob rows", self.params.rows, blob.row_count()).into());
        }

        let mut sigma = Vec::with_capacity(self.params.rows);
        for block in blob.blocks() {
            if block.len() != self.params.sectors {
                return Err(
                    ShapeError::new("data blob sectors", self.params.sectors, block.len()).into(),
                );
            }
            let mut acc = FieldElement::zero();
            let mut power = alpha; // alpha^(j+1), starting at j = 0
            for sector in block {
                acc += *sector * power;
                power *= alpha;
            }
            sigma.push(acc);
        }

        Ok(Metadata { sigma })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    fn small_params() -> AuditParams {
        AuditParams {
            rows: 2,
            sectors: 2,
            challenge_size: 1,
            coeff_domain: 100,
            gateway_deadline_secs: 30,
        }
    }

    #[test]
    fn reference_vector() {
        // D = [[1,2],[3,4]], alpha = 5:
        // sigma[0] = 1·5 + 2·25 = 55, sigma[1] = 3·5 + 4·25 = 115.
        let blob = DataBlob::new(vec![vec![fe(1), fe(2)], vec![fe(3), fe(4)]], 2, 2).unwrap();
        let metadata = TagGenerator::new(small_params())
            .generate(&blob, fe(5))
            .unwrap();
        assert_eq!(metadata.sigma, vec![fe(55), fe(115)]);
    }

    #[test]
    fn matches_manual_polynomial_evaluation() {
        let blob = DataBlob::new(
            vec![vec![fe(9), fe(0), fe(7)], vec![fe(2), fe(5), fe(1)]],
            2,
            3,
        )
        .unwrap();
        let alpha = fe(11);
        let params = AuditParams {
            rows: 2,
            sectors: 3,
            ..small_params()
        };
        let metadata = TagGenerator::new(params).generate(&blob, alpha).unwrap();

        for (i, block) in blob.blocks().enumerate() {
            let mut expected = FieldElement::zero();
            let mut power = alpha;
            for sector in block {
                expected += *sector * power;
                power *= alpha;
            }
            assert_eq!(metadata.sigma[i], expected);
        }
    }

    #[test]
    fn deterministic() {
        let blob = DataBlob::new(vec![vec![fe(1), fe(2)], vec![fe(3), fe(4)]], 2, 2).unwrap();
        let generator = TagGenerator::new(small_params());
        assert_eq!(
            generator.generate(&blob, fe(5)).unwrap(),
            generator.generate(&blob, fe(5)).unwrap()
        );
    }

    #[test]
    fn rejects_wrong_shape() {
        let blob = DataBlob::new(vec![vec![fe(1), fe(2)]], 1, 2).unwrap();
        let err = TagGenerator::new(small_params())
            .generate(&blob, fe(5))
            .unwrap_err();
        assert!(matches!(err, AuditError::Shape(_)));
    }
}
