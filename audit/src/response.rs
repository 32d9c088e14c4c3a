//! Response aggregation — the provider's answer to a challenge.

use crate::challenge::Challenge;
use crate::error::AuditError;
use crate::tag::Metadata;
use pora_types::{AuditParams, DataBlob, FieldElement, ShapeError};
use serde::{Deserialize, Serialize};

/// Aggregated possession response: `miu[j] = Σ_k coeff[k]·data[idx[k]][j]`
/// and `tau = Σ_k coeff[k]·sigma[idx[k]]`, all in the scalar field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub miu: Vec<FieldElement>,
    pub tau: FieldElement,
}

/// Pure, deterministic aggregation of challenged blocks.
pub struct ResponseComputer {
    params: AuditParams,
}

impl ResponseComputer {
    pub fn new(params: AuditParams) -> Self {
        Self { params }
    }

    /// Provider-side: aggregate the blob and tags into (Miu, Tau).
    pub fn compute(
        &self,
        blob: &DataBlob,
        metadata: &Metadata,
        challenge: &Challenge,
    ) -> Result<Response, AuditError> {
        if blob.row_count() != self.params.rows {
            return Err(
                ShapeError::new("data blob rows", self.params.rows, blob.row_count()).into(),
            );
        }
        self.check_sigma_len(metadata)?;

        let mut miu = vec![FieldElement::zero(); self.params.sectors];
        let mut tau = FieldElement::zero();

        for (&index, &coeff) in challenge.indices.iter().zip(&challenge.coefficients) {
            let block = blob.block(index).ok_or(AuditError::IndexOutOfRange {
                index,
                rows: blob.row_count(),
            })?;
            let coeff = FieldElement::from_u64(coeff);
            for (j, sector) in block.iter().enumerate() {
                miu[j] += coeff * *sector;
            }
            tau += coeff * metadata.sigma[index];
        }

        Ok(Response { miu, tau })
    }

    /// Auditor-side: recompute Tau from stored tags alone — the blob never
    /// leaves the provider.
    pub fn expected_tau(
        &self,
        metadata: &Metadata,
        challenge: &Challenge,
    ) -> Result<FieldElement, AuditError> {
        self.check_sigma_len(metadata)?;

        let mut tau = FieldElement::zero();
        for (&index, &coeff) in challenge.indices.iter().zip(&challenge.coefficients) {
            let sigma = metadata
                .sigma
                .get(index)
                .ok_or(AuditError::IndexOutOfRange {
                    index,
                    rows: metadata.sigma.len(),
                })?;
            tau += FieldElement::from_u64(coeff) * *sigma;
        }
        Ok(tau)
    }

    fn check_sigma_len(&self, metadata: &Metadata) -> Result<(), AuditError> {
        if metadata.sigma.len() != self.params.rows {
            return Err(
                ShapeError::new("metadata sigma", self.params.rows, metadata.sigma.len()).into(),
            );
        }
        Ok(())
    }
}
