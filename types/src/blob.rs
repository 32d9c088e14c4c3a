//! The data blob — an R×S matrix of field elements.

use crate::error::ShapeError;
use crate::field::FieldElement;
use serde::{Deserialize, Serialize};

/// An ordered matrix of R blocks, each split into S sectors.
///
/// Immutable once committed: the constructor validates the shape and no
/// mutating accessors exist. Replacing a blob means re-onboarding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBlob {
    rows: Vec<Vec<FieldElement>>,
}

impl DataBlob {
    /// Build a blob from raw rows, validating the R×S shape.
    pub fn new(
        rows: Vec<Vec<FieldElement>>,
        expected_rows: usize,
        expected_sectors: usize,
    ) -> Result<Self, ShapeError> {
        if rows.len() != expected_rows {
            return Err(ShapeError::new("data blob rows", expected_rows, rows.len()));
        }
        for row in &rows {
            if row.len() != expected_sectors {
                return Err(ShapeError::new(
                    "data blob sectors",
                    expected_sectors,
                    row.len(),
                ));
            }
        }
        Ok(Self { rows })
    }

    /// The sectors of block `index`, or `None` past the last block.
    pub fn block(&self, index: usize) -> Option<&[FieldElement]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &[FieldElement]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sector_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}
