//! Blob identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an onboarded data blob. All audit state is keyed by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobId(String);

impl BlobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
