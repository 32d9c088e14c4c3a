use thiserror::Error;

/// Malformed dimensions — fatal to the round that submitted the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {what}: expected {expected} elements, found {found}")]
pub struct ShapeError {
    /// Which structure failed the dimension check.
    pub what: &'static str,
    pub expected: usize,
    pub found: usize,
}

impl ShapeError {
    pub fn new(what: &'static str, expected: usize, found: usize) -> Self {
        Self {
            what,
            expected,
            found,
        }
    }
}
