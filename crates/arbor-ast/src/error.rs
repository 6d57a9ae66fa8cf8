//! Access error types

use thiserror::Error;

/// Index past the end of a node sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of bounds for node sequence of length {len}")]
pub struct OutOfBounds {
    pub index: usize,
    pub len: usize,
}
