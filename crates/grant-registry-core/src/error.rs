//! Error types for the Grant Registry core.

use thiserror::Error;

/// Core errors that can occur when decoding registry primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
