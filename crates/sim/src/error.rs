//! Error types for field allocation and session construction.

use thiserror::Error;

/// Errors raised when allocating a simulation field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A field must span at least one texel in each direction.
    #[error("field extent must be non-zero (got {width}x{height})")]
    ZeroExtent { width: usize, height: usize },

    /// Fields store 1 (scalar), 2 (vector) or 4 (color/particle) channels.
    #[error("unsupported channel count {0} (expected 1, 2, or 4)")]
    UnsupportedChannels(usize),
}

/// Errors raised while constructing a [`crate::FluidSession`].
///
/// Construction either succeeds completely or returns an error; no partial
/// session is ever handed to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to allocate simulation fields: {0}")]
    Allocation(#[from] FieldError),

    #[error("display extent must be non-zero (got {width}x{height})")]
    ZeroDisplay { width: usize, height: usize },
}
