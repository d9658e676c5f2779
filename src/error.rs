//! Error types for shadow rendering.

use thiserror::Error;

/// Errors surfaced by [`create_shadow`](crate::ShadowRenderer::create_shadow).
///
/// None of these are retried internally: a blur is deterministic, so retrying
/// cannot change the outcome. Recovery (e.g. falling back to an unblurred
/// image) is a caller-level decision.
#[derive(Debug, Error)]
pub enum Error {
    /// A shadow parameter or buffer dimension is out of range.
    ///
    /// Rejected before any buffer is allocated.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A caller-supplied destination buffer does not have the exact
    /// dimensions the render requires (`source + 2 * kernel radius` per axis).
    ///
    /// Rejected before convolution begins.
    #[error("destination is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    SizeMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// A worker task panicked during one of the convolution passes.
    ///
    /// The whole render fails; the destination buffer is discarded.
    #[error("shadow render worker panicked: {0}")]
    Worker(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
