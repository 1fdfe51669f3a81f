use crate::models::Shape;
use thiserror::Error;

/// Errors raised by kernel precondition checks.
///
/// Every check runs before a kernel writes any output, so an `Err` never
/// leaves a half-written destination behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Wrong pixel format, non-binary values, or a malformed buffer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A caller-sized destination does not have the required shape.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Shape the kernel needs.
        expected: Shape,
        /// Shape that was supplied.
        actual: Shape,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KernelError>;
