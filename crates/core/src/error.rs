//! Error types raised synchronously by lifecycle operations.

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by validation and lifecycle rules.
///
/// Both kinds are local to a single operation; the entity they were raised
/// for is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed input (empty description, reversed time range, ...)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Operation is illegal in the entity's current lifecycle state
    #[error("invalid state: {0}")]
    InvalidState(String),
}
