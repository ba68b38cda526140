//! Cross-cutting error types for plateful.
//!
//! Domain-specific errors (`DatabaseError`, `MigrationError`, `TokenError`)
//! live in `plate-db`. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any plateful crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A string did not name a known variant.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
