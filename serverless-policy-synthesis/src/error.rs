//! Error types for policy synthesis

use thiserror::Error;

/// Errors surfaced by the synthesis library.
///
/// Plain [`synthesize`](crate::synthesize) is total and never fails. These
/// variants come from the opt-in validated path and from rendering.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// An identity field was rejected by [`IdentityContext::validate`](crate::IdentityContext::validate).
    #[error("Invalid identity context: {field} {reason}")]
    InvalidIdentityContext {
        /// Name of the offending field
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// The policy document could not be serialized.
    #[error("Failed to serialize policy document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SynthesisError {
    pub(crate) fn invalid_identity(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentityContext {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type SynthesisResult<T> = Result<T, SynthesisError>;
