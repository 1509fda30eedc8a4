//! Error types for string generation

/// Errors raised while validating a spec or composing a string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// A length, minimum or alphabet constraint is violated
    #[error("invalid generation spec: {field}: {reason}")]
    InvalidSpec {
        /// Offending attribute
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// The randomness source could not deliver
    #[error("random source failure: {0}")]
    RandomSource(#[from] RandomSourceError),
}

impl GenerationError {
    /// Create an invalid spec error
    #[inline]
    #[must_use]
    pub fn invalid_spec(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            field,
            reason: reason.into(),
        }
    }

    /// Check if the caller can fix this by changing configuration
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidSpec { .. })
    }
}

/// Failures of a [`RandomSource`](crate::RandomSource)
///
/// These are always fatal for the current generation. Nothing in this
/// workspace retries them or falls back to another source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RandomSourceError {
    /// The platform source refused the request
    #[error("random source unavailable: {0}")]
    Unavailable(String),

    /// Fewer bytes were produced than requested
    #[error("short read from random source: requested {requested} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested
        requested: usize,
        /// Bytes delivered
        actual: usize,
    },

    /// Sampling from `[0, 0)` was requested
    #[error("cannot sample an index from an empty range")]
    EmptyRange,
}
