//! Error types for Strand Core
//!
//! Aggregates the per-crate errors:
//! - generation failures (invalid spec, random source)
//! - plan rejection (diagnostics)
//! - state upgrade failures
//! - import parsing and configuration errors

use strand_charset::GenerationError;
use strand_plan::PlanError;
use strand_state::{HashError, UpgradeError};

/// Main Strand error type
#[derive(Debug, thiserror::Error)]
pub enum StrandError {
    /// Value generation failed
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Planning rejected the configuration
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Stored state could not be upgraded
    #[error("state upgrade failed: {0}")]
    Upgrade(#[from] UpgradeError),

    /// Password hashing failed
    #[error("hashing failed: {0}")]
    Hash(#[from] HashError),

    /// Import identifier could not be interpreted
    #[error("{kind}: cannot import: {reason}")]
    Import {
        /// Resource kind
        kind: &'static str,
        /// What is wrong with the identifier
        reason: String,
    },

    /// A plan could not be applied as given
    #[error("{kind}: cannot apply plan: {reason}")]
    Apply {
        /// Resource kind
        kind: &'static str,
        /// Why
        reason: String,
    },

    /// Invalid provider configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl StrandError {
    /// Create import error
    #[inline]
    pub fn import(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Import {
            kind,
            reason: reason.into(),
        }
    }

    /// Create apply error
    #[inline]
    pub fn apply(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Apply {
            kind,
            reason: reason.into(),
        }
    }

    /// Caused by user input; correcting configuration fixes it
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Generation(err) => err.is_user_error(),
            Self::Plan(_) | Self::Import { .. } | Self::Config(_) => true,
            Self::Upgrade(_) | Self::Hash(_) | Self::Apply { .. } => false,
        }
    }

    /// Defect of the software itself
    #[inline]
    #[must_use]
    pub fn is_internal_defect(&self) -> bool {
        matches!(self, Self::Upgrade(err) if err.is_internal_defect())
    }

    /// Whether the core would retry (it never does; callers decide)
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}
