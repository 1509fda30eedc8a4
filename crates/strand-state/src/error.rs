//! Error types for state upgrades and hashing

use crate::version::SchemaVersion;

/// State upgrade failure
///
/// Every variant is fatal: a partially upgraded state is never returned.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    /// No transform links `from` to the next version
    #[error("{kind}: upgrade chain broken, no transform from {from} towards {current}")]
    ChainBroken {
        /// Resource kind
        kind: &'static str,
        /// First version without a transform
        from: SchemaVersion,
        /// Current version
        current: SchemaVersion,
    },

    /// Stored state was written by a newer release
    #[error("{kind}: stored state version {found} is newer than supported version {current}")]
    UnsupportedVersion {
        /// Resource kind
        kind: &'static str,
        /// Version found in storage
        found: SchemaVersion,
        /// Current version
        current: SchemaVersion,
    },

    /// Attributes do not match the shape of their version
    #[error("{kind}: cannot decode state at {version}: {source}")]
    Decode {
        /// Resource kind
        kind: &'static str,
        /// Version being decoded
        version: SchemaVersion,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Upgraded state cannot be re-encoded
    #[error("{kind}: cannot encode state at {version}: {source}")]
    Encode {
        /// Resource kind
        kind: &'static str,
        /// Version being encoded
        version: SchemaVersion,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// A new attribute could not be derived
    #[error("{kind}: upgrade from {from} failed to derive {attribute}: {source}")]
    Derive {
        /// Resource kind
        kind: &'static str,
        /// Version being upgraded from
        from: SchemaVersion,
        /// Attribute being derived
        attribute: &'static str,
        /// Underlying error
        #[source]
        source: HashError,
    },

    /// A transform altered the committed result
    #[error("{kind}: upgrade from {from} changed the stored result")]
    ResultChanged {
        /// Resource kind
        kind: &'static str,
        /// Version being upgraded from
        from: SchemaVersion,
    },
}

impl UpgradeError {
    /// Defects of the software itself, not of stored data
    #[inline]
    #[must_use]
    pub fn is_internal_defect(&self) -> bool {
        matches!(self, Self::ChainBroken { .. } | Self::ResultChanged { .. })
    }

    /// Resource kind concerned
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChainBroken { kind, .. }
            | Self::UnsupportedVersion { kind, .. }
            | Self::Decode { kind, .. }
            | Self::Encode { kind, .. }
            | Self::Derive { kind, .. }
            | Self::ResultChanged { kind, .. } => kind,
        }
    }
}

/// Failure inside a single transform, before kind and version are attached
#[derive(Debug, thiserror::Error)]
#[error("failed to derive {attribute}: {source}")]
pub struct DeriveError {
    /// Attribute being derived
    pub attribute: &'static str,

    /// Underlying error
    #[source]
    pub source: HashError,
}

impl DeriveError {
    /// Create derive error
    #[inline]
    #[must_use]
    pub fn new(attribute: &'static str, source: HashError) -> Self {
        Self { attribute, source }
    }
}

/// Password hashing failure
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Work factor outside bcrypt's range
    #[error("bcrypt cost {cost} outside {min}..={max}")]
    InvalidCost {
        /// Requested cost
        cost: u32,
        /// Lowest accepted cost
        min: u32,
        /// Highest accepted cost
        max: u32,
    },

    /// bcrypt itself failed
    #[error("bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}
