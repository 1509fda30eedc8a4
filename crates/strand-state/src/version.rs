//! Schema version tags and the persisted-state envelope

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Monotonically increasing tag on persisted state, per resource kind
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// First version of every kind
    pub const INITIAL: Self = Self(0);

    /// Create version tag
    #[inline]
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Raw number
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following version
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for SchemaVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

/// Persisted state as written to storage
///
/// `attributes` is the JSON object of the kind's state struct at
/// `schema_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    /// Shape the attributes were written in
    pub schema_version: SchemaVersion,

    /// Attribute object
    pub attributes: serde_json::Value,
}

impl StoredState {
    /// Wrap raw attributes
    #[inline]
    #[must_use]
    pub fn new(schema_version: SchemaVersion, attributes: serde_json::Value) -> Self {
        Self {
            schema_version,
            attributes,
        }
    }

    /// Encode a typed state
    ///
    /// # Errors
    /// Returns error if the state cannot be represented as JSON
    pub fn encode<T: Serialize>(
        schema_version: SchemaVersion,
        state: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(schema_version, serde_json::to_value(state)?))
    }

    /// Parse the storage form
    ///
    /// # Errors
    /// Returns error on malformed JSON
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Storage form
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
