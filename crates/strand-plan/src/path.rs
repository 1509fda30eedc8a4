//! Attribute paths for diagnostics

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Dotted path of an attribute within a resource (`keepers.rotation`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributePath(String);

impl AttributePath {
    /// Top-level attribute
    #[inline]
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Nested attribute or map key
    #[inline]
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// Path as a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AttributePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttributePath {
    fn from(value: &str) -> Self {
        Self::root(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_paths() {
        let keepers = AttributePath::root("keepers");
        assert_eq!(keepers.child("rotation").to_string(), "keepers.rotation");
        assert_eq!(AttributePath::from("length").as_str(), "length");
    }
}
