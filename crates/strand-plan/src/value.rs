//! Attribute values as seen at plan time

use std::collections::BTreeMap;

/// Keepers: arbitrary keys coupled to a resource's replacement lifecycle
///
/// Values may be null. Ordering carries no meaning; a `BTreeMap` only keeps
/// serialisation stable.
pub type Keepers = BTreeMap<String, Option<String>>;

/// One attribute value during planning
///
/// Configuration can leave an attribute unset ([`Null`](Self::Null)) or
/// depend on something not yet known ([`Unknown`](Self::Unknown)).
/// Persisted state never holds `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue<T> {
    /// Not set
    Null,

    /// Set, but only known after apply
    Unknown,

    /// Set and known
    Known(T),
}

impl<T> AttrValue<T> {
    /// Wrap a known value
    #[inline]
    #[must_use]
    pub fn known(value: T) -> Self {
        Self::Known(value)
    }

    /// Check for [`AttrValue::Null`]
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for [`AttrValue::Unknown`]
    #[inline]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Check for [`AttrValue::Known`]
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the known value
    #[inline]
    #[must_use]
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Take the known value
    #[inline]
    #[must_use]
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Borrowing view
    #[inline]
    #[must_use]
    pub fn as_ref(&self) -> AttrValue<&T> {
        match self {
            Self::Null => AttrValue::Null,
            Self::Unknown => AttrValue::Unknown,
            Self::Known(value) => AttrValue::Known(value),
        }
    }

    /// Map the known value
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AttrValue<U> {
        match self {
            Self::Null => AttrValue::Null,
            Self::Unknown => AttrValue::Unknown,
            Self::Known(value) => AttrValue::Known(f(value)),
        }
    }
}

impl<T> Default for AttrValue<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> From<Option<T>> for AttrValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_option() {
        assert_eq!(AttrValue::from(Some(3)), AttrValue::Known(3));
        assert_eq!(AttrValue::<i32>::from(None), AttrValue::Null);
    }

    #[test]
    fn predicates() {
        assert!(AttrValue::<bool>::Null.is_null());
        assert!(AttrValue::<bool>::Unknown.is_unknown());
        assert!(AttrValue::known(true).is_known());
        assert_eq!(AttrValue::<bool>::default(), AttrValue::Null);
    }

    #[test]
    fn map_preserves_state() {
        assert_eq!(AttrValue::known(2).map(|v| v * 2), AttrValue::Known(4));
        assert_eq!(AttrValue::<i32>::Unknown.map(|v| v * 2), AttrValue::Unknown);
        assert_eq!(AttrValue::known("x".to_string()).into_known().as_deref(), Some("x"));
    }
}
