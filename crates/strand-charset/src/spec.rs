//! Generation specs
//!
//! [`GenerationSpec`] is the user-facing description of a string to
//! generate. [`GenerationSpec::validate`] is the only way to obtain a
//! [`ValidatedSpec`], which the composer accepts.

use serde::{Deserialize, Serialize};

use crate::class::{CharClass, CharacterClassCatalog};
use crate::error::GenerationError;

/// Longest string that can be generated, in code points
pub const MAX_LENGTH: i64 = 1 << 20;

/// Inputs for one generated string
///
/// Integer fields are signed because they arrive from configuration as
/// 64-bit numbers; negative values are rejected by [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSpec {
    /// Total length in code points
    pub length: i64,
    /// Include `A-Z`
    pub upper: bool,
    /// Include `a-z`
    pub lower: bool,
    /// Include `0-9`
    pub numeric: bool,
    /// Include the special set
    pub special: bool,
    /// Minimum uppercase count
    pub min_upper: i64,
    /// Minimum lowercase count
    pub min_lower: i64,
    /// Minimum digit count
    pub min_numeric: i64,
    /// Minimum special count
    pub min_special: i64,
    /// Replacement for the special set; empty means "use the default"
    pub override_special: Option<String>,
}

impl GenerationSpec {
    /// Spec of `length` with every class enabled and no minimums
    #[inline]
    #[must_use]
    pub fn new(length: i64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Enable or disable a class
    #[inline]
    #[must_use]
    pub fn with_class(mut self, class: CharClass, include: bool) -> Self {
        match class {
            CharClass::Upper => self.upper = include,
            CharClass::Lower => self.lower = include,
            CharClass::Numeric => self.numeric = include,
            CharClass::Special => self.special = include,
        }
        self
    }

    /// Set the minimum count of a class
    #[inline]
    #[must_use]
    pub fn with_min(mut self, class: CharClass, min: i64) -> Self {
        match class {
            CharClass::Upper => self.min_upper = min,
            CharClass::Lower => self.min_lower = min,
            CharClass::Numeric => self.min_numeric = min,
            CharClass::Special => self.min_special = min,
        }
        self
    }

    /// Replace the special set
    #[inline]
    #[must_use]
    pub fn with_override_special(mut self, special: impl Into<String>) -> Self {
        self.override_special = Some(special.into());
        self
    }

    /// Whether a class is enabled
    #[inline]
    #[must_use]
    pub fn includes(&self, class: CharClass) -> bool {
        match class {
            CharClass::Upper => self.upper,
            CharClass::Lower => self.lower,
            CharClass::Numeric => self.numeric,
            CharClass::Special => self.special,
        }
    }

    /// Configured minimum of a class
    #[inline]
    #[must_use]
    pub fn minimum(&self, class: CharClass) -> i64 {
        match class {
            CharClass::Upper => self.min_upper,
            CharClass::Lower => self.min_lower,
            CharClass::Numeric => self.min_numeric,
            CharClass::Special => self.min_special,
        }
    }

    /// Catalog with this spec's special override applied
    #[must_use]
    pub fn catalog(&self) -> CharacterClassCatalog {
        let catalog = CharacterClassCatalog::new();
        match self.override_special.as_deref() {
            Some(special) => catalog.with_special_override(special),
            None => catalog,
        }
    }

    /// Check every invariant and produce a composable spec
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidSpec`] when:
    /// - `length` or any minimum is negative
    /// - `length` exceeds [`MAX_LENGTH`]
    /// - a minimum is positive for a class that is not enabled
    /// - the minimums add up to more than `length`
    /// - `length > 0` and no class is enabled
    pub fn validate(&self) -> Result<ValidatedSpec, GenerationError> {
        if self.length < 0 {
            return Err(GenerationError::invalid_spec(
                "length",
                format!("must be non-negative, got {}", self.length),
            ));
        }
        if self.length > MAX_LENGTH {
            return Err(GenerationError::invalid_spec(
                "length",
                format!("must be at most {MAX_LENGTH}, got {}", self.length),
            ));
        }

        let mut minimums = [0usize; 4];
        let mut total: i64 = 0;
        for class in CharClass::ALL {
            let min = self.minimum(class);
            if min < 0 {
                return Err(GenerationError::invalid_spec(
                    class.min_field(),
                    format!("must be non-negative, got {min}"),
                ));
            }
            if min > 0 && !self.includes(class) {
                return Err(GenerationError::invalid_spec(
                    class.min_field(),
                    format!("is {min} but {class} characters are not enabled"),
                ));
            }
            total = total.checked_add(min).ok_or_else(|| {
                GenerationError::invalid_spec(class.min_field(), "sum of minimums overflows")
            })?;
            minimums[class.slot()] = to_count(class.min_field(), min)?;
        }

        if total > self.length {
            return Err(GenerationError::invalid_spec(
                "length",
                format!(
                    "length ({}) is less than the sum of minimums ({total})",
                    self.length
                ),
            ));
        }

        let catalog = self.catalog();
        let alphabet = catalog.alphabet(|class| self.includes(class));
        if self.length > 0 && alphabet.is_empty() {
            return Err(GenerationError::invalid_spec(
                "length",
                "no character classes selected",
            ));
        }

        Ok(ValidatedSpec {
            length: to_count("length", self.length)?,
            minimums,
            catalog,
            alphabet,
        })
    }
}

impl Default for GenerationSpec {
    fn default() -> Self {
        Self {
            length: 0,
            upper: true,
            lower: true,
            numeric: true,
            special: true,
            min_upper: 0,
            min_lower: 0,
            min_numeric: 0,
            min_special: 0,
            override_special: None,
        }
    }
}

fn to_count(field: &'static str, value: i64) -> Result<usize, GenerationError> {
    usize::try_from(value)
        .map_err(|_| GenerationError::invalid_spec(field, format!("{value} is out of range")))
}

/// A spec that passed validation
///
/// Can only be produced by [`GenerationSpec::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    length: usize,
    minimums: [usize; 4],
    catalog: CharacterClassCatalog,
    alphabet: Vec<char>,
}

impl ValidatedSpec {
    /// Total length in code points
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Minimum count of a class
    #[inline]
    #[must_use]
    pub fn minimum(&self, class: CharClass) -> usize {
        self.minimums[class.slot()]
    }

    /// Sum of all minimums
    #[inline]
    #[must_use]
    pub fn minimum_total(&self) -> usize {
        self.minimums.iter().sum()
    }

    /// Resolved class memberships
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &CharacterClassCatalog {
        &self.catalog
    }

    /// Combined alphabet of the enabled classes
    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}
