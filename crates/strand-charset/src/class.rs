//! Character class catalog
//!
//! Provides [`CharClass`] and [`CharacterClassCatalog`], the static alphabet
//! definitions that generated strings are drawn from.

use std::fmt::{self, Display, Formatter};

/// Default uppercase membership
pub const UPPER_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default lowercase membership
pub const LOWER_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Default numeric membership
pub const NUMERIC_CHARS: &str = "0123456789";

/// Default special membership (replaceable through `override_special`)
pub const SPECIAL_CHARS: &str = "!@#$%&*()-_=+[]{}<>:?";

/// One of the four alphabet subsets a generated string is composed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
    /// `A-Z`
    Upper,

    /// `a-z`
    Lower,

    /// `0-9`
    Numeric,

    /// Punctuation, or the caller's override set
    Special,
}

impl CharClass {
    /// All classes, in alphabet concatenation order
    pub const ALL: [CharClass; 4] = [Self::Upper, Self::Lower, Self::Numeric, Self::Special];

    /// Attribute-style name of the class
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Numeric => "numeric",
            Self::Special => "special",
        }
    }

    /// Name of the minimum-count attribute for this class
    #[inline]
    #[must_use]
    pub const fn min_field(self) -> &'static str {
        match self {
            Self::Upper => "min_upper",
            Self::Lower => "min_lower",
            Self::Numeric => "min_numeric",
            Self::Special => "min_special",
        }
    }

    /// Built-in membership string
    #[inline]
    #[must_use]
    pub const fn default_members(self) -> &'static str {
        match self {
            Self::Upper => UPPER_CHARS,
            Self::Lower => LOWER_CHARS,
            Self::Numeric => NUMERIC_CHARS,
            Self::Special => SPECIAL_CHARS,
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Upper => 0,
            Self::Lower => 1,
            Self::Numeric => 2,
            Self::Special => 3,
        }
    }
}

impl Display for CharClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved membership of every class for one generation
///
/// Members are held as `char`s so that a multi-byte override set is counted
/// and sampled per code point. Duplicates in an override are kept; they
/// weight the draw the same way they would in the configured string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterClassCatalog {
    members: [Vec<char>; 4],
}

impl CharacterClassCatalog {
    /// Catalog with the built-in memberships
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: CharClass::ALL.map(|class| class.default_members().chars().collect()),
        }
    }

    /// Replace the special class membership
    ///
    /// An empty override leaves the default special set in place.
    #[must_use]
    pub fn with_special_override(mut self, special: &str) -> Self {
        if !special.is_empty() {
            self.members[CharClass::Special.slot()] = special.chars().collect();
        }
        self
    }

    /// Members of one class
    #[inline]
    #[must_use]
    pub fn members(&self, class: CharClass) -> &[char] {
        &self.members[class.slot()]
    }

    /// Check whether `c` belongs to `class`
    #[inline]
    #[must_use]
    pub fn contains(&self, class: CharClass, c: char) -> bool {
        self.members(class).contains(&c)
    }

    /// Count the characters of `value` that belong to `class`
    #[must_use]
    pub fn count(&self, class: CharClass, value: &str) -> usize {
        value.chars().filter(|c| self.contains(class, *c)).count()
    }

    /// Concatenate the memberships of the selected classes
    #[must_use]
    pub fn alphabet(&self, include: impl Fn(CharClass) -> bool) -> Vec<char> {
        CharClass::ALL
            .into_iter()
            .filter(|class| include(*class))
            .flat_map(|class| self.members(class).iter().copied())
            .collect()
    }
}

impl Default for CharacterClassCatalog {
    fn default() -> Self {
        Self::new()
    }
}
