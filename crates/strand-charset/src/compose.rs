//! Constrained string composition
//!
//! Provides [`StringComposer`], which turns a [`GenerationSpec`] into a
//! [`GeneratedResult`] using an injected [`RandomSource`].

use std::fmt::{self, Display, Formatter};

use crate::class::CharClass;
use crate::error::GenerationError;
use crate::source::RandomSource;
use crate::spec::{GenerationSpec, ValidatedSpec};

/// A generated string
///
/// Immutable once produced; only ever replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedResult(String);

impl GeneratedResult {
    /// Borrow the value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the value
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in code points
    #[inline]
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl Display for GeneratedResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GeneratedResult {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Composes strings honouring per-class minimums
///
/// # Algorithm
/// 1. Draw each class's minimum from that class alone
/// 2. Fill the rest from the combined alphabet
/// 3. Give every character one random byte as a sort key and stable-sort
///
/// Step 3 destroys the positional information of step 1, so the guaranteed
/// characters are not clustered at the front.
#[derive(Debug)]
pub struct StringComposer<R> {
    source: R,
}

impl<R: RandomSource> StringComposer<R> {
    /// Create a composer drawing from `source`
    #[inline]
    #[must_use]
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Validate `spec` and compose
    ///
    /// # Errors
    /// - [`GenerationError::InvalidSpec`] if `spec` fails validation
    /// - [`GenerationError::RandomSource`] if the source fails
    pub fn compose(&mut self, spec: &GenerationSpec) -> Result<GeneratedResult, GenerationError> {
        let validated = spec.validate()?;
        self.compose_validated(&validated)
    }

    /// Compose from an already validated spec
    ///
    /// # Errors
    /// Returns [`GenerationError::RandomSource`] if the source fails
    pub fn compose_validated(
        &mut self,
        spec: &ValidatedSpec,
    ) -> Result<GeneratedResult, GenerationError> {
        let mut chars = Vec::with_capacity(spec.length());

        for class in CharClass::ALL {
            let min = spec.minimum(class);
            if min > 0 {
                self.draw(spec.catalog().members(class), min, &mut chars)?;
            }
        }

        let remaining = spec.length().saturating_sub(chars.len());
        self.draw(spec.alphabet(), remaining, &mut chars)?;
        self.shuffle(&mut chars)?;

        tracing::trace!(
            length = chars.len(),
            minimums = spec.minimum_total(),
            "composed string"
        );

        Ok(GeneratedResult(chars.into_iter().collect()))
    }

    /// Consume the composer and return its source
    #[inline]
    #[must_use]
    pub fn into_source(self) -> R {
        self.source
    }

    fn draw(
        &mut self,
        members: &[char],
        count: usize,
        out: &mut Vec<char>,
    ) -> Result<(), GenerationError> {
        for _ in 0..count {
            let i = self.source.index(members.len())?;
            out.push(members[i]);
        }
        Ok(())
    }

    fn shuffle(&mut self, chars: &mut Vec<char>) -> Result<(), GenerationError> {
        let mut keys = vec![0u8; chars.len()];
        self.source.fill_bytes(&mut keys)?;

        let mut keyed: Vec<(u8, char)> = keys.into_iter().zip(chars.drain(..)).collect();
        // stable: ties keep draw order
        keyed.sort_by_key(|(key, _)| *key);
        chars.extend(keyed.into_iter().map(|(_, c)| c));
        Ok(())
    }
}
