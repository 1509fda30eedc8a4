//! Strand Character Sets
//!
//! Character classes, randomness sources and constrained string composition.
//!
//! # Core Concepts
//!
//! - [`CharClass`] / [`CharacterClassCatalog`]: the four alphabets and their
//!   memberships, with an overridable special set
//! - [`GenerationSpec`]: length, per-class toggles and minimum counts
//! - [`ValidatedSpec`]: proof that a spec satisfies its invariants
//! - [`StringComposer`]: produces a [`GeneratedResult`] from a validated spec
//! - [`RandomSource`]: injected randomness ([`OsRandomSource`] in production)
//!
//! # Example
//!
//! ```rust
//! use strand_charset::{CharClass, GenerationSpec, OsRandomSource, StringComposer};
//!
//! let spec = GenerationSpec::new(16).with_min(CharClass::Numeric, 2);
//! let result = StringComposer::new(OsRandomSource::new()).compose(&spec).unwrap();
//! assert_eq!(result.char_count(), 16);
//! ```

#![warn(unreachable_pub)]

mod class;
mod compose;
mod error;
mod source;
mod spec;

// Re-exports
pub use class::{
    CharClass, CharacterClassCatalog, LOWER_CHARS, NUMERIC_CHARS, SPECIAL_CHARS, UPPER_CHARS,
};
pub use compose::{GeneratedResult, StringComposer};
pub use error::{GenerationError, RandomSourceError};
pub use source::{OsRandomSource, RandomSource, ReaderRandomSource, SeededRandomSource};
pub use spec::{GenerationSpec, ValidatedSpec, MAX_LENGTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
