//! Strand State
//!
//! Versioned persisted state for generated resources, and the upgrade chains
//! that bring older state into the current shape.
//!
//! # Core Concepts
//!
//! - [`SchemaVersion`]: per-kind shape tag stored next to the attributes
//! - [`StoredState`]: the storage envelope
//! - [`UpgradeChain`]: one typed `N → N+1` [`UpgradeStep`] per version
//!   boundary, validated unbroken when built
//! - Upgrading never changes the committed `result`
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use strand_state::{string_chain, SchemaVersion, StoredState, StringState};
//!
//! let chain = string_chain().unwrap();
//! let legacy = StoredState::new(
//!     SchemaVersion::new(0),
//!     json!({
//!         "id": "xyz", "length": 3, "special": false, "upper": false,
//!         "lower": true, "number": false, "result": "xyz"
//!     }),
//! );
//! let state: StringState = chain.read(legacy).unwrap();
//! assert_eq!(state.result, "xyz");
//! assert!(!state.numeric);
//! ```

#![warn(unreachable_pub)]

mod chain;
mod error;
mod hash;
mod password_state;
mod simple_state;
mod string_state;
mod version;

// Re-exports
pub use chain::{GeneratedValue, UpgradeChain, UpgradeChainBuilder, UpgradeStep};
pub use error::{DeriveError, HashError, UpgradeError};
pub use hash::{BcryptHasher, DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
pub use password_state::{
    password_chain, password_v0_to_v1, password_v1_to_v2, password_v2_to_v3, PasswordState,
    PasswordStateV0, PasswordStateV1, PasswordStateV2, PasswordStateV3, PASSWORD_ID,
    PASSWORD_KIND, PASSWORD_SCHEMA_VERSION,
};
pub use simple_state::{
    integer_chain, shuffle_chain, IntegerState, ShuffleState, INTEGER_KIND, SHUFFLE_ID,
    SHUFFLE_KIND,
};
pub use string_state::{
    string_chain, string_v0_to_v1, string_v1_to_v2, StringState, StringStateV0, StringStateV1,
    StringStateV2, STRING_KIND, STRING_SCHEMA_VERSION,
};
pub use version::{SchemaVersion, StoredState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
