//! Strand Core - stable generated values for declarative state
//!
//! Each resource produces a random value once and keeps it until one of its
//! replacement-triggering inputs changes:
//! - `random_string` / `random_password`: composed strings with per-class
//!   minimums (passwords also store a bcrypt hash)
//! - `random_integer`: uniform integer in an inclusive range
//! - `random_shuffle`: permutation of a list
//!
//! Persisted state carries a schema version and is upgraded on read.
//!
//! # Example
//!
//! ```rust
//! use strand_charset::{CharClass, SeededRandomSource};
//! use strand_core::{converge, Provider, StrandConfig, StringInputs};
//! use strand_plan::PlanAction;
//!
//! # fn main() -> Result<(), strand_core::StrandError> {
//! let provider = Provider::new(StrandConfig::new())?;
//! let config = StringInputs::new(16).with_min(CharClass::Special, 2);
//! let mut source = SeededRandomSource::from_u64(7);
//!
//! let (action, state) = converge(provider.string(), Some(&config), None, &mut source)?;
//! assert_eq!(action, PlanAction::Create);
//! let state = state.expect("created");
//!
//! // Same configuration again: the value is kept
//! let (action, next) = converge(provider.string(), Some(&config), Some(&state), &mut source)?;
//! assert_eq!(action, PlanAction::Update);
//! assert_eq!(next.expect("kept").result, state.result);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resource;
pub mod resources;

pub use config::{LogConfig, StrandConfig};
pub use error::StrandError;
pub use logging::init_tracing;
pub use provider::Provider;
pub use resource::{converge, ResourceKind};
pub use resources::{
    IntegerInputs, IntegerPlan, PasswordPlan, RandomInteger, RandomPassword, RandomShuffle,
    RandomString, ShuffleInputs, ShufflePlan, StringInputs, StringPlan, MAX_RESULT_COUNT,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Strand Core
    pub use crate::{
        converge, IntegerInputs, Provider, ResourceKind, ShuffleInputs, StrandConfig,
        StrandError, StringInputs,
    };
    pub use strand_charset::{CharClass, OsRandomSource, RandomSource, SeededRandomSource};
    pub use strand_plan::{AttrValue, Keepers, PlanAction};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
