//! `random_integer` and `random_shuffle` persisted state (version 0, no steps)

use serde::{Deserialize, Serialize};
use strand_plan::Keepers;

use crate::chain::{GeneratedValue, UpgradeChain};
use crate::error::UpgradeError;
use crate::version::SchemaVersion;

/// Resource kind name
pub const INTEGER_KIND: &str = "random_integer";

/// Resource kind name
pub const SHUFFLE_KIND: &str = "random_shuffle";

/// Identifier of every shuffle
pub const SHUFFLE_ID: &str = "-";

/// `random_integer` state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerState {
    /// Identifier (decimal result)
    pub id: String,
    /// Replacement triggers
    #[serde(default)]
    pub keepers: Option<Keepers>,
    /// Lower bound, inclusive
    pub min: i64,
    /// Upper bound, inclusive
    pub max: i64,
    /// Seed, if the result is reproducible
    #[serde(default)]
    pub seed: Option<String>,
    /// Generated value
    pub result: i64,
}

impl GeneratedValue for IntegerState {
    type Output = i64;

    fn result(&self) -> &i64 {
        &self.result
    }
}

/// `random_shuffle` state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleState {
    /// Identifier
    pub id: String,
    /// Replacement triggers
    #[serde(default)]
    pub keepers: Option<Keepers>,
    /// Items to permute
    pub input: Vec<String>,
    /// Seed, if the result is reproducible
    #[serde(default)]
    pub seed: Option<String>,
    /// Requested result size
    #[serde(default)]
    pub result_count: Option<i64>,
    /// Generated value
    pub result: Vec<String>,
}

impl GeneratedValue for ShuffleState {
    type Output = Vec<String>;

    fn result(&self) -> &Vec<String> {
        &self.result
    }
}

/// Build the `random_integer` chain
///
/// # Errors
/// Never fails today; kept fallible like every chain constructor
pub fn integer_chain() -> Result<UpgradeChain, UpgradeError> {
    UpgradeChain::builder(INTEGER_KIND, SchemaVersion::INITIAL).build()
}

/// Build the `random_shuffle` chain
///
/// # Errors
/// Never fails today; kept fallible like every chain constructor
pub fn shuffle_chain() -> Result<UpgradeChain, UpgradeError> {
    UpgradeChain::builder(SHUFFLE_KIND, SchemaVersion::INITIAL).build()
}
