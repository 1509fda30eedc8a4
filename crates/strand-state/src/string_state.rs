//! `random_string` persisted state, versions 0 to 2
//!
//! | version | change |
//! |---------|--------|
//! | v0 | initial shape |
//! | v1 | adds `min_numeric`, `min_upper`, `min_lower`, `min_special` (0) |
//! | v2 | adds `numeric`, copied from `number` |

use serde::{Deserialize, Serialize};
use strand_plan::Keepers;

use crate::chain::{GeneratedValue, UpgradeChain, UpgradeStep};
use crate::error::UpgradeError;
use crate::version::SchemaVersion;

/// Resource kind name
pub const STRING_KIND: &str = "random_string";

/// Current `random_string` schema version
pub const STRING_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(2);

/// Current `random_string` state
pub type StringState = StringStateV2;

/// `random_string` state at v0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStateV0 {
    /// Identifier (the result)
    pub id: String,
    /// Replacement triggers
    #[serde(default)]
    pub keepers: Option<Keepers>,
    /// Result length
    pub length: i64,
    /// Include special characters
    pub special: bool,
    /// Include uppercase
    pub upper: bool,
    /// Include lowercase
    pub lower: bool,
    /// Include digits
    pub number: bool,
    /// Replacement special set
    #[serde(default)]
    pub override_special: Option<String>,
    /// Generated value
    pub result: String,
}

/// `random_string` state at v1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStateV1 {
    /// Identifier (the result)
    pub id: String,
    /// Replacement triggers
    #[serde(default)]
    pub keepers: Option<Keepers>,
    /// Result length
    pub length: i64,
    /// Include special characters
    pub special: bool,
    /// Include uppercase
    pub upper: bool,
    /// Include lowercase
    pub lower: bool,
    /// Include digits
    pub number: bool,
    /// Minimum digits
    pub min_numeric: i64,
    /// Minimum uppercase
    pub min_upper: i64,
    /// Minimum lowercase
    pub min_lower: i64,
    /// Minimum special characters
    pub min_special: i64,
    /// Replacement special set
    #[serde(default)]
    pub override_special: Option<String>,
    /// Generated value
    pub result: String,
}

/// `random_string` state at v2 (current)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringStateV2 {
    /// Identifier (the result)
    pub id: String,
    /// Replacement triggers
    #[serde(default)]
    pub keepers: Option<Keepers>,
    /// Result length
    pub length: i64,
    /// Include special characters
    pub special: bool,
    /// Include uppercase
    pub upper: bool,
    /// Include lowercase
    pub lower: bool,
    /// Include digits (deprecated alias of `numeric`)
    pub number: bool,
    /// Include digits
    pub numeric: bool,
    /// Minimum digits
    pub min_numeric: i64,
    /// Minimum uppercase
    pub min_upper: i64,
    /// Minimum lowercase
    pub min_lower: i64,
    /// Minimum special characters
    pub min_special: i64,
    /// Replacement special set
    #[serde(default)]
    pub override_special: Option<String>,
    /// Generated value
    pub result: String,
}

macro_rules! generated_string {
    ($($ty:ty),*) => {
        $(impl GeneratedValue for $ty {
            type Output = String;

            fn result(&self) -> &String {
                &self.result
            }
        })*
    };
}

generated_string!(StringStateV0, StringStateV1, StringStateV2);

/// v0 → v1: no minimums
#[must_use]
pub fn string_v0_to_v1(old: StringStateV0) -> StringStateV1 {
    StringStateV1 {
        id: old.id,
        keepers: old.keepers,
        length: old.length,
        special: old.special,
        upper: old.upper,
        lower: old.lower,
        number: old.number,
        min_numeric: 0,
        min_upper: 0,
        min_lower: 0,
        min_special: 0,
        override_special: old.override_special,
        result: old.result,
    }
}

/// v1 → v2: `numeric` mirrors `number`
#[must_use]
pub fn string_v1_to_v2(old: StringStateV1) -> StringStateV2 {
    StringStateV2 {
        id: old.id,
        keepers: old.keepers,
        length: old.length,
        special: old.special,
        upper: old.upper,
        lower: old.lower,
        number: old.number,
        numeric: old.number,
        min_numeric: old.min_numeric,
        min_upper: old.min_upper,
        min_lower: old.min_lower,
        min_special: old.min_special,
        override_special: old.override_special,
        result: old.result,
    }
}

/// Build the `random_string` upgrade chain
///
/// # Errors
/// Returns [`UpgradeError::ChainBroken`] if a link is missing
pub fn string_chain() -> Result<UpgradeChain, UpgradeError> {
    UpgradeChain::builder(STRING_KIND, STRING_SCHEMA_VERSION)
        .step(UpgradeStep::typed(SchemaVersion::new(0), |old: StringStateV0| {
            Ok(string_v0_to_v1(old))
        }))
        .step(UpgradeStep::typed(SchemaVersion::new(1), |old: StringStateV1| {
            Ok(string_v1_to_v2(old))
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v0() -> StringStateV0 {
        StringStateV0 {
            id: "aB3$xY".to_string(),
            keepers: None,
            length: 6,
            special: true,
            upper: true,
            lower: true,
            number: false,
            override_special: Some(String::new()),
            result: "aB3$xY".to_string(),
        }
    }

    #[test]
    fn v0_to_v1_adds_zero_minimums() {
        let v1 = string_v0_to_v1(v0());
        assert_eq!(
            (v1.min_numeric, v1.min_upper, v1.min_lower, v1.min_special),
            (0, 0, 0, 0)
        );
        assert_eq!(v1.result, "aB3$xY");
        assert_eq!(v1.override_special.as_deref(), Some(""));
    }

    #[test]
    fn v1_to_v2_copies_number() {
        let v2 = string_v1_to_v2(string_v0_to_v1(v0()));
        assert!(!v2.number);
        assert!(!v2.numeric);
        assert_eq!(v2.result, "aB3$xY");
        assert_eq!(v2.id, "aB3$xY");
    }

    #[test]
    fn chain_upgrades_legacy_json() {
        let chain = string_chain().unwrap();
        let legacy = json!({
            "id": "abc",
            "keepers": {"k": "v"},
            "length": 3,
            "special": false,
            "upper": false,
            "lower": true,
            "number": true,
            "override_special": null,
            "result": "abc"
        });
        let state: StringState = chain
            .read(crate::StoredState::new(SchemaVersion::INITIAL, legacy))
            .unwrap();
        assert_eq!(state.result, "abc");
        assert!(state.numeric);
        assert_eq!(state.min_lower, 0);
        assert_eq!(
            state.keepers.unwrap().get("k"),
            Some(&Some("v".to_string()))
        );
    }
}
