//! `random_password` persisted state, versions 0 to 3
//!
//! | version | change |
//! |---------|--------|
//! | v0 | initial shape (minimums already present) |
//! | v1 | adds `bcrypt_hash`, derived from `result` |
//! | v2 | adds `numeric`, copied from `number` |
//! | v3 | same shape; `bcrypt_hash` re-derived if it does not match `result` |

use serde::{Deserialize, Serialize};
use strand_plan::Keepers;

use crate::chain::{GeneratedValue, UpgradeChain, UpgradeStep};
use crate::error::{DeriveError, UpgradeError};
use crate::hash::BcryptHasher;
use crate::version::SchemaVersion;

/// Resource kind name
pub const PASSWORD_KIND: &str = "random_password";

/// Current `random_password` schema version
pub const PASSWORD_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(3);

/// Identifier of every password (the value itself is never used as id)
pub const PASSWORD_ID: &str = "none";

const BCRYPT_HASH: &str = "bcrypt_hash";

/// `random_password` state at v0
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStateV0 {
    /// Identifier
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
    /// Generated value (sensitive)
    pub result: String,
}

/// `random_password` state at v1
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStateV1 {
    /// Identifier
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
    /// bcrypt hash of `result` (sensitive)
    pub bcrypt_hash: String,
    /// Generated value (sensitive)
    pub result: String,
}

/// `random_password` state at v2, also the v3 shape
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStateV2 {
    /// Identifier
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
    /// bcrypt hash of `result` (sensitive)
    pub bcrypt_hash: String,
    /// Generated value (sensitive)
    pub result: String,
}

/// `random_password` state at v3 (current)
pub type PasswordStateV3 = PasswordStateV2;

/// Current `random_password` state
pub type PasswordState = PasswordStateV3;

macro_rules! password_state_impls {
    ($($ty:ty),*) => {
        $(impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("id", &self.id)
                    .field("length", &self.length)
                    .field("result", &"<sensitive>")
                    .finish_non_exhaustive()
            }
        }

        impl GeneratedValue for $ty {
            type Output = String;

            fn result(&self) -> &String {
                &self.result
            }
        })*
    };
}

password_state_impls!(PasswordStateV0, PasswordStateV1, PasswordStateV2);

/// v0 → v1: hash the stored result
///
/// # Errors
/// Returns [`DeriveError`] if hashing fails
pub fn password_v0_to_v1(
    old: PasswordStateV0,
    hasher: &BcryptHasher,
) -> Result<PasswordStateV1, DeriveError> {
    let bcrypt_hash = hasher
        .hash(&old.result)
        .map_err(|err| DeriveError::new(BCRYPT_HASH, err))?;
    Ok(PasswordStateV1 {
        id: old.id,
        keepers: old.keepers,
        length: old.length,
        special: old.special,
        upper: old.upper,
        lower: old.lower,
        number: old.number,
        min_numeric: old.min_numeric,
        min_upper: old.min_upper,
        min_lower: old.min_lower,
        min_special: old.min_special,
        override_special: old.override_special,
        bcrypt_hash,
        result: old.result,
    })
}

/// v1 → v2: `numeric` mirrors `number`
#[must_use]
pub fn password_v1_to_v2(old: PasswordStateV1) -> PasswordStateV2 {
    PasswordStateV2 {
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
        bcrypt_hash: old.bcrypt_hash,
        result: old.result,
    }
}

/// v2 → v3: repair a hash that does not match the result
///
/// # Errors
/// Returns [`DeriveError`] if re-hashing fails
pub fn password_v2_to_v3(
    mut old: PasswordStateV2,
    hasher: &BcryptHasher,
) -> Result<PasswordStateV3, DeriveError> {
    if !hasher.verify(&old.result, &old.bcrypt_hash) {
        tracing::warn!(kind = PASSWORD_KIND, "stored bcrypt_hash does not match result, re-deriving");
        old.bcrypt_hash = hasher
            .hash(&old.result)
            .map_err(|err| DeriveError::new(BCRYPT_HASH, err))?;
    }
    Ok(old)
}

/// Build the `random_password` upgrade chain
///
/// # Errors
/// Returns [`UpgradeError::ChainBroken`] if a link is missing
pub fn password_chain(hasher: BcryptHasher) -> Result<UpgradeChain, UpgradeError> {
    UpgradeChain::builder(PASSWORD_KIND, PASSWORD_SCHEMA_VERSION)
        .step(UpgradeStep::typed(SchemaVersion::new(0), move |old: PasswordStateV0| {
            password_v0_to_v1(old, &hasher)
        }))
        .step(UpgradeStep::typed(SchemaVersion::new(1), |old: PasswordStateV1| {
            Ok(password_v1_to_v2(old))
        }))
        .step(UpgradeStep::typed(SchemaVersion::new(2), move |old: PasswordStateV2| {
            password_v2_to_v3(old, &hasher)
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::MIN_BCRYPT_COST;

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(MIN_BCRYPT_COST).unwrap()
    }

    fn v0() -> PasswordStateV0 {
        PasswordStateV0 {
            id: PASSWORD_ID.to_string(),
            keepers: None,
            length: 8,
            special: true,
            upper: true,
            lower: true,
            number: true,
            min_numeric: 1,
            min_upper: 0,
            min_lower: 0,
            min_special: 0,
            override_special: None,
            result: "p4ss!Wrd".to_string(),
        }
    }

    #[test]
    fn v0_to_v1_derives_hash_from_result() {
        let v1 = password_v0_to_v1(v0(), &hasher()).unwrap();
        assert!(hasher().verify("p4ss!Wrd", &v1.bcrypt_hash));
        assert_eq!(v1.result, "p4ss!Wrd");
        assert_eq!(v1.min_numeric, 1);
    }

    #[test]
    fn v1_to_v2_copies_number() {
        let v1 = password_v0_to_v1(v0(), &hasher()).unwrap();
        let hash = v1.bcrypt_hash.clone();
        let v2 = password_v1_to_v2(v1);
        assert!(v2.numeric);
        assert_eq!(v2.bcrypt_hash, hash);
    }

    #[test]
    fn v2_to_v3_keeps_matching_hash() {
        let v2 = password_v1_to_v2(password_v0_to_v1(v0(), &hasher()).unwrap());
        let hash = v2.bcrypt_hash.clone();
        let v3 = password_v2_to_v3(v2, &hasher()).unwrap();
        assert_eq!(v3.bcrypt_hash, hash);
    }

    #[test]
    fn v2_to_v3_repairs_wrong_hash() {
        let mut v2 = password_v1_to_v2(password_v0_to_v1(v0(), &hasher()).unwrap());
        v2.bcrypt_hash = hasher().hash("something else").unwrap();
        let v3 = password_v2_to_v3(v2, &hasher()).unwrap();
        assert!(hasher().verify("p4ss!Wrd", &v3.bcrypt_hash));
        assert_eq!(v3.result, "p4ss!Wrd");
    }

    #[test]
    fn debug_hides_secret() {
        let text = format!("{:?}", v0());
        assert!(!text.contains("p4ss!Wrd"));
        assert!(text.contains("<sensitive>"));
    }

    #[test]
    fn chain_builds() {
        let chain = password_chain(hasher()).unwrap();
        assert_eq!(chain.current(), PASSWORD_SCHEMA_VERSION);
        assert_eq!(chain.kind(), PASSWORD_KIND);
    }
}
