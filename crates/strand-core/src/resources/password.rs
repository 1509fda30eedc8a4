//! `random_password` resource
//!
//! Same inputs and generation as `random_string`; the result is treated as
//! sensitive and a bcrypt hash of it is stored alongside.

use std::fmt::{self, Debug, Formatter};

use strand_charset::{RandomSource, StringComposer};
use strand_plan::{AttrValue, PlanError, PlanOutcome, PlanPass, PlanPhase};
use strand_state::{
    password_chain, BcryptHasher, PasswordState, StoredState, UpgradeChain, PASSWORD_ID,
    PASSWORD_KIND,
};

use super::string_like::{plan_inputs, stored_inputs, ResolvedInputs, StringInputs};
use crate::error::StrandError;
use crate::resource::ResourceKind;

/// Planned `random_password`
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordPlan {
    /// Planned inputs
    pub inputs: StringInputs,

    /// Planned result; unknown when a new value will be generated
    pub result: AttrValue<String>,

    /// Planned hash; follows `result`
    pub bcrypt_hash: AttrValue<String>,
}

impl Debug for PasswordPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordPlan")
            .field("inputs", &self.inputs)
            .field("result_known", &self.result.is_known())
            .finish_non_exhaustive()
    }
}

/// `random_password`: a random secret with a stored bcrypt hash
#[derive(Debug)]
pub struct RandomPassword {
    chain: UpgradeChain,
    hasher: BcryptHasher,
}

impl RandomPassword {
    /// Create the kind, validating its upgrade chain
    ///
    /// # Errors
    /// Returns error if the upgrade chain is broken
    pub fn new(hasher: BcryptHasher) -> Result<Self, StrandError> {
        Ok(Self {
            chain: password_chain(hasher)?,
            hasher,
        })
    }

    fn to_state(inputs: ResolvedInputs, result: String, bcrypt_hash: String) -> PasswordState {
        PasswordState {
            id: PASSWORD_ID.to_string(),
            keepers: inputs.keepers,
            length: inputs.length,
            special: inputs.special,
            upper: inputs.upper,
            lower: inputs.lower,
            number: inputs.numeric,
            numeric: inputs.numeric,
            min_numeric: inputs.min_numeric,
            min_upper: inputs.min_upper,
            min_lower: inputs.min_lower,
            min_special: inputs.min_special,
            override_special: inputs.override_special,
            bcrypt_hash,
            result,
        }
    }

    fn state_inputs(state: &PasswordState) -> StringInputs {
        stored_inputs(
            ResolvedInputs {
                keepers: state.keepers.clone(),
                length: state.length,
                special: state.special,
                upper: state.upper,
                lower: state.lower,
                numeric: state.numeric,
                min_numeric: state.min_numeric,
                min_upper: state.min_upper,
                min_lower: state.min_lower,
                min_special: state.min_special,
                override_special: state.override_special.clone(),
            },
            state.number,
        )
    }
}

impl ResourceKind for RandomPassword {
    const NAME: &'static str = PASSWORD_KIND;

    type Config = StringInputs;
    type Planned = PasswordPlan;
    type State = PasswordState;

    fn plan(
        &self,
        config: Option<&StringInputs>,
        prior: Option<&PasswordState>,
    ) -> Result<PlanOutcome<PasswordPlan>, PlanError> {
        let _span = tracing::debug_span!("plan", resource = Self::NAME).entered();

        let phase = PlanPhase::from_presence(config.is_some(), prior.is_some());
        let mut pass = PlanPass::new(phase);
        let Some(config) = config else {
            return pass.finish(None);
        };

        let state = prior.map(Self::state_inputs).unwrap_or_default();
        let inputs = plan_inputs(&mut pass, config, &state);
        let result: AttrValue<String> = prior.map(|s| s.result.clone()).into();
        let bcrypt_hash: AttrValue<String> = prior.map(|s| s.bcrypt_hash.clone()).into();
        let result = pass.computed(&result);
        let bcrypt_hash = pass.computed(&bcrypt_hash);

        pass.finish(Some(PasswordPlan {
            inputs,
            result,
            bcrypt_hash,
        }))
    }

    fn apply(
        &self,
        planned: &PasswordPlan,
        prior: Option<&PasswordState>,
        source: &mut dyn RandomSource,
    ) -> Result<PasswordState, StrandError> {
        let _span = tracing::debug_span!("apply", resource = Self::NAME).entered();
        let inputs = ResolvedInputs::from_planned(Self::NAME, &planned.inputs)?;

        let (result, bcrypt_hash) = match (&planned.result, prior) {
            (AttrValue::Unknown, _) => {
                let spec = inputs.generation_spec();
                let result = StringComposer::new(source).compose(&spec)?.into_string();
                let hash = self.hasher.hash(&result)?;
                tracing::debug!(length = inputs.length, "generated new password");
                (result, hash)
            }
            (AttrValue::Known(_), Some(prior)) => {
                (prior.result.clone(), prior.bcrypt_hash.clone())
            }
            _ => {
                return Err(StrandError::apply(
                    Self::NAME,
                    "plan keeps a value but there is no prior state",
                ))
            }
        };

        Ok(Self::to_state(inputs, result, bcrypt_hash))
    }

    fn read(&self, stored: StoredState) -> Result<PasswordState, StrandError> {
        let _span = tracing::debug_span!("read", resource = Self::NAME).entered();
        Ok(self.chain.read(stored)?)
    }

    fn write(&self, state: &PasswordState) -> Result<StoredState, StrandError> {
        Ok(self.chain.store(state)?)
    }

    fn import(&self, id: &str) -> Result<PasswordState, StrandError> {
        let _span = tracing::debug_span!("import", resource = Self::NAME).entered();
        if id.is_empty() {
            return Err(StrandError::import(Self::NAME, "value must not be empty"));
        }
        let length = i64::try_from(id.chars().count())
            .map_err(|_| StrandError::import(Self::NAME, "value is too long"))?;
        let bcrypt_hash = self.hasher.hash(id)?;
        Ok(Self::to_state(
            ResolvedInputs::imported(length),
            id.to_string(),
            bcrypt_hash,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_charset::{CharClass, SeededRandomSource};
    use strand_plan::PlanAction;
    use strand_state::MIN_BCRYPT_COST;

    fn kind() -> RandomPassword {
        RandomPassword::new(BcryptHasher::new(MIN_BCRYPT_COST).unwrap()).unwrap()
    }

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(MIN_BCRYPT_COST).unwrap()
    }

    #[test]
    fn create_hashes_generated_value() {
        let config = StringInputs::new(20).with_min(CharClass::Special, 2);
        let planned = kind().plan(Some(&config), None).unwrap().planned.unwrap();
        assert_eq!(planned.bcrypt_hash, AttrValue::Unknown);

        let state = kind()
            .apply(&planned, None, &mut SeededRandomSource::from_u64(4))
            .unwrap();
        assert_eq!(state.id, PASSWORD_ID);
        assert_eq!(state.result.chars().count(), 20);
        assert!(hasher().verify(&state.result, &state.bcrypt_hash));
    }

    #[test]
    fn update_carries_hash_forward() {
        let config = StringInputs::new(12);
        let planned = kind().plan(Some(&config), None).unwrap().planned.unwrap();
        let state = kind()
            .apply(&planned, None, &mut SeededRandomSource::from_u64(4))
            .unwrap();

        let outcome = kind().plan(Some(&config), Some(&state)).unwrap();
        assert_eq!(outcome.action, PlanAction::Update);
        let next = kind()
            .apply(&outcome.planned.unwrap(), Some(&state), &mut SeededRandomSource::from_u64(8))
            .unwrap();
        assert_eq!(next.bcrypt_hash, state.bcrypt_hash);
        assert_eq!(next.result, state.result);
    }

    #[test]
    fn plan_debug_hides_value() {
        let plan = PasswordPlan {
            inputs: StringInputs::new(4),
            result: AttrValue::Known("hunter2!".to_string()),
            bcrypt_hash: AttrValue::Unknown,
        };
        assert!(!format!("{plan:?}").contains("hunter2!"));
    }

    #[test]
    fn import_hashes_value() {
        let state = kind().import("imp0rted!").unwrap();
        assert_eq!(state.length, 9);
        assert_eq!(state.id, PASSWORD_ID);
        assert!(hasher().verify("imp0rted!", &state.bcrypt_hash));
    }
}
