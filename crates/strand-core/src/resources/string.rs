//! `random_string` resource

use strand_charset::{RandomSource, StringComposer};
use strand_plan::{AttrValue, PlanError, PlanOutcome, PlanPass, PlanPhase};
use strand_state::{string_chain, StoredState, StringState, UpgradeChain, STRING_KIND};

use super::string_like::{plan_inputs, stored_inputs, ResolvedInputs, StringInputs};
use crate::error::StrandError;
use crate::resource::ResourceKind;

/// Planned `random_string`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPlan {
    /// Planned inputs
    pub inputs: StringInputs,

    /// Planned result; unknown when a new value will be generated
    pub result: AttrValue<String>,
}

/// `random_string`: a random string, stable until its inputs change
#[derive(Debug)]
pub struct RandomString {
    chain: UpgradeChain,
}

impl RandomString {
    /// Create the kind, validating its upgrade chain
    ///
    /// # Errors
    /// Returns error if the upgrade chain is broken
    pub fn new() -> Result<Self, StrandError> {
        Ok(Self {
            chain: string_chain()?,
        })
    }

    fn to_state(inputs: ResolvedInputs, result: String) -> StringState {
        StringState {
            id: result.clone(),
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
            result,
        }
    }

    fn state_inputs(state: &StringState) -> StringInputs {
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

impl ResourceKind for RandomString {
    const NAME: &'static str = STRING_KIND;

    type Config = StringInputs;
    type Planned = StringPlan;
    type State = StringState;

    fn plan(
        &self,
        config: Option<&StringInputs>,
        prior: Option<&StringState>,
    ) -> Result<PlanOutcome<StringPlan>, PlanError> {
        let _span = tracing::debug_span!("plan", resource = Self::NAME).entered();

        let phase = PlanPhase::from_presence(config.is_some(), prior.is_some());
        let mut pass = PlanPass::new(phase);
        let Some(config) = config else {
            return pass.finish(None);
        };

        let state = prior.map(Self::state_inputs).unwrap_or_default();
        let inputs = plan_inputs(&mut pass, config, &state);
        let stored: AttrValue<String> = prior.map(|s| s.result.clone()).into();
        let result = pass.computed(&stored);

        pass.finish(Some(StringPlan { inputs, result }))
    }

    fn apply(
        &self,
        planned: &StringPlan,
        prior: Option<&StringState>,
        source: &mut dyn RandomSource,
    ) -> Result<StringState, StrandError> {
        let _span = tracing::debug_span!("apply", resource = Self::NAME).entered();
        let inputs = ResolvedInputs::from_planned(Self::NAME, &planned.inputs)?;

        let result = match (&planned.result, prior) {
            (AttrValue::Unknown, _) => {
                let spec = inputs.generation_spec();
                let generated = StringComposer::new(source).compose(&spec)?;
                tracing::debug!(length = inputs.length, "generated new value");
                generated.into_string()
            }
            (AttrValue::Known(_), Some(prior)) => prior.result.clone(),
            _ => {
                return Err(StrandError::apply(
                    Self::NAME,
                    "plan keeps a value but there is no prior state",
                ))
            }
        };

        Ok(Self::to_state(inputs, result))
    }

    fn read(&self, stored: StoredState) -> Result<StringState, StrandError> {
        let _span = tracing::debug_span!("read", resource = Self::NAME).entered();
        Ok(self.chain.read(stored)?)
    }

    fn write(&self, state: &StringState) -> Result<StoredState, StrandError> {
        Ok(self.chain.store(state)?)
    }

    fn import(&self, id: &str) -> Result<StringState, StrandError> {
        let _span = tracing::debug_span!("import", resource = Self::NAME).entered();
        if id.is_empty() {
            return Err(StrandError::import(Self::NAME, "value must not be empty"));
        }
        let length = i64::try_from(id.chars().count())
            .map_err(|_| StrandError::import(Self::NAME, "value is too long"))?;
        Ok(Self::to_state(
            ResolvedInputs::imported(length),
            id.to_string(),
        ))
    }
}
