//! `random_shuffle` resource

use strand_charset::{GenerationError, RandomSource, SeededRandomSource};
use strand_plan::{
    AttrValue, AttributePath, AttributeSchema, Diagnostic, DiagnosticKind, Keepers,
    KeyedMapReplaceRule, PlanError, PlanOutcome, PlanPass, PlanPhase, UnconditionalReplaceRule,
};
use strand_state::{
    shuffle_chain, ShuffleState, StoredState, UpgradeChain, SHUFFLE_ID, SHUFFLE_KIND,
};

use crate::error::StrandError;
use crate::resource::ResourceKind;

/// Largest accepted `result_count`
pub const MAX_RESULT_COUNT: i64 = 1 << 20;

/// Configured (or planned) `random_shuffle` inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleInputs {
    /// Replacement triggers
    pub keepers: AttrValue<Keepers>,
    /// Items to permute (required)
    pub input: AttrValue<Vec<String>>,
    /// Makes the result reproducible
    pub seed: AttrValue<String>,
    /// Result size; defaults to the input size
    pub result_count: AttrValue<i64>,
}

impl ShuffleInputs {
    /// Configuration shuffling `input`
    #[must_use]
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: AttrValue::Known(input.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// With seed
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = AttrValue::Known(seed.into());
        self
    }

    /// With result count
    #[must_use]
    pub fn with_result_count(mut self, count: i64) -> Self {
        self.result_count = AttrValue::Known(count);
        self
    }
}

/// Planned `random_shuffle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShufflePlan {
    /// Planned inputs
    pub inputs: ShuffleInputs,
    /// Planned result
    pub result: AttrValue<Vec<String>>,
}

/// `random_shuffle`: a random permutation of a list
#[derive(Debug)]
pub struct RandomShuffle {
    chain: UpgradeChain,
}

impl RandomShuffle {
    /// Create the kind
    ///
    /// # Errors
    /// Returns error if the upgrade chain is broken
    pub fn new() -> Result<Self, StrandError> {
        Ok(Self {
            chain: shuffle_chain()?,
        })
    }
}

/// Successive uniform permutations of `input`, cut to `count` items
///
/// A count above the input size repeats the input, each round shuffled anew.
fn shuffle(
    source: &mut dyn RandomSource,
    input: &[String],
    count: usize,
) -> Result<Vec<String>, StrandError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut result = Vec::new();
    while result.len() < count {
        let order = source
            .permutation(input.len())
            .map_err(GenerationError::from)?;
        result.extend(order.into_iter().map(|i| input[i].clone()));
    }
    result.truncate(count);
    Ok(result)
}

impl ResourceKind for RandomShuffle {
    const NAME: &'static str = SHUFFLE_KIND;

    type Config = ShuffleInputs;
    type Planned = ShufflePlan;
    type State = ShuffleState;

    fn plan(
        &self,
        config: Option<&ShuffleInputs>,
        prior: Option<&ShuffleState>,
    ) -> Result<PlanOutcome<ShufflePlan>, PlanError> {
        let _span = tracing::debug_span!("plan", resource = Self::NAME).entered();

        let phase = PlanPhase::from_presence(config.is_some(), prior.is_some());
        let mut pass = PlanPass::new(phase);
        let Some(config) = config else {
            return pass.finish(None);
        };

        let state = prior.map_or_else(ShuffleInputs::default, |s| ShuffleInputs {
            keepers: s.keepers.clone().into(),
            input: AttrValue::Known(s.input.clone()),
            seed: s.seed.clone().into(),
            result_count: s.result_count.into(),
        });

        let keepers = AttributeSchema::new("keepers").with_rule(KeyedMapReplaceRule::new());
        let input = AttributeSchema::new("input").with_rule(UnconditionalReplaceRule::new());
        let seed = AttributeSchema::new("seed").with_rule(UnconditionalReplaceRule::new());
        let result_count =
            AttributeSchema::new("result_count").with_rule(UnconditionalReplaceRule::new());

        let inputs = ShuffleInputs {
            keepers: pass.plan_attribute(&keepers, &config.keepers, &state.keepers).value,
            input: pass.plan_attribute(&input, &config.input, &state.input).value,
            seed: pass.plan_attribute(&seed, &config.seed, &state.seed).value,
            result_count: pass
                .plan_attribute(&result_count, &config.result_count, &state.result_count)
                .value,
        };

        if config.input.is_null() {
            pass.push(Diagnostic::error(
                DiagnosticKind::MissingRequired,
                Some(AttributePath::root("input")),
                "missing required attribute",
                "input must be set",
            ));
        }
        if let Some(&count) = inputs.result_count.as_known() {
            let reason = if count < 0 {
                Some(format!("must be non-negative, got {count}"))
            } else if count > MAX_RESULT_COUNT {
                Some(format!("must be at most {MAX_RESULT_COUNT}, got {count}"))
            } else {
                None
            };
            if let Some(reason) = reason {
                pass.push(Diagnostic::error(
                    DiagnosticKind::InvalidSpec,
                    Some(AttributePath::root("result_count")),
                    "invalid result count",
                    reason,
                ));
            }
        }

        let stored: AttrValue<Vec<String>> = prior.map(|s| s.result.clone()).into();
        let result = pass.computed(&stored);
        pass.finish(Some(ShufflePlan { inputs, result }))
    }

    fn apply(
        &self,
        planned: &ShufflePlan,
        prior: Option<&ShuffleState>,
        source: &mut dyn RandomSource,
    ) -> Result<ShuffleState, StrandError> {
        let _span = tracing::debug_span!("apply", resource = Self::NAME).entered();
        let inputs = &planned.inputs;
        let AttrValue::Known(input) = &inputs.input else {
            return Err(StrandError::apply(Self::NAME, "input must be known"));
        };
        if inputs.seed.is_unknown()
            || inputs.result_count.is_unknown()
            || inputs.keepers.is_unknown()
        {
            return Err(StrandError::apply(Self::NAME, "inputs are still unknown"));
        }
        let seed = inputs.seed.as_known().cloned();
        let result_count = inputs.result_count.as_known().copied();

        let result = match (&planned.result, prior) {
            (AttrValue::Unknown, _) => {
                let count = match result_count {
                    Some(count) if (0..=MAX_RESULT_COUNT).contains(&count) => {
                        usize::try_from(count).map_err(|_| {
                            StrandError::apply(Self::NAME, format!("result_count {count} is invalid"))
                        })?
                    }
                    Some(count) => {
                        return Err(StrandError::apply(
                            Self::NAME,
                            format!("result_count {count} is outside 0..={MAX_RESULT_COUNT}"),
                        ))
                    }
                    None => input.len(),
                };
                match &seed {
                    Some(seed) => {
                        shuffle(&mut SeededRandomSource::from_seed_str(seed), input, count)?
                    }
                    None => shuffle(source, input, count)?,
                }
            }
            (AttrValue::Known(_), Some(prior)) => prior.result.clone(),
            _ => {
                return Err(StrandError::apply(
                    Self::NAME,
                    "plan keeps a value but there is no prior state",
                ))
            }
        };

        Ok(ShuffleState {
            id: SHUFFLE_ID.to_string(),
            keepers: inputs.keepers.as_known().cloned(),
            input: input.clone(),
            seed,
            result_count,
            result,
        })
    }

    fn read(&self, stored: StoredState) -> Result<ShuffleState, StrandError> {
        let _span = tracing::debug_span!("read", resource = Self::NAME).entered();
        Ok(self.chain.read(stored)?)
    }

    fn write(&self, state: &ShuffleState) -> Result<StoredState, StrandError> {
        Ok(self.chain.store(state)?)
    }

    fn import(&self, _id: &str) -> Result<ShuffleState, StrandError> {
        Err(StrandError::import(Self::NAME, "import is not supported"))
    }
}
