//! `random_integer` resource

use strand_charset::{GenerationError, RandomSource, SeededRandomSource};
use strand_plan::{
    AttrValue, AttributePath, AttributeSchema, Diagnostic, DiagnosticKind, Keepers,
    KeyedMapReplaceRule, PlanError, PlanOutcome, PlanPass, PlanPhase, UnconditionalReplaceRule,
};
use strand_state::{integer_chain, IntegerState, StoredState, UpgradeChain, INTEGER_KIND};

use crate::error::StrandError;
use crate::resource::ResourceKind;

/// Configured (or planned) `random_integer` inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerInputs {
    /// Replacement triggers
    pub keepers: AttrValue<Keepers>,
    /// Lower bound, inclusive (required)
    pub min: AttrValue<i64>,
    /// Upper bound, inclusive (required)
    pub max: AttrValue<i64>,
    /// Makes the result reproducible
    pub seed: AttrValue<String>,
}

impl IntegerInputs {
    /// Configuration for `[min, max]`
    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: AttrValue::Known(min),
            max: AttrValue::Known(max),
            ..Self::default()
        }
    }

    /// With seed
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = AttrValue::Known(seed.into());
        self
    }

    /// With keepers
    #[must_use]
    pub fn with_keepers(mut self, keepers: Keepers) -> Self {
        self.keepers = AttrValue::Known(keepers);
        self
    }
}

/// Planned `random_integer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerPlan {
    /// Planned inputs
    pub inputs: IntegerInputs,
    /// Planned result
    pub result: AttrValue<i64>,
}

/// `random_integer`: a uniform integer in an inclusive range
#[derive(Debug)]
pub struct RandomInteger {
    chain: UpgradeChain,
}

impl RandomInteger {
    /// Create the kind
    ///
    /// # Errors
    /// Returns error if the upgrade chain is broken
    pub fn new() -> Result<Self, StrandError> {
        Ok(Self {
            chain: integer_chain()?,
        })
    }
}

/// Uniform draw from `[min, max]`, covering the full `i64` range
fn draw(source: &mut dyn RandomSource, min: i64, max: i64) -> Result<i64, StrandError> {
    let span = max.abs_diff(min);
    let offset = match span.checked_add(1) {
        Some(bound) => source.below(bound),
        None => source.next_u64(),
    }
    .map_err(GenerationError::from)?;
    Ok(min.wrapping_add_unsigned(offset))
}

fn missing(pass: &mut PlanPass, name: &str) {
    pass.push(Diagnostic::error(
        DiagnosticKind::MissingRequired,
        Some(AttributePath::root(name)),
        "missing required attribute",
        format!("{name} must be set"),
    ));
}

impl ResourceKind for RandomInteger {
    const NAME: &'static str = INTEGER_KIND;

    type Config = IntegerInputs;
    type Planned = IntegerPlan;
    type State = IntegerState;

    fn plan(
        &self,
        config: Option<&IntegerInputs>,
        prior: Option<&IntegerState>,
    ) -> Result<PlanOutcome<IntegerPlan>, PlanError> {
        let _span = tracing::debug_span!("plan", resource = Self::NAME).entered();

        let phase = PlanPhase::from_presence(config.is_some(), prior.is_some());
        let mut pass = PlanPass::new(phase);
        let Some(config) = config else {
            return pass.finish(None);
        };

        let state = prior.map_or_else(IntegerInputs::default, |s| IntegerInputs {
            keepers: s.keepers.clone().into(),
            min: AttrValue::Known(s.min),
            max: AttrValue::Known(s.max),
            seed: s.seed.clone().into(),
        });

        let keepers = AttributeSchema::new("keepers").with_rule(KeyedMapReplaceRule::new());
        let min = AttributeSchema::new("min").with_rule(UnconditionalReplaceRule::new());
        let max = AttributeSchema::new("max").with_rule(UnconditionalReplaceRule::new());
        let seed = AttributeSchema::new("seed").with_rule(UnconditionalReplaceRule::new());

        let inputs = IntegerInputs {
            keepers: pass.plan_attribute(&keepers, &config.keepers, &state.keepers).value,
            min: pass.plan_attribute(&min, &config.min, &state.min).value,
            max: pass.plan_attribute(&max, &config.max, &state.max).value,
            seed: pass.plan_attribute(&seed, &config.seed, &state.seed).value,
        };

        if config.min.is_null() {
            missing(&mut pass, "min");
        }
        if config.max.is_null() {
            missing(&mut pass, "max");
        }
        if let (Some(min), Some(max)) = (inputs.min.as_known(), inputs.max.as_known()) {
            if max < min {
                pass.push(Diagnostic::error(
                    DiagnosticKind::InvalidSpec,
                    Some(AttributePath::root("max")),
                    "invalid range",
                    format!("max ({max}) must be greater than or equal to min ({min})"),
                ));
            }
        }

        let stored: AttrValue<i64> = prior.map(|s| s.result).into();
        let result = pass.computed(&stored);
        pass.finish(Some(IntegerPlan { inputs, result }))
    }

    fn apply(
        &self,
        planned: &IntegerPlan,
        prior: Option<&IntegerState>,
        source: &mut dyn RandomSource,
    ) -> Result<IntegerState, StrandError> {
        let _span = tracing::debug_span!("apply", resource = Self::NAME).entered();
        let inputs = &planned.inputs;
        let (AttrValue::Known(min), AttrValue::Known(max)) = (&inputs.min, &inputs.max) else {
            return Err(StrandError::apply(Self::NAME, "min and max must be known"));
        };
        if inputs.seed.is_unknown() || inputs.keepers.is_unknown() {
            return Err(StrandError::apply(Self::NAME, "inputs are still unknown"));
        }
        let seed = inputs.seed.as_known().cloned();

        let result = match (&planned.result, prior) {
            (AttrValue::Unknown, _) => match &seed {
                Some(seed) => draw(&mut SeededRandomSource::from_seed_str(seed), *min, *max)?,
                None => draw(source, *min, *max)?,
            },
            (AttrValue::Known(_), Some(prior)) => prior.result,
            _ => {
                return Err(StrandError::apply(
                    Self::NAME,
                    "plan keeps a value but there is no prior state",
                ))
            }
        };

        Ok(IntegerState {
            id: result.to_string(),
            keepers: inputs.keepers.as_known().cloned(),
            min: *min,
            max: *max,
            seed,
            result,
        })
    }

    fn read(&self, stored: StoredState) -> Result<IntegerState, StrandError> {
        let _span = tracing::debug_span!("read", resource = Self::NAME).entered();
        Ok(self.chain.read(stored)?)
    }

    fn write(&self, state: &IntegerState) -> Result<StoredState, StrandError> {
        Ok(self.chain.store(state)?)
    }

    /// `result,min,max` or `result,min,max,seed`
    fn import(&self, id: &str) -> Result<IntegerState, StrandError> {
        let _span = tracing::debug_span!("import", resource = Self::NAME).entered();
        let parts: Vec<&str> = id.split(',').collect();
        let (numbers, seed) = match parts.as_slice() {
            [result, min, max] => ([*result, *min, *max], None),
            [result, min, max, seed] => ([*result, *min, *max], Some((*seed).to_string())),
            _ => {
                return Err(StrandError::import(
                    Self::NAME,
                    format!("expected result,min,max[,seed], got {id:?}"),
                ))
            }
        };

        let parse = |name: &str, text: &str| -> Result<i64, StrandError> {
            text.trim().parse().map_err(|err| {
                StrandError::import(Self::NAME, format!("{name} {text:?} is not an integer: {err}"))
            })
        };
        let result = parse("result", numbers[0])?;
        let min = parse("min", numbers[1])?;
        let max = parse("max", numbers[2])?;
        if max < min {
            return Err(StrandError::import(
                Self::NAME,
                format!("max ({max}) must be greater than or equal to min ({min})"),
            ));
        }
        if !(min..=max).contains(&result) {
            return Err(StrandError::import(
                Self::NAME,
                format!("result ({result}) is outside [{min}, {max}]"),
            ));
        }

        Ok(IntegerState {
            id: result.to_string(),
            keepers: None,
            min,
            max,
            seed,
            result,
        })
    }
}
