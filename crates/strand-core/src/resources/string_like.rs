//! Inputs and planning shared by `random_string` and `random_password`

use strand_charset::{CharClass, GenerationError, GenerationSpec, MAX_LENGTH};
use strand_plan::{
    AttrValue, AttributePath, AttributeSchema, DefaultValueRule, Diagnostic, DiagnosticKind,
    EmptyToNullReplaceRule, Keepers, KeyedMapReplaceRule, PairedFieldRule, PlanPass,
    UnconditionalReplaceRule,
};

use crate::error::StrandError;

/// Configured (or planned) inputs of a string-like resource
///
/// Every attribute may be null (unset) or unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringInputs {
    /// Replacement triggers
    pub keepers: AttrValue<Keepers>,
    /// Result length (required)
    pub length: AttrValue<i64>,
    /// Include special characters
    pub special: AttrValue<bool>,
    /// Include uppercase
    pub upper: AttrValue<bool>,
    /// Include lowercase
    pub lower: AttrValue<bool>,
    /// Include digits (deprecated alias of `numeric`)
    pub number: AttrValue<bool>,
    /// Include digits
    pub numeric: AttrValue<bool>,
    /// Minimum digits
    pub min_numeric: AttrValue<i64>,
    /// Minimum uppercase
    pub min_upper: AttrValue<i64>,
    /// Minimum lowercase
    pub min_lower: AttrValue<i64>,
    /// Minimum special characters
    pub min_special: AttrValue<i64>,
    /// Replacement special set
    pub override_special: AttrValue<String>,
}

impl StringInputs {
    /// Configuration with only `length` set
    #[must_use]
    pub fn new(length: i64) -> Self {
        Self {
            length: AttrValue::Known(length),
            ..Self::default()
        }
    }

    /// With keepers
    #[must_use]
    pub fn with_keepers(mut self, keepers: Keepers) -> Self {
        self.keepers = AttrValue::Known(keepers);
        self
    }

    /// With a class toggle (`Numeric` sets `numeric`, not `number`)
    #[must_use]
    pub fn with_class(mut self, class: CharClass, include: bool) -> Self {
        *self.class_mut(class) = AttrValue::Known(include);
        self
    }

    /// With the deprecated `number` toggle
    #[must_use]
    pub fn with_number(mut self, include: bool) -> Self {
        self.number = AttrValue::Known(include);
        self
    }

    /// With a minimum count
    #[must_use]
    pub fn with_min(mut self, class: CharClass, min: i64) -> Self {
        *self.min_mut(class) = AttrValue::Known(min);
        self
    }

    /// With a special-character override
    #[must_use]
    pub fn with_override_special(mut self, special: impl Into<String>) -> Self {
        self.override_special = AttrValue::Known(special.into());
        self
    }

    /// Class toggle
    #[must_use]
    pub fn class(&self, class: CharClass) -> &AttrValue<bool> {
        match class {
            CharClass::Upper => &self.upper,
            CharClass::Lower => &self.lower,
            CharClass::Numeric => &self.numeric,
            CharClass::Special => &self.special,
        }
    }

    /// Minimum count
    #[must_use]
    pub fn min(&self, class: CharClass) -> &AttrValue<i64> {
        match class {
            CharClass::Upper => &self.min_upper,
            CharClass::Lower => &self.min_lower,
            CharClass::Numeric => &self.min_numeric,
            CharClass::Special => &self.min_special,
        }
    }

    fn class_mut(&mut self, class: CharClass) -> &mut AttrValue<bool> {
        match class {
            CharClass::Upper => &mut self.upper,
            CharClass::Lower => &mut self.lower,
            CharClass::Numeric => &mut self.numeric,
            CharClass::Special => &mut self.special,
        }
    }

    fn min_mut(&mut self, class: CharClass) -> &mut AttrValue<i64> {
        match class {
            CharClass::Upper => &mut self.min_upper,
            CharClass::Lower => &mut self.min_lower,
            CharClass::Numeric => &mut self.min_numeric,
            CharClass::Special => &mut self.min_special,
        }
    }
}

/// Inputs with every attribute known, as written to state
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedInputs {
    pub(crate) keepers: Option<Keepers>,
    pub(crate) length: i64,
    pub(crate) special: bool,
    pub(crate) upper: bool,
    pub(crate) lower: bool,
    pub(crate) numeric: bool,
    pub(crate) min_numeric: i64,
    pub(crate) min_upper: i64,
    pub(crate) min_lower: i64,
    pub(crate) min_special: i64,
    pub(crate) override_special: Option<String>,
}

impl ResolvedInputs {
    /// Resolve planned inputs
    ///
    /// Fails if an attribute is still unknown or was never defaulted.
    pub(crate) fn from_planned(
        kind: &'static str,
        planned: &StringInputs,
    ) -> Result<Self, StrandError> {
        fn known<T: Clone>(
            kind: &'static str,
            name: &str,
            value: &AttrValue<T>,
        ) -> Result<T, StrandError> {
            match value {
                AttrValue::Known(v) => Ok(v.clone()),
                AttrValue::Null => Err(StrandError::apply(kind, format!("{name} is not set"))),
                AttrValue::Unknown => {
                    Err(StrandError::apply(kind, format!("{name} is still unknown")))
                }
            }
        }
        fn optional<T: Clone>(
            kind: &'static str,
            name: &str,
            value: &AttrValue<T>,
        ) -> Result<Option<T>, StrandError> {
            match value {
                AttrValue::Unknown => {
                    Err(StrandError::apply(kind, format!("{name} is still unknown")))
                }
                other => Ok(other.as_known().cloned()),
            }
        }

        Ok(Self {
            keepers: optional(kind, "keepers", &planned.keepers)?,
            length: known(kind, "length", &planned.length)?,
            special: known(kind, "special", &planned.special)?,
            upper: known(kind, "upper", &planned.upper)?,
            lower: known(kind, "lower", &planned.lower)?,
            numeric: known(kind, "numeric", &planned.numeric)?,
            min_numeric: known(kind, "min_numeric", &planned.min_numeric)?,
            min_upper: known(kind, "min_upper", &planned.min_upper)?,
            min_lower: known(kind, "min_lower", &planned.min_lower)?,
            min_special: known(kind, "min_special", &planned.min_special)?,
            override_special: optional(kind, "override_special", &planned.override_special)?,
        })
    }

    /// Resolve only if every required input is known
    pub(crate) fn all_known(planned: &StringInputs) -> Option<Self> {
        if planned.keepers.is_unknown() || planned.override_special.is_unknown() {
            return None;
        }
        Some(Self {
            keepers: planned.keepers.as_known().cloned(),
            length: *planned.length.as_known()?,
            special: *planned.special.as_known()?,
            upper: *planned.upper.as_known()?,
            lower: *planned.lower.as_known()?,
            numeric: *planned.numeric.as_known()?,
            min_numeric: *planned.min_numeric.as_known()?,
            min_upper: *planned.min_upper.as_known()?,
            min_lower: *planned.min_lower.as_known()?,
            min_special: *planned.min_special.as_known()?,
            override_special: planned.override_special.as_known().cloned(),
        })
    }

    /// Defaults used when importing an existing value
    pub(crate) fn imported(length: i64) -> Self {
        Self {
            keepers: None,
            length,
            special: true,
            upper: true,
            lower: true,
            numeric: true,
            min_numeric: 0,
            min_upper: 0,
            min_lower: 0,
            min_special: 0,
            override_special: None,
        }
    }

    pub(crate) fn generation_spec(&self) -> GenerationSpec {
        let spec = GenerationSpec::new(self.length)
            .with_class(CharClass::Upper, self.upper)
            .with_class(CharClass::Lower, self.lower)
            .with_class(CharClass::Numeric, self.numeric)
            .with_class(CharClass::Special, self.special)
            .with_min(CharClass::Upper, self.min_upper)
            .with_min(CharClass::Lower, self.min_lower)
            .with_min(CharClass::Numeric, self.min_numeric)
            .with_min(CharClass::Special, self.min_special);
        match &self.override_special {
            Some(special) => spec.with_override_special(special.as_str()),
            None => spec,
        }
    }
}

/// Stored inputs, lifted back into plan values
pub(crate) fn stored_inputs(resolved: ResolvedInputs, number: bool) -> StringInputs {
    StringInputs {
        keepers: resolved.keepers.into(),
        length: AttrValue::Known(resolved.length),
        special: AttrValue::Known(resolved.special),
        upper: AttrValue::Known(resolved.upper),
        lower: AttrValue::Known(resolved.lower),
        number: AttrValue::Known(number),
        numeric: AttrValue::Known(resolved.numeric),
        min_numeric: AttrValue::Known(resolved.min_numeric),
        min_upper: AttrValue::Known(resolved.min_upper),
        min_lower: AttrValue::Known(resolved.min_lower),
        min_special: AttrValue::Known(resolved.min_special),
        override_special: resolved.override_special.into(),
    }
}

fn toggle(name: &str) -> AttributeSchema<bool> {
    AttributeSchema::new(name)
        .with_rule(DefaultValueRule::new(true))
        .with_rule(UnconditionalReplaceRule::new())
}

fn minimum(name: &str) -> AttributeSchema<i64> {
    AttributeSchema::new(name)
        .with_rule(DefaultValueRule::new(0))
        .with_rule(UnconditionalReplaceRule::new())
}

fn alias(name: &str, sibling: &str, sibling_config: &AttrValue<bool>) -> AttributeSchema<bool> {
    AttributeSchema::new(name)
        .with_rule(PairedFieldRule::new(
            AttributePath::root(sibling),
            sibling_config.clone(),
            true,
        ))
        .with_rule(UnconditionalReplaceRule::new())
}

/// Plan every input attribute, then validate the planned values
pub(crate) fn plan_inputs(
    pass: &mut PlanPass,
    config: &StringInputs,
    state: &StringInputs,
) -> StringInputs {
    let keepers = AttributeSchema::new("keepers").with_rule(KeyedMapReplaceRule::new());
    let length = AttributeSchema::new("length").with_rule(UnconditionalReplaceRule::new());
    let override_special =
        AttributeSchema::new("override_special").with_rule(EmptyToNullReplaceRule::new());

    let planned = StringInputs {
        keepers: pass.plan_attribute(&keepers, &config.keepers, &state.keepers).value,
        length: pass.plan_attribute(&length, &config.length, &state.length).value,
        special: pass.plan_attribute(&toggle("special"), &config.special, &state.special).value,
        upper: pass.plan_attribute(&toggle("upper"), &config.upper, &state.upper).value,
        lower: pass.plan_attribute(&toggle("lower"), &config.lower, &state.lower).value,
        number: pass
            .plan_attribute(
                &alias("number", "numeric", &config.numeric),
                &config.number,
                &state.number,
            )
            .value,
        numeric: pass
            .plan_attribute(
                &alias("numeric", "number", &config.number),
                &config.numeric,
                &state.numeric,
            )
            .value,
        min_numeric: pass
            .plan_attribute(&minimum("min_numeric"), &config.min_numeric, &state.min_numeric)
            .value,
        min_upper: pass
            .plan_attribute(&minimum("min_upper"), &config.min_upper, &state.min_upper)
            .value,
        min_lower: pass
            .plan_attribute(&minimum("min_lower"), &config.min_lower, &state.min_lower)
            .value,
        min_special: pass
            .plan_attribute(&minimum("min_special"), &config.min_special, &state.min_special)
            .value,
        override_special: pass
            .plan_attribute(&override_special, &config.override_special, &state.override_special)
            .value,
    };

    if config.number.is_known() {
        pass.push(Diagnostic::warning(
            DiagnosticKind::Deprecated,
            Some(AttributePath::root("number")),
            "deprecated attribute",
            "number is deprecated, use numeric instead",
        ));
    }
    if config.length.is_null() {
        pass.push(Diagnostic::error(
            DiagnosticKind::MissingRequired,
            Some(AttributePath::root("length")),
            "missing required attribute",
            "length must be set",
        ));
    }
    validate(pass, &planned);
    planned
}

fn invalid(pass: &mut PlanPass, field: &str, reason: impl Into<String>) {
    pass.push(Diagnostic::error(
        DiagnosticKind::InvalidSpec,
        Some(AttributePath::root(field)),
        "invalid generation spec",
        reason,
    ));
}

/// Report every constraint violation visible among known values
fn validate(pass: &mut PlanPass, planned: &StringInputs) {
    let errors_before = pass.diagnostics().errors().count();

    if let Some(&length) = planned.length.as_known() {
        if length < 1 {
            invalid(pass, "length", format!("must be at least 1, got {length}"));
        } else if length > MAX_LENGTH {
            invalid(pass, "length", format!("must be at most {MAX_LENGTH}, got {length}"));
        }
    }

    let mut minimums = Some(0i64);
    for class in CharClass::ALL {
        match planned.min(class) {
            AttrValue::Known(min) if *min < 0 => {
                invalid(pass, class.min_field(), format!("must be non-negative, got {min}"));
                minimums = None;
            }
            AttrValue::Known(min) => {
                if *min > 0 && planned.class(class).as_known() == Some(&false) {
                    invalid(
                        pass,
                        class.min_field(),
                        format!("is {min} but {class} characters are not enabled"),
                    );
                }
                minimums = minimums.and_then(|total| total.checked_add(*min));
            }
            _ => minimums = None,
        }
    }

    if let (Some(&length), Some(total)) = (planned.length.as_known(), minimums) {
        if total > length {
            invalid(
                pass,
                "length",
                format!("length ({length}) is less than the sum of minimums ({total})"),
            );
        }
    }

    // remaining checks (empty alphabet) need every value and a clean slate
    if pass.diagnostics().errors().count() > errors_before {
        return;
    }
    let Some(resolved) = ResolvedInputs::all_known(planned) else {
        return;
    };
    if let Err(GenerationError::InvalidSpec { field, reason }) =
        resolved.generation_spec().validate()
    {
        invalid(pass, field, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_plan::PlanPhase;

    fn plan(config: &StringInputs) -> (StringInputs, PlanPass) {
        let mut pass = PlanPass::new(PlanPhase::Create);
        let planned = plan_inputs(&mut pass, config, &StringInputs::default());
        (planned, pass)
    }

    #[test]
    fn defaults_filled() {
        let (planned, pass) = plan(&StringInputs::new(12));
        assert!(!pass.diagnostics().has_errors());
        assert_eq!(planned.special, AttrValue::Known(true));
        assert_eq!(planned.number, AttrValue::Known(true));
        assert_eq!(planned.numeric, AttrValue::Known(true));
        assert_eq!(planned.min_lower, AttrValue::Known(0));
        assert_eq!(planned.override_special, AttrValue::Null);
    }

    #[test]
    fn number_copies_into_numeric_with_warning() {
        let (planned, pass) = plan(&StringInputs::new(12).with_number(false));
        assert_eq!(planned.numeric, AttrValue::Known(false));
        assert_eq!(pass.diagnostics().warnings().count(), 1);
    }

    #[test]
    fn minimums_over_length_rejected() {
        let config = StringInputs::new(3)
            .with_min(CharClass::Upper, 2)
            .with_min(CharClass::Lower, 2);
        let (_, pass) = plan(&config);
        let text = pass.diagnostics().to_string();
        assert!(text.contains("length (3) is less than the sum of minimums (4)"));
    }

    #[test]
    fn every_violation_reported() {
        let config = StringInputs::new(0)
            .with_class(CharClass::Special, false)
            .with_min(CharClass::Special, 2)
            .with_min(CharClass::Upper, -1);
        let (_, pass) = plan(&config);
        assert_eq!(pass.diagnostics().errors().count(), 3);
    }

    #[test]
    fn empty_alphabet_rejected() {
        let config = StringInputs::new(4)
            .with_class(CharClass::Upper, false)
            .with_class(CharClass::Lower, false)
            .with_class(CharClass::Numeric, false)
            .with_class(CharClass::Special, false);
        let (_, pass) = plan(&config);
        assert!(pass.diagnostics().to_string().contains("no character classes selected"));
    }

    #[test]
    fn missing_length_reported() {
        let (_, pass) = plan(&StringInputs::default());
        assert!(pass.diagnostics().has_error_kind(DiagnosticKind::MissingRequired));
    }

    #[test]
    fn unknown_length_defers_validation() {
        let mut config = StringInputs::new(1).with_min(CharClass::Upper, 5);
        config.length = AttrValue::Unknown;
        let (planned, pass) = plan(&config);
        assert!(!pass.diagnostics().has_errors());
        assert_eq!(planned.length, AttrValue::Unknown);
    }

    #[test]
    fn oversized_length_rejected() {
        let (_, pass) = plan(&StringInputs::new(i64::MAX));
        assert!(pass.diagnostics().has_error_kind(DiagnosticKind::InvalidSpec));
        assert!(pass.diagnostics().to_string().contains("must be at most"));
    }

    #[test]
    fn all_known_requires_every_input() {
        let (planned, _) = plan(&StringInputs::new(8));
        let resolved = ResolvedInputs::all_known(&planned).unwrap();
        assert_eq!(resolved.length, 8);

        let mut partial = planned;
        partial.min_upper = AttrValue::Unknown;
        assert!(ResolvedInputs::all_known(&partial).is_none());
    }
}
