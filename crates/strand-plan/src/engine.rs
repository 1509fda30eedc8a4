//! Plan consistency engine
//!
//! A [`PlanPass`] plans every attribute of one resource from configuration
//! and prior state, collecting diagnostics as it goes. Nothing is decided
//! until [`PlanPass::finish`], so one pass reports every problem at once.

use std::fmt::{self, Debug, Formatter};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::path::AttributePath;
use crate::rule::{AttributePlanRule, PlanPhase, RuleKind, RuleRequest, RuleResponse};
use crate::value::AttrValue;

/// An attribute and its ordered rules
pub struct AttributeSchema<T> {
    path: AttributePath,
    rules: Vec<Box<dyn AttributePlanRule<T>>>,
}

impl<T> AttributeSchema<T> {
    /// Attribute with no rules (configuration is planned verbatim)
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<AttributePath>) -> Self {
        Self {
            path: path.into(),
            rules: Vec::new(),
        }
    }

    /// Add a rule
    #[inline]
    #[must_use]
    pub fn with_rule(mut self, rule: impl AttributePlanRule<T> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Attribute path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    /// Number of rules
    #[inline]
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl<T> Debug for AttributeSchema<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSchema")
            .field("path", &self.path)
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Planned value of one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePlan<T> {
    /// Attribute path
    pub path: AttributePath,

    /// Planned value
    pub value: AttrValue<T>,

    /// Whether this attribute forces recreation
    pub requires_replace: bool,
}

/// What applying the plan will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanAction {
    /// Generate a new value
    Create,

    /// Keep the stored value, rewrite tolerated input changes
    Update,

    /// Destroy and generate a new value
    Replace,

    /// Remove the resource
    Destroy,
}

impl PlanAction {
    /// Whether apply generates a new value
    #[inline]
    #[must_use]
    pub fn generates(self) -> bool {
        matches!(self, Self::Create | Self::Replace)
    }
}

/// Successful planning result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome<P> {
    /// What apply will do
    pub action: PlanAction,

    /// Planned resource (absent when destroying)
    pub planned: Option<P>,

    /// Attributes that forced replacement
    pub replaced_by: Vec<AttributePath>,

    /// Non-fatal diagnostics
    pub diagnostics: Diagnostics,
}

/// Planning failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// At least one error diagnostic
    #[error("plan rejected: {diagnostics}")]
    Rejected {
        /// Every diagnostic of the pass, errors and warnings
        diagnostics: Diagnostics,
    },
}

impl PlanError {
    /// All diagnostics of the failed pass
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Self::Rejected { diagnostics } => diagnostics,
        }
    }

    /// Failed because aliased attributes disagree
    #[inline]
    #[must_use]
    pub fn is_inconsistent_configuration(&self) -> bool {
        self.diagnostics()
            .has_error_kind(DiagnosticKind::InconsistentConfiguration)
    }

    /// Failed because inputs violate generation constraints
    #[inline]
    #[must_use]
    pub fn is_invalid_spec(&self) -> bool {
        self.diagnostics().has_error_kind(DiagnosticKind::InvalidSpec)
    }
}

/// One planning cycle for one resource
///
/// Call [`plan_attribute`](Self::plan_attribute) for every input attribute,
/// then [`computed`](Self::computed) for every computed one, then
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct PlanPass {
    phase: PlanPhase,
    diagnostics: Diagnostics,
    replaced_by: Vec<AttributePath>,
}

impl PlanPass {
    /// Start a pass
    #[inline]
    #[must_use]
    pub fn new(phase: PlanPhase) -> Self {
        Self {
            phase,
            diagnostics: Diagnostics::new(),
            replaced_by: Vec::new(),
        }
    }

    /// Lifecycle stage of this pass
    #[inline]
    #[must_use]
    pub fn phase(&self) -> PlanPhase {
        self.phase
    }

    /// Record a diagnostic produced outside the rules (input validation)
    #[inline]
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Plan one attribute
    ///
    /// Default rules run before replacement rules. Errors are recorded, not
    /// returned.
    pub fn plan_attribute<T>(
        &mut self,
        schema: &AttributeSchema<T>,
        config: &AttrValue<T>,
        state: &AttrValue<T>,
    ) -> AttributePlan<T>
    where
        T: Clone,
    {
        if self.phase == PlanPhase::Destroy {
            return AttributePlan {
                path: schema.path.clone(),
                value: AttrValue::Null,
                requires_replace: false,
            };
        }

        let mut plan = config.clone();
        let mut requires_replace = false;

        for kind in [RuleKind::Default, RuleKind::Replacement] {
            for rule in schema.rules.iter().filter(|r| r.kind() == kind) {
                let req = RuleRequest {
                    path: &schema.path,
                    phase: self.phase,
                    config,
                    state,
                    plan: &plan,
                };
                let mut resp = RuleResponse::unchanged(plan.clone());
                rule.apply(&req, &mut resp);

                if resp.requires_replace {
                    tracing::debug!(
                        attribute = %schema.path,
                        rule = rule.name(),
                        "attribute requires replacement"
                    );
                }
                requires_replace |= resp.requires_replace;
                self.diagnostics.extend(resp.diagnostics);
                plan = resp.plan;
            }
        }

        if requires_replace {
            self.replaced_by.push(schema.path.clone());
        }

        AttributePlan {
            path: schema.path.clone(),
            value: plan,
            requires_replace,
        }
    }

    /// Whether any attribute planned so far forces recreation
    #[inline]
    #[must_use]
    pub fn requires_replace(&self) -> bool {
        !self.replaced_by.is_empty()
    }

    /// Plan a computed attribute
    ///
    /// Unknown when a new value will be generated (creation or replacement),
    /// otherwise the stored value. Must be called after every input
    /// attribute has been planned.
    #[must_use]
    pub fn computed<T: Clone>(&self, state: &AttrValue<T>) -> AttrValue<T> {
        match self.phase {
            PlanPhase::Destroy => AttrValue::Null,
            PlanPhase::Create => AttrValue::Unknown,
            PlanPhase::Update if self.requires_replace() => AttrValue::Unknown,
            PlanPhase::Update => state.clone(),
        }
    }

    /// Diagnostics collected so far
    #[inline]
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Close the pass
    ///
    /// # Errors
    /// Returns [`PlanError::Rejected`] if any error diagnostic was recorded
    pub fn finish<P>(self, planned: Option<P>) -> Result<PlanOutcome<P>, PlanError> {
        if self.diagnostics.has_errors() {
            tracing::debug!(
                errors = self.diagnostics.errors().count(),
                "plan rejected"
            );
            return Err(PlanError::Rejected {
                diagnostics: self.diagnostics,
            });
        }

        let action = match self.phase {
            PlanPhase::Create => PlanAction::Create,
            PlanPhase::Destroy => PlanAction::Destroy,
            PlanPhase::Update if !self.replaced_by.is_empty() => PlanAction::Replace,
            PlanPhase::Update => PlanAction::Update,
        };

        Ok(PlanOutcome {
            action,
            planned: if action == PlanAction::Destroy {
                None
            } else {
                planned
            },
            replaced_by: self.replaced_by,
            diagnostics: self.diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_value::DefaultValueRule;
    use crate::paired_field::PairedFieldRule;
    use crate::requires_replace::UnconditionalReplaceRule;
    use pretty_assertions::assert_eq;

    fn length_schema() -> AttributeSchema<i64> {
        AttributeSchema::new("length").with_rule(UnconditionalReplaceRule::new())
    }

    fn special_schema() -> AttributeSchema<bool> {
        // registered out of order on purpose: defaults still run first
        AttributeSchema::new("special")
            .with_rule(UnconditionalReplaceRule::new())
            .with_rule(DefaultValueRule::new(true))
    }

    #[test]
    fn create_plans_defaults_and_unknown_result() {
        let mut pass = PlanPass::new(PlanPhase::Create);
        let special = pass.plan_attribute(&special_schema(), &AttrValue::Null, &AttrValue::Null);
        let result: AttrValue<String> = pass.computed(&AttrValue::Null);

        assert_eq!(special.value, AttrValue::Known(true));
        assert!(!special.requires_replace);
        assert_eq!(result, AttrValue::Unknown);

        let outcome = pass.finish(Some(())).unwrap();
        assert_eq!(outcome.action, PlanAction::Create);
        assert!(outcome.action.generates());
    }

    #[test]
    fn defaults_run_before_replacement() {
        let mut pass = PlanPass::new(PlanPhase::Update);
        let special =
            pass.plan_attribute(&special_schema(), &AttrValue::Null, &AttrValue::Known(true));
        assert!(!special.requires_replace);
        assert_eq!(pass.finish(Some(())).unwrap().action, PlanAction::Update);
    }

    #[test]
    fn changed_input_replaces_and_unknowns_result() {
        let mut pass = PlanPass::new(PlanPhase::Update);
        pass.plan_attribute(&length_schema(), &AttrValue::Known(20), &AttrValue::Known(16));
        let result = pass.computed(&AttrValue::Known("abc".to_string()));
        assert_eq!(result, AttrValue::Unknown);

        let outcome = pass.finish(Some(())).unwrap();
        assert_eq!(outcome.action, PlanAction::Replace);
        assert_eq!(outcome.replaced_by, vec![AttributePath::root("length")]);
    }

    #[test]
    fn unchanged_update_carries_result() {
        let mut pass = PlanPass::new(PlanPhase::Update);
        pass.plan_attribute(&length_schema(), &AttrValue::Known(16), &AttrValue::Known(16));
        let stored = AttrValue::Known("abc".to_string());
        assert_eq!(pass.computed(&stored), stored);
    }

    #[test]
    fn all_errors_reported_in_one_pass() {
        let mut pass = PlanPass::new(PlanPhase::Create);
        let number = AttributeSchema::new("number").with_rule(PairedFieldRule::new(
            AttributePath::root("numeric"),
            AttrValue::Known(false),
            true,
        ));
        let numeric = AttributeSchema::new("numeric").with_rule(PairedFieldRule::new(
            AttributePath::root("number"),
            AttrValue::Known(true),
            true,
        ));
        pass.push(Diagnostic::error(
            DiagnosticKind::InvalidSpec,
            Some(AttributePath::root("length")),
            "invalid length",
            "length (3) is less than the sum of minimums (4)",
        ));
        pass.plan_attribute(&number, &AttrValue::Known(true), &AttrValue::Null);
        pass.plan_attribute(&numeric, &AttrValue::Known(false), &AttrValue::Null);

        let err = pass.finish(Some(())).unwrap_err();
        assert!(err.is_invalid_spec());
        assert!(err.is_inconsistent_configuration());
        // alias conflict reported once, plus the length error
        assert_eq!(err.diagnostics().errors().count(), 2);
    }

    #[test]
    fn destroy_is_noop() {
        let mut pass = PlanPass::new(PlanPhase::Destroy);
        let plan = pass.plan_attribute(&length_schema(), &AttrValue::Null, &AttrValue::Known(16));
        assert!(!plan.requires_replace);
        let outcome = pass.finish(Some(())).unwrap();
        assert_eq!(outcome.action, PlanAction::Destroy);
        assert_eq!(outcome.planned, None);
    }

    #[test]
    fn schema_debug_lists_rules() {
        let text = format!("{:?}", special_schema());
        assert!(text.contains("default_value"));
        assert_eq!(special_schema().rule_count(), 2);
    }
}
