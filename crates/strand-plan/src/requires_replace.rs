//! Replacement rules for scalar attributes
//!
//! - [`UnconditionalReplaceRule`]: any change forces recreation
//! - [`EmptyToNullReplaceRule`]: any change except `""` → null

use std::fmt::Debug;

use crate::rule::{AttributePlanRule, PlanPhase, RuleKind, RuleRequest, RuleResponse};

/// Forces recreation whenever the planned value differs from state
///
/// No-op while creating or destroying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnconditionalReplaceRule;

impl UnconditionalReplaceRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<T> AttributePlanRule<T> for UnconditionalReplaceRule
where
    T: PartialEq + Debug,
{
    fn kind(&self) -> RuleKind {
        RuleKind::Replacement
    }

    fn apply(&self, req: &RuleRequest<'_, T>, resp: &mut RuleResponse<T>) {
        if req.phase != PlanPhase::Update {
            return;
        }
        if req.plan != req.state {
            resp.requires_replace = true;
        }
    }

    fn name(&self) -> &'static str {
        "requires_replace"
    }
}

/// Forces recreation on change, tolerating a stored `""` becoming null
///
/// Older releases stored an unset string attribute as `""`; current
/// releases store null. Without this exception every such resource would be
/// recreated (and its value regenerated) on the first plan after upgrade.
///
/// Decision table for the update phase:
///
/// | config  | state       | replace |
/// |---------|-------------|---------|
/// | unknown | any         | deferred (no) |
/// | = state | = config    | no      |
/// | null    | `""`        | no      |
/// | null    | non-empty   | yes     |
/// | set     | differs     | yes     |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyToNullReplaceRule;

impl EmptyToNullReplaceRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AttributePlanRule<String> for EmptyToNullReplaceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Replacement
    }

    fn apply(&self, req: &RuleRequest<'_, String>, resp: &mut RuleResponse<String>) {
        if req.phase != PlanPhase::Update {
            return;
        }
        if req.config.is_unknown() {
            return;
        }
        if req.plan == req.state {
            return;
        }
        if req.config.is_null() && req.state.as_known().is_some_and(String::is_empty) {
            return;
        }
        resp.requires_replace = true;
    }

    fn name(&self) -> &'static str {
        "requires_replace_unless_empty_string_to_null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AttributePath;
    use crate::value::AttrValue;
    use proptest::prelude::*;

    fn replaces<T, R>(rule: &R, phase: PlanPhase, config: AttrValue<T>, state: AttrValue<T>) -> bool
    where
        T: Clone,
        R: AttributePlanRule<T>,
    {
        let path = AttributePath::root("attr");
        let req = RuleRequest {
            path: &path,
            phase,
            config: &config,
            state: &state,
            plan: &config,
        };
        let mut resp = RuleResponse::unchanged(config.clone());
        rule.apply(&req, &mut resp);
        resp.requires_replace
    }

    fn s(v: &str) -> AttrValue<String> {
        AttrValue::Known(v.to_string())
    }

    #[test]
    fn unconditional_change_replaces() {
        let rule = UnconditionalReplaceRule::new();
        assert!(replaces(&rule, PlanPhase::Update, AttrValue::Known(12), AttrValue::Known(10)));
        assert!(replaces(&rule, PlanPhase::Update, AttrValue::Unknown, AttrValue::Known(10)));
    }

    #[test]
    fn unconditional_noop_outside_update() {
        let rule = UnconditionalReplaceRule::new();
        assert!(!replaces(&rule, PlanPhase::Create, AttrValue::Known(12), AttrValue::Null));
        assert!(!replaces(&rule, PlanPhase::Destroy, AttrValue::Null, AttrValue::Known(10)));
    }

    #[test]
    fn empty_to_null_tolerated() {
        let rule = EmptyToNullReplaceRule::new();
        assert!(!replaces(&rule, PlanPhase::Update, AttrValue::Null, s("")));
    }

    #[test]
    fn null_over_nonempty_replaces() {
        let rule = EmptyToNullReplaceRule::new();
        assert!(replaces(&rule, PlanPhase::Update, AttrValue::Null, s("!@")));
    }

    #[test]
    fn configured_change_replaces() {
        let rule = EmptyToNullReplaceRule::new();
        assert!(replaces(&rule, PlanPhase::Update, s("!"), s("")));
        assert!(replaces(&rule, PlanPhase::Update, s("!"), AttrValue::Null));
        assert!(replaces(&rule, PlanPhase::Update, s("!"), s("#")));
    }

    #[test]
    fn unknown_config_defers() {
        let rule = EmptyToNullReplaceRule::new();
        assert!(!replaces(&rule, PlanPhase::Update, AttrValue::Unknown, s("!")));
    }

    #[test]
    fn equal_values_keep() {
        let rule = EmptyToNullReplaceRule::new();
        assert!(!replaces(&rule, PlanPhase::Update, s("!"), s("!")));
        assert!(!replaces(&rule, PlanPhase::Update, AttrValue::Null, AttrValue::Null));
        assert!(!replaces(&rule, PlanPhase::Create, s("!"), AttrValue::Null));
    }

    proptest! {
        #[test]
        fn prop_unconditional_idempotent(value in any::<Option<i64>>()) {
            let v = AttrValue::from(value);
            prop_assert!(!replaces(&UnconditionalReplaceRule::new(), PlanPhase::Update, v.clone(), v));
        }

        #[test]
        fn prop_empty_to_null_idempotent(value in proptest::option::of(".{0,8}")) {
            let v = AttrValue::from(value);
            prop_assert!(!replaces(&EmptyToNullReplaceRule::new(), PlanPhase::Update, v.clone(), v));
        }
    }
}
