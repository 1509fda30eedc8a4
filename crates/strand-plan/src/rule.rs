//! Attribute plan rule trait and request/response types
//!
//! Provides the [`AttributePlanRule`] trait: one unit of plan-time decision
//! logic applied to a single attribute.

use std::fmt::Debug;

use crate::diagnostic::Diagnostics;
use crate::path::AttributePath;
use crate::value::AttrValue;

/// Lifecycle stage being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanPhase {
    /// No prior state
    Create,

    /// Prior state and configuration both present
    Update,

    /// Prior state present, configuration removed
    Destroy,
}

impl PlanPhase {
    /// Derive the phase from what is present
    #[inline]
    #[must_use]
    pub fn from_presence(has_config: bool, has_prior_state: bool) -> Self {
        match (has_config, has_prior_state) {
            (true, false) => Self::Create,
            (false, _) => Self::Destroy,
            (true, true) => Self::Update,
        }
    }
}

/// Rule capability
///
/// The plan pass runs every `Default` rule of an attribute before any
/// `Replacement` rule, whatever order they were registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Computes the planned value
    Default,

    /// Decides whether the change forces recreation
    Replacement,
}

/// Inputs visible to a rule
#[derive(Debug)]
pub struct RuleRequest<'a, T> {
    /// Attribute being planned
    pub path: &'a AttributePath,

    /// Lifecycle stage
    pub phase: PlanPhase,

    /// Configured value
    pub config: &'a AttrValue<T>,

    /// Stored value (`Null` when creating)
    pub state: &'a AttrValue<T>,

    /// Planned value as left by earlier rules
    pub plan: &'a AttrValue<T>,
}

/// Rule outputs
#[derive(Debug)]
pub struct RuleResponse<T> {
    /// Planned value after this rule
    pub plan: AttrValue<T>,

    /// Set to force recreation
    pub requires_replace: bool,

    /// Findings
    pub diagnostics: Diagnostics,
}

impl<T> RuleResponse<T> {
    /// Response that changes nothing
    #[inline]
    #[must_use]
    pub fn unchanged(plan: AttrValue<T>) -> Self {
        Self {
            plan,
            requires_replace: false,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Plan-time decision logic for one attribute
///
/// Implementations must be pure functions of the request: no I/O, no
/// randomness, no state carried between calls.
pub trait AttributePlanRule<T>: Send + Sync + Debug {
    /// Capability of this rule
    fn kind(&self) -> RuleKind;

    /// Apply the rule
    fn apply(&self, req: &RuleRequest<'_, T>, resp: &mut RuleResponse<T>);

    /// Rule name (for tracing)
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_from_presence() {
        assert_eq!(PlanPhase::from_presence(true, false), PlanPhase::Create);
        assert_eq!(PlanPhase::from_presence(true, true), PlanPhase::Update);
        assert_eq!(PlanPhase::from_presence(false, true), PlanPhase::Destroy);
    }

    #[test]
    fn unchanged_response() {
        let resp = RuleResponse::unchanged(AttrValue::known(1));
        assert_eq!(resp.plan, AttrValue::Known(1));
        assert!(!resp.requires_replace);
        assert!(resp.diagnostics.is_empty());
    }
}
