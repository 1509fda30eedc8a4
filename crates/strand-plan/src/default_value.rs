//! Default value injection

use std::fmt::Debug;

use crate::rule::{AttributePlanRule, RuleKind, RuleRequest, RuleResponse};
use crate::value::AttrValue;

/// Plans `default` when the attribute is not configured
///
/// Unknown and known configuration pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValueRule<T> {
    default: T,
}

impl<T> DefaultValueRule<T> {
    /// Create rule with the value to inject
    #[inline]
    #[must_use]
    pub fn new(default: T) -> Self {
        Self { default }
    }
}

impl<T> AttributePlanRule<T> for DefaultValueRule<T>
where
    T: Clone + Debug + Send + Sync,
{
    fn kind(&self) -> RuleKind {
        RuleKind::Default
    }

    fn apply(&self, req: &RuleRequest<'_, T>, resp: &mut RuleResponse<T>) {
        if req.config.is_null() {
            resp.plan = AttrValue::Known(self.default.clone());
        }
    }

    fn name(&self) -> &'static str {
        "default_value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AttributePath;
    use crate::rule::PlanPhase;

    fn plan(config: AttrValue<bool>) -> AttrValue<bool> {
        let path = AttributePath::root("special");
        let state = AttrValue::Null;
        let req = RuleRequest {
            path: &path,
            phase: PlanPhase::Create,
            config: &config,
            state: &state,
            plan: &config,
        };
        let mut resp = RuleResponse::unchanged(config.clone());
        DefaultValueRule::new(true).apply(&req, &mut resp);
        assert!(!resp.requires_replace);
        resp.plan
    }

    #[test]
    fn null_gets_default() {
        assert_eq!(plan(AttrValue::Null), AttrValue::Known(true));
    }

    #[test]
    fn configured_passes_through() {
        assert_eq!(plan(AttrValue::Known(false)), AttrValue::Known(false));
        assert_eq!(plan(AttrValue::Unknown), AttrValue::Unknown);
    }
}
