//! Replacement rule for map-valued attributes (keepers)

use crate::rule::{AttributePlanRule, PlanPhase, RuleKind, RuleRequest, RuleResponse};
use crate::value::{AttrValue, Keepers};

/// Forces recreation when a map changes, ignoring null-only differences
///
/// Older releases dropped map entries whose value was null, and stored a map
/// of only-null entries as no map at all. A configuration that differs from
/// state only by such entries therefore describes the same resource.
///
/// In the update phase:
/// - equal maps never replace
/// - state null: replace only if some configured value is non-null
/// - state present: replace if a stored key is no longer configured, or a
///   configured key has a different value, unless that key is absent from
///   state and configured as null
/// - unknown configuration replaces, since the final map cannot be proven
///   equal to state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyedMapReplaceRule;

impl KeyedMapReplaceRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Core comparison, shared by the rule and by callers that only hold maps
    #[must_use]
    pub fn requires_replace(config: &AttrValue<Keepers>, state: &AttrValue<Keepers>) -> bool {
        if config == state {
            return false;
        }

        let config = match config {
            AttrValue::Unknown => return true,
            AttrValue::Null => None,
            AttrValue::Known(map) => Some(map),
        };
        let state = match state {
            AttrValue::Unknown => return true,
            AttrValue::Null => None,
            AttrValue::Known(map) => Some(map),
        };

        match (config, state) {
            (None, None) => false,
            (Some(config), None) => config.values().any(Option::is_some),
            (None, Some(state)) => !state.is_empty(),
            (Some(config), Some(state)) => {
                let changed = config.iter().any(|(key, value)| match state.get(key) {
                    None => value.is_some(),
                    Some(stored) => stored != value,
                });
                let removed = state.keys().any(|key| !config.contains_key(key));
                changed || removed
            }
        }
    }
}

impl AttributePlanRule<Keepers> for KeyedMapReplaceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Replacement
    }

    fn apply(&self, req: &RuleRequest<'_, Keepers>, resp: &mut RuleResponse<Keepers>) {
        if req.phase != PlanPhase::Update {
            return;
        }
        if Self::requires_replace(req.plan, req.state) {
            resp.requires_replace = true;
        }
    }

    fn name(&self) -> &'static str {
        "requires_replace_if_values_not_null"
    }
}
