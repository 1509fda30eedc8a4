//! Alias reconciliation for two attributes with one meaning

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::path::AttributePath;
use crate::rule::{AttributePlanRule, RuleKind, RuleRequest, RuleResponse};
use crate::value::AttrValue;

/// Keeps a legacy attribute and its replacement in agreement
///
/// Attach one instance to each attribute of the pair, each holding the
/// sibling's configured value. Both then plan to the same value:
/// - both configured and different: error naming both paths
/// - one configured: that value
/// - neither configured: `default`
/// - either unknown (and the other not configured): unknown
///
/// The conflict diagnostic is worded identically from both sides so the
/// pass reports it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedFieldRule {
    sibling: AttributePath,
    sibling_config: AttrValue<bool>,
    default: bool,
}

impl PairedFieldRule {
    /// Create rule for one side of a pair
    #[inline]
    #[must_use]
    pub fn new(sibling: AttributePath, sibling_config: AttrValue<bool>, default: bool) -> Self {
        Self {
            sibling,
            sibling_config,
            default,
        }
    }

    fn conflict(&self, own: &AttributePath) -> Diagnostic {
        let (first, second) = if own <= &self.sibling {
            (own, &self.sibling)
        } else {
            (&self.sibling, own)
        };
        Diagnostic::error(
            DiagnosticKind::InconsistentConfiguration,
            Some(first.clone()),
            format!("{first} and {second} are configured with different values"),
            format!(
                "{first} and {second} are aliases and must agree when both are set; \
                 remove one of them or make them equal"
            ),
        )
    }
}

impl AttributePlanRule<bool> for PairedFieldRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Default
    }

    fn apply(&self, req: &RuleRequest<'_, bool>, resp: &mut RuleResponse<bool>) {
        resp.plan = match (req.config, &self.sibling_config) {
            (AttrValue::Known(own), AttrValue::Known(sibling)) if own != sibling => {
                resp.diagnostics.push(self.conflict(req.path));
                AttrValue::Known(*own)
            }
            (AttrValue::Known(own), _) => AttrValue::Known(*own),
            (AttrValue::Null, AttrValue::Known(sibling)) => AttrValue::Known(*sibling),
            (AttrValue::Null, AttrValue::Null) => AttrValue::Known(self.default),
            (AttrValue::Unknown, _) | (AttrValue::Null, AttrValue::Unknown) => AttrValue::Unknown,
        };
    }

    fn name(&self) -> &'static str {
        "paired_field_reconciliation"
    }
}
