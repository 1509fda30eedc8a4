//! Strand Plan
//!
//! Plan-time consistency rules for generated resources.
//!
//! # Core Concepts
//!
//! - [`AttrValue`]: null / unknown / known attribute values
//! - [`AttributePlanRule`]: one unit of plan-time logic, either a default
//!   ([`DefaultValueRule`], [`PairedFieldRule`]) or a replacement decision
//!   ([`UnconditionalReplaceRule`], [`EmptyToNullReplaceRule`],
//!   [`KeyedMapReplaceRule`])
//! - [`AttributeSchema`]: an attribute and its rules
//! - [`PlanPass`]: plans a whole resource and reports every diagnostic at once
//!
//! # Example
//!
//! ```rust
//! use strand_plan::{
//!     AttrValue, AttributeSchema, DefaultValueRule, PlanAction, PlanPass, PlanPhase,
//!     UnconditionalReplaceRule,
//! };
//!
//! let upper = AttributeSchema::new("upper")
//!     .with_rule(DefaultValueRule::new(true))
//!     .with_rule(UnconditionalReplaceRule::new());
//!
//! let mut pass = PlanPass::new(PlanPhase::Update);
//! let planned = pass.plan_attribute(&upper, &AttrValue::Known(false), &AttrValue::Known(true));
//! assert!(planned.requires_replace);
//!
//! let outcome = pass.finish(Some(planned.value)).unwrap();
//! assert_eq!(outcome.action, PlanAction::Replace);
//! ```

#![warn(unreachable_pub)]

mod default_value;
mod diagnostic;
mod engine;
mod keyed_map;
mod paired_field;
mod path;
mod requires_replace;
mod rule;
mod value;

// Re-exports
pub use default_value::DefaultValueRule;
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use engine::{AttributePlan, AttributeSchema, PlanAction, PlanError, PlanOutcome, PlanPass};
pub use keyed_map::KeyedMapReplaceRule;
pub use paired_field::PairedFieldRule;
pub use path::AttributePath;
pub use requires_replace::{EmptyToNullReplaceRule, UnconditionalReplaceRule};
pub use rule::{AttributePlanRule, PlanPhase, RuleKind, RuleRequest, RuleResponse};
pub use value::{AttrValue, Keepers};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing resource planners
    pub use crate::{
        AttrValue, AttributePath, AttributeSchema, DefaultValueRule, Diagnostic, DiagnosticKind,
        EmptyToNullReplaceRule, Keepers, KeyedMapReplaceRule, PairedFieldRule, PlanAction,
        PlanError, PlanOutcome, PlanPass, PlanPhase, UnconditionalReplaceRule,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
