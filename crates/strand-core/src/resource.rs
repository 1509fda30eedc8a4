//! Resource kind abstraction
//!
//! Every generated-value resource goes through the same lifecycle:
//!
//! ```text
//! read (upgrade) → plan → apply (generate or carry forward) → write
//! ```
//!
//! [`ResourceKind`] is implemented once per kind; [`converge`] drives one
//! plan-then-apply cycle.

use strand_charset::RandomSource;
use strand_plan::{PlanAction, PlanError, PlanOutcome};
use strand_state::StoredState;

use crate::error::StrandError;

/// One kind of generated resource
pub trait ResourceKind: Send + Sync {
    /// Kind name, as used in persisted state
    const NAME: &'static str;

    /// Configured inputs
    type Config;

    /// Planned inputs plus computed attributes
    type Planned;

    /// Current-shape persisted state
    type State;

    /// Plan from configuration and prior state
    ///
    /// `config == None` plans destruction.
    ///
    /// # Errors
    /// Returns [`PlanError`] carrying every error diagnostic of the pass
    fn plan(
        &self,
        config: Option<&Self::Config>,
        prior: Option<&Self::State>,
    ) -> Result<PlanOutcome<Self::Planned>, PlanError>;

    /// Produce the new state for a plan
    ///
    /// Generates when the planned value is unknown, otherwise carries the
    /// prior value forward.
    ///
    /// # Errors
    /// Returns error if generation fails or the plan is not applicable
    fn apply(
        &self,
        planned: &Self::Planned,
        prior: Option<&Self::State>,
        source: &mut dyn RandomSource,
    ) -> Result<Self::State, StrandError>;

    /// Decode stored state, upgrading it first if needed
    ///
    /// # Errors
    /// Returns error if the upgrade chain fails
    fn read(&self, stored: StoredState) -> Result<Self::State, StrandError>;

    /// Encode state at the current schema version
    ///
    /// # Errors
    /// Returns error if encoding fails
    fn write(&self, state: &Self::State) -> Result<StoredState, StrandError>;

    /// Build state from an import identifier
    ///
    /// # Errors
    /// Returns [`StrandError::Import`] if the identifier is not understood
    fn import(&self, id: &str) -> Result<Self::State, StrandError>;
}

/// Plan and, unless destroying, apply
///
/// Returns the action taken and the resulting state (`None` after destroy).
///
/// # Errors
/// Returns the plan rejection or the apply failure
pub fn converge<K: ResourceKind>(
    kind: &K,
    config: Option<&K::Config>,
    prior: Option<&K::State>,
    source: &mut dyn RandomSource,
) -> Result<(PlanAction, Option<K::State>), StrandError> {
    let span = tracing::info_span!("converge", resource = K::NAME);
    let _guard = span.enter();

    let outcome = kind.plan(config, prior)?;
    for warning in outcome.diagnostics.warnings() {
        tracing::warn!(%warning, "plan warning");
    }

    let Some(planned) = outcome.planned.as_ref() else {
        tracing::info!(action = ?outcome.action, "resource removed");
        return Ok((outcome.action, None));
    };

    let state = kind.apply(planned, prior, source)?;
    tracing::info!(action = ?outcome.action, "resource converged");
    Ok((outcome.action, Some(state)))
}
