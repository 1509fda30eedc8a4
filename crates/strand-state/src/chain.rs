//! State upgrade chain
//!
//! An [`UpgradeChain`] is a linear sequence of [`UpgradeStep`]s, one per
//! version boundary, that rewrites stored attributes into the current shape.
//!
//! # Core Concepts
//!
//! - Each step maps exactly `N → N+1` between two typed structs
//! - A step that changes the committed result is rejected at run time
//! - A chain with a missing link cannot be built

use std::fmt::{self, Debug, Formatter};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DeriveError, UpgradeError};
use crate::version::{SchemaVersion, StoredState};

/// State that carries a committed generated value
pub trait GeneratedValue {
    /// Type of the generated value
    type Output: PartialEq;

    /// The committed value
    fn result(&self) -> &Self::Output;
}

type Transform = dyn Fn(Value, &'static str) -> Result<Value, UpgradeError> + Send + Sync;

/// One `N → N+1` transform
pub struct UpgradeStep {
    from: SchemaVersion,
    transform: Box<Transform>,
}

impl UpgradeStep {
    /// Build a step between two typed shapes
    ///
    /// The wrapped transform decodes `A`, applies `f`, checks that the result
    /// is untouched, then encodes `B`.
    pub fn typed<A, B, F>(from: SchemaVersion, f: F) -> Self
    where
        A: DeserializeOwned + GeneratedValue + 'static,
        A::Output: Clone,
        B: Serialize + GeneratedValue<Output = A::Output> + 'static,
        F: Fn(A) -> Result<B, DeriveError> + Send + Sync + 'static,
    {
        let transform = move |value: Value, kind: &'static str| {
            let old: A = serde_json::from_value(value).map_err(|source| UpgradeError::Decode {
                kind,
                version: from,
                source,
            })?;
            let before = old.result().clone();
            let new = f(old).map_err(|err| UpgradeError::Derive {
                kind,
                from,
                attribute: err.attribute,
                source: err.source,
            })?;
            if *new.result() != before {
                return Err(UpgradeError::ResultChanged { kind, from });
            }
            serde_json::to_value(&new).map_err(|source| UpgradeError::Encode {
                kind,
                version: from.next(),
                source,
            })
        };
        Self {
            from,
            transform: Box::new(transform),
        }
    }

    /// Version this step upgrades from
    #[inline]
    #[must_use]
    pub fn from_version(&self) -> SchemaVersion {
        self.from
    }

    fn run(&self, kind: &'static str, value: Value) -> Result<Value, UpgradeError> {
        (self.transform)(value, kind)
    }
}

impl Debug for UpgradeStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeStep")
            .field("from", &self.from)
            .field("to", &self.from.next())
            .finish_non_exhaustive()
    }
}

/// Ordered transforms from version 0 to the current version of one kind
#[derive(Debug)]
pub struct UpgradeChain {
    kind: &'static str,
    current: SchemaVersion,
    steps: Vec<UpgradeStep>,
}

impl UpgradeChain {
    /// Start building a chain
    #[inline]
    #[must_use]
    pub fn builder(kind: &'static str, current: SchemaVersion) -> UpgradeChainBuilder {
        UpgradeChainBuilder {
            kind,
            current,
            steps: Vec::new(),
        }
    }

    /// Resource kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Version every upgrade ends at
    #[inline]
    #[must_use]
    pub fn current(&self) -> SchemaVersion {
        self.current
    }

    /// Rewrite attributes stored at `from` into the current shape
    ///
    /// # Errors
    /// - [`UpgradeError::UnsupportedVersion`] if `from` is newer than current
    /// - any error of a step; no partial result is returned
    pub fn upgrade(&self, mut value: Value, from: SchemaVersion) -> Result<Value, UpgradeError> {
        if from > self.current {
            return Err(UpgradeError::UnsupportedVersion {
                kind: self.kind,
                found: from,
                current: self.current,
            });
        }

        for step in self.steps.iter().filter(|s| s.from >= from) {
            value = step.run(self.kind, value).map_err(|err| {
                tracing::error!(kind = self.kind, from = %step.from, error = %err, "state upgrade failed");
                err
            })?;
            tracing::debug!(kind = self.kind, from = %step.from, to = %step.from.next(), "state upgraded");
        }
        Ok(value)
    }

    /// Upgrade stored state and decode the current shape
    ///
    /// # Errors
    /// Returns error if upgrading or decoding fails
    pub fn read<T: DeserializeOwned>(&self, stored: StoredState) -> Result<T, UpgradeError> {
        let value = self.upgrade(stored.attributes, stored.schema_version)?;
        serde_json::from_value(value).map_err(|source| UpgradeError::Decode {
            kind: self.kind,
            version: self.current,
            source,
        })
    }

    /// Encode a current-shape state for storage
    ///
    /// # Errors
    /// Returns error if the state cannot be represented as JSON
    pub fn store<T: Serialize>(&self, state: &T) -> Result<StoredState, UpgradeError> {
        StoredState::encode(self.current, state).map_err(|source| UpgradeError::Encode {
            kind: self.kind,
            version: self.current,
            source,
        })
    }
}

/// Builder for [`UpgradeChain`]
#[derive(Debug)]
pub struct UpgradeChainBuilder {
    kind: &'static str,
    current: SchemaVersion,
    steps: Vec<UpgradeStep>,
}

impl UpgradeChainBuilder {
    /// Add a step (any order)
    #[inline]
    #[must_use]
    pub fn step(mut self, step: UpgradeStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// Returns [`UpgradeError::ChainBroken`] unless there is exactly one step
    /// from every version below current
    pub fn build(mut self) -> Result<UpgradeChain, UpgradeError> {
        self.steps.sort_by_key(UpgradeStep::from_version);

        let mut expected = SchemaVersion::INITIAL;
        for step in &self.steps {
            if step.from != expected || expected >= self.current {
                return Err(UpgradeError::ChainBroken {
                    kind: self.kind,
                    from: expected,
                    current: self.current,
                });
            }
            expected = expected.next();
        }
        if expected != self.current {
            return Err(UpgradeError::ChainBroken {
                kind: self.kind,
                from: expected,
                current: self.current,
            });
        }

        Ok(UpgradeChain {
            kind: self.kind,
            current: self.current,
            steps: self.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct V0 {
        result: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct V1 {
        result: String,
        flag: bool,
    }

    impl GeneratedValue for V0 {
        type Output = String;
        fn result(&self) -> &String {
            &self.result
        }
    }

    impl GeneratedValue for V1 {
        type Output = String;
        fn result(&self) -> &String {
            &self.result
        }
    }

    fn add_flag() -> UpgradeStep {
        UpgradeStep::typed(SchemaVersion::new(0), |old: V0| {
            Ok(V1 {
                result: old.result,
                flag: true,
            })
        })
    }

    #[test]
    fn upgrade_runs_steps_from_stored_version() {
        let chain = UpgradeChain::builder("test", SchemaVersion::new(1))
            .step(add_flag())
            .build()
            .unwrap();

        let upgraded = chain.upgrade(json!({"result": "abc"}), SchemaVersion::new(0)).unwrap();
        assert_eq!(upgraded, json!({"result": "abc", "flag": true}));

        let current = json!({"result": "abc", "flag": false});
        assert_eq!(chain.upgrade(current.clone(), SchemaVersion::new(1)).unwrap(), current);
    }

    #[test]
    fn missing_link_rejected_at_build() {
        let err = UpgradeChain::builder("test", SchemaVersion::new(2))
            .step(add_flag())
            .build()
            .unwrap_err();
        assert!(err.is_internal_defect());
        assert!(matches!(err, UpgradeError::ChainBroken { from, .. } if from == SchemaVersion::new(1)));
    }

    #[test]
    fn steps_ordered_by_source_version() {
        let bump = UpgradeStep::typed(SchemaVersion::new(1), |old: V1| Ok(old));
        assert_eq!(bump.from_version(), SchemaVersion::new(1));
        assert_eq!(add_flag().from_version(), SchemaVersion::INITIAL);

        let chain = UpgradeChain::builder("test", SchemaVersion::new(2))
            .step(bump)
            .step(add_flag())
            .build()
            .unwrap();
        let upgraded = chain.upgrade(json!({"result": "x"}), SchemaVersion::INITIAL).unwrap();
        assert_eq!(upgraded, json!({"result": "x", "flag": true}));
    }

    #[test]
    fn duplicate_or_excess_step_rejected() {
        assert!(UpgradeChain::builder("test", SchemaVersion::new(1))
            .step(add_flag())
            .step(add_flag())
            .build()
            .is_err());
        assert!(UpgradeChain::builder("test", SchemaVersion::new(0))
            .step(add_flag())
            .build()
            .is_err());
    }

    #[test]
    fn empty_chain_at_version_zero() {
        let chain = UpgradeChain::builder("test", SchemaVersion::INITIAL).build().unwrap();
        let value = json!({"result": 7});
        assert_eq!(chain.upgrade(value.clone(), SchemaVersion::INITIAL).unwrap(), value);
    }

    #[test]
    fn newer_state_unsupported() {
        let chain = UpgradeChain::builder("test", SchemaVersion::INITIAL).build().unwrap();
        let err = chain.upgrade(json!({}), SchemaVersion::new(1)).unwrap_err();
        assert!(matches!(err, UpgradeError::UnsupportedVersion { .. }));
    }

    #[test]
    fn result_change_detected() {
        let chain = UpgradeChain::builder("test", SchemaVersion::new(1))
            .step(UpgradeStep::typed(SchemaVersion::new(0), |old: V0| {
                Ok(V1 {
                    result: old.result.to_uppercase(),
                    flag: true,
                })
            }))
            .build()
            .unwrap();
        let err = chain.upgrade(json!({"result": "abc"}), SchemaVersion::new(0)).unwrap_err();
        assert!(matches!(err, UpgradeError::ResultChanged { .. }));
    }

    #[test]
    fn malformed_state_is_decode_error() {
        let chain = UpgradeChain::builder("test", SchemaVersion::new(1))
            .step(add_flag())
            .build()
            .unwrap();
        let err = chain.upgrade(json!({"length": 3}), SchemaVersion::new(0)).unwrap_err();
        assert!(matches!(err, UpgradeError::Decode { .. }));
    }
}
