//! Testing utilities for Strand workspace
//!
//! Shared randomness sources, keepers builders and legacy state fixtures.

#![allow(missing_docs)]

use serde_json::{json, Value};
use strand_charset::{RandomSource, RandomSourceError, SeededRandomSource};
use strand_plan::Keepers;

/// A source that always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSource;

impl RandomSource for FailingSource {
    fn fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), RandomSourceError> {
        Err(RandomSourceError::Unavailable("test source disabled".to_string()))
    }
}

/// Wraps a source and counts the bytes it hands out
#[derive(Debug)]
pub struct CountingSource<R> {
    inner: R,
    bytes: usize,
}

impl<R> CountingSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, bytes: 0 }
    }

    pub fn bytes_drawn(&self) -> usize {
        self.bytes
    }
}

impl<R: RandomSource> RandomSource for CountingSource<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandomSourceError> {
        self.inner.fill_bytes(dest)?;
        self.bytes += dest.len();
        Ok(())
    }
}

pub fn seeded(seed: u64) -> SeededRandomSource {
    SeededRandomSource::from_u64(seed)
}

pub fn counting(seed: u64) -> CountingSource<SeededRandomSource> {
    CountingSource::new(seeded(seed))
}

pub fn keepers(pairs: &[(&str, &str)]) -> Keepers {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), Some((*v).to_string())))
        .collect()
}

/// `random_string` state as written before minimums existed
pub fn string_state_v0(result: &str, number: bool) -> Value {
    json!({
        "id": result,
        "keepers": null,
        "length": result.chars().count(),
        "special": true,
        "upper": true,
        "lower": true,
        "number": number,
        "override_special": "",
        "result": result,
    })
}

/// `random_string` state with minimums but no `numeric`
pub fn string_state_v1(result: &str, min_numeric: i64) -> Value {
    json!({
        "id": result,
        "keepers": null,
        "length": result.chars().count(),
        "special": true,
        "upper": true,
        "lower": true,
        "number": true,
        "min_numeric": min_numeric,
        "min_upper": 0,
        "min_lower": 0,
        "min_special": 0,
        "override_special": null,
        "result": result,
    })
}

/// `random_password` state as written before hashing existed
pub fn password_state_v0(result: &str) -> Value {
    json!({
        "id": "none",
        "length": result.chars().count(),
        "special": true,
        "upper": true,
        "lower": true,
        "number": true,
        "min_numeric": 0,
        "min_upper": 0,
        "min_lower": 0,
        "min_special": 0,
        "result": result,
    })
}

/// `random_password` state with a hash but no `numeric`
pub fn password_state_v1(result: &str, bcrypt_hash: &str) -> Value {
    let mut value = password_state_v0(result);
    value["bcrypt_hash"] = json!(bcrypt_hash);
    value
}

/// `random_password` state in the shape shared by v2 and v3
pub fn password_state_v2(result: &str, bcrypt_hash: &str) -> Value {
    let mut value = password_state_v1(result, bcrypt_hash);
    value["numeric"] = json!(true);
    value
}

pub fn integer_state(result: i64, min: i64, max: i64) -> Value {
    json!({
        "id": result.to_string(),
        "keepers": null,
        "min": min,
        "max": max,
        "seed": null,
        "result": result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_source_fails() {
        assert!(FailingSource.next_u64().is_err());
    }

    #[test]
    fn counting_source_counts() {
        let mut source = counting(1);
        source.next_u64().unwrap();
        assert_eq!(source.bytes_drawn(), 8);
    }

    #[test]
    fn password_fixtures_layer() {
        let v2 = password_state_v2("x", "h");
        assert_eq!(v2["bcrypt_hash"], "h");
        assert_eq!(v2["numeric"], true);
        assert_eq!(v2["result"], "x");
    }
}
