//! bcrypt hashing of generated passwords

use crate::error::HashError;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Derives and checks `bcrypt_hash` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create hasher with a work factor
    ///
    /// # Errors
    /// Returns [`HashError::InvalidCost`] outside bcrypt's range
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(HashError::InvalidCost {
                cost,
                min: MIN_BCRYPT_COST,
                max: MAX_BCRYPT_COST,
            });
        }
        Ok(Self { cost })
    }

    /// Work factor
    #[inline]
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a secret
    ///
    /// # Errors
    /// Returns error if bcrypt fails
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        Ok(bcrypt::hash(secret, self.cost)?)
    }

    /// Check a secret against a stored hash
    ///
    /// A malformed hash does not verify.
    #[must_use]
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        bcrypt::verify(secret, hash).unwrap_or(false)
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_range_enforced() {
        assert!(BcryptHasher::new(3).is_err());
        assert!(BcryptHasher::new(32).is_err());
        assert_eq!(BcryptHasher::new(4).unwrap().cost(), 4);
        assert_eq!(BcryptHasher::default().cost(), DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn hash_verifies_against_secret_only() {
        let hasher = BcryptHasher::new(MIN_BCRYPT_COST).unwrap();
        let hash = hasher.hash("s3cr3t!").unwrap();
        assert!(hasher.verify("s3cr3t!", &hash));
        assert!(!hasher.verify("other", &hash));
        assert!(!hasher.verify("s3cr3t!", "not-a-hash"));
    }
}
