//! Provider: one configured instance of every resource kind
//!
//! Construction validates the configuration and every upgrade chain, so a
//! broken chain is reported at startup rather than on the first read.

use strand_state::BcryptHasher;

use crate::config::StrandConfig;
use crate::error::StrandError;
use crate::resource::ResourceKind;
use crate::resources::{RandomInteger, RandomPassword, RandomShuffle, RandomString};

/// All resource kinds sharing one configuration
#[derive(Debug)]
pub struct Provider {
    config: StrandConfig,
    string: RandomString,
    password: RandomPassword,
    integer: RandomInteger,
    shuffle: RandomShuffle,
}

impl Provider {
    /// Names of the supported kinds
    pub const KINDS: [&'static str; 4] = [
        RandomString::NAME,
        RandomPassword::NAME,
        RandomInteger::NAME,
        RandomShuffle::NAME,
    ];

    /// Create provider
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or an upgrade chain is
    /// broken
    pub fn new(config: StrandConfig) -> Result<Self, StrandError> {
        config.validate()?;
        let hasher = BcryptHasher::new(config.bcrypt_cost)?;

        let provider = Self {
            string: RandomString::new()?,
            password: RandomPassword::new(hasher)?,
            integer: RandomInteger::new()?,
            shuffle: RandomShuffle::new()?,
            config,
        };
        tracing::info!(
            version = crate::VERSION,
            bcrypt_cost = provider.config.bcrypt_cost,
            "provider ready"
        );
        Ok(provider)
    }

    /// Parse TOML configuration and create provider
    ///
    /// # Errors
    /// Returns error if the configuration is malformed or invalid
    pub fn from_toml_str(text: &str) -> Result<Self, StrandError> {
        Self::new(StrandConfig::from_toml_str(text)?)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StrandConfig {
        &self.config
    }

    /// `random_string`
    #[inline]
    #[must_use]
    pub fn string(&self) -> &RandomString {
        &self.string
    }

    /// `random_password`
    #[inline]
    #[must_use]
    pub fn password(&self) -> &RandomPassword {
        &self.password
    }

    /// `random_integer`
    #[inline]
    #[must_use]
    pub fn integer(&self) -> &RandomInteger {
        &self.integer
    }

    /// `random_shuffle`
    #[inline]
    #[must_use]
    pub fn shuffle(&self) -> &RandomShuffle {
        &self.shuffle
    }
}
