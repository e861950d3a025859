//! Validator configuration.
//!
//! [`ValidatorConfig`] is plain data so it can be deserialized from any
//! `config`/serde source. Every field carries a default, so an empty document
//! produces a working configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::certificate::FetcherConfig;
use crate::error::ConfigError;
use crate::signature::SignatureEncoding;
use crate::trust::{TrustPolicy, DEFAULT_HOST_PATTERN};

/// Settings applied uniformly to every validation made by one validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Regular expression the signing certificate host must match
    pub host_pattern: String,
    /// Text encoding of the signed canonical string
    pub encoding: SignatureEncoding,
    /// Certificate download timeout in seconds
    pub fetch_timeout_seconds: u64,
    /// Certificate connection timeout in seconds
    pub connect_timeout_seconds: u64,
    /// User agent for certificate downloads
    pub user_agent: String,
    /// Refuse plain HTTP at the client level
    pub https_only: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        let fetcher = FetcherConfig::default();
        Self {
            host_pattern: DEFAULT_HOST_PATTERN.to_string(),
            encoding: SignatureEncoding::default(),
            fetch_timeout_seconds: fetcher.timeout.as_secs(),
            connect_timeout_seconds: fetcher.connect_timeout.as_secs(),
            user_agent: fetcher.user_agent,
            https_only: fetcher.https_only,
        }
    }
}

impl ValidatorConfig {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidHostPattern`] if the pattern does not compile.
    /// - [`ConfigError::InvalidValue`] for zero timeouts or an empty user agent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trust_policy()?;

        if self.fetch_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "user_agent".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Compile the host pattern into a [`TrustPolicy`].
    pub fn trust_policy(&self) -> Result<TrustPolicy, ConfigError> {
        TrustPolicy::new(&self.host_pattern)
    }

    /// The certificate fetcher settings described by this configuration.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.fetch_timeout_seconds),
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            user_agent: self.user_agent.clone(),
            https_only: self.https_only,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
