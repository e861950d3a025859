//! Signing certificate URL trust checks.
//!
//! The certificate URL comes from the message itself, so it is attacker
//! controlled. A URL is only trusted when it uses HTTPS, names a `.pem`
//! resource and its host matches the configured pattern.

use regex::Regex;
use url::Url;

use crate::error::ConfigError;

/// Default trust pattern: regional SNS endpoints, including the `.cn`
/// partitions.
pub const DEFAULT_HOST_PATTERN: &str = r"^sns\.[a-zA-Z0-9\-]{3,}\.amazonaws\.com(\.cn)?$";

const PEM_SUFFIX: &str = ".pem";

/// Host allow-list for signing certificate URLs.
///
/// # Examples
///
/// ```
/// use sns_validator_core::TrustPolicy;
///
/// let policy = TrustPolicy::default();
/// assert!(policy.is_trusted("https://sns.us-east-1.amazonaws.com/cert.pem"));
/// assert!(!policy.is_trusted("https://evil.com/cert.pem"));
/// ```
#[derive(Debug, Clone)]
pub struct TrustPolicy {
    host_pattern: Regex,
}

impl TrustPolicy {
    /// Create a policy from a host regular expression.
    ///
    /// The pattern is matched against the host (plus `:port` when the URL
    /// names a non-default port). Anchor it; an unanchored pattern matches any
    /// host that merely contains it.
    pub fn new(host_pattern: &str) -> Result<Self, ConfigError> {
        let host_pattern =
            Regex::new(host_pattern).map_err(|e| ConfigError::InvalidHostPattern {
                pattern: host_pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { host_pattern })
    }

    /// Create a policy from an already compiled pattern.
    pub fn from_regex(host_pattern: Regex) -> Self {
        Self { host_pattern }
    }

    /// The configured host pattern.
    pub fn host_pattern(&self) -> &str {
        self.host_pattern.as_str()
    }

    /// Parse `url` and return it if it passes every trust check.
    pub fn certificate_url(&self, url: &str) -> Option<Url> {
        let parsed = Url::parse(url).ok()?;

        if parsed.scheme() != "https" {
            return None;
        }

        if !parsed.path().ends_with(PEM_SUFFIX) {
            return None;
        }

        let host = parsed.host_str()?;
        let matched = match parsed.port() {
            Some(port) => self.host_pattern.is_match(&format!("{}:{}", host, port)),
            None => self.host_pattern.is_match(host),
        };

        matched.then_some(parsed)
    }

    /// Whether `url` passes every trust check.
    pub fn is_trusted(&self, url: &str) -> bool {
        self.certificate_url(url).is_some()
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self {
            host_pattern: Regex::new(DEFAULT_HOST_PATTERN)
                .expect("DEFAULT_HOST_PATTERN is a valid regex"),
        }
    }
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
