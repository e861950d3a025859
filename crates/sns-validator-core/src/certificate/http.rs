//! HTTPS transport for signing certificates.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

use super::CertificateFetcher;
use crate::error::FetchError;

/// Configuration for certificate downloads.
///
/// # Examples
///
/// ```
/// use sns_validator_core::FetcherConfig;
/// use std::time::Duration;
///
/// let config = FetcherConfig::default()
///     .with_timeout(Duration::from_secs(3))
///     .with_user_agent("my-service/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Total time allowed for one request, body included
    pub timeout: Duration,
    /// Time allowed to establish the connection
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
    /// Refuse any non-HTTPS request at the client level
    pub https_only: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: concat!("sns-validator/", env!("CARGO_PKG_VERSION")).to_string(),
            https_only: true,
        }
    }
}

impl FetcherConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Allow or forbid plain HTTP requests.
    ///
    /// Only meant for tests against local mock servers. The trust policy
    /// rejects non-HTTPS certificate URLs regardless of this setting.
    pub fn with_https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }
}

/// Downloads certificates with `reqwest`.
///
/// A single GET per call, no retries. Anything but `200 OK` is a failure.
#[derive(Debug, Clone)]
pub struct HttpCertificateFetcher {
    client: reqwest::Client,
}

impl HttpCertificateFetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .https_only(config.https_only)
            .build()
            .map_err(|e| FetchError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CertificateFetcher for HttpCertificateFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(body)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
