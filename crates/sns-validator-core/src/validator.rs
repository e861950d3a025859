//! The SNS message validation engine.
//!
//! [`MessageValidator`] runs the full pipeline for one message:
//!
//! 1. normalize Lambda-style field names
//! 2. check required fields are present
//! 3. check `SigningCertURL` against the trust policy
//! 4. reject unsupported signature versions
//! 5. fetch the signing certificate (cached)
//! 6. verify the signature over the canonical string
//!
//! The first failing step ends the call. Only step 5 performs I/O.

use std::sync::Arc;
use tracing::debug;

use crate::certificate::{
    CertificateCache, CertificateFetcher, CertificateStore, FetcherConfig, HttpCertificateFetcher,
};
use crate::config::ValidatorConfig;
use crate::error::{ConfigError, ValidationError};
use crate::message::{normalize, validate_structure, RawMessage, SnsMessage};
use crate::signature::{check_signature_version, SignatureEncoding, SignatureVerifier};
use crate::trust::TrustPolicy;

/// Validates inbound SNS messages.
///
/// A validator is cheap to share: wrap it in an [`Arc`] and call
/// [`validate`](Self::validate) from as many tasks as needed. The certificate
/// cache is shared by every call.
///
/// # Examples
///
/// ```rust,no_run
/// use sns_validator_core::{MessageValidator, RawMessage};
///
/// # async fn example(body: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let validator = MessageValidator::with_defaults()?;
///
/// let raw: RawMessage = serde_json::from_str(body)?;
/// match validator.validate(raw).await {
///     Ok(message) => println!("Authentic message {:?}", message.message_id()),
///     Err(e) => println!("Rejected ({}): {}", e.kind(), e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MessageValidator {
    trust: TrustPolicy,
    verifier: SignatureVerifier,
    certificates: CertificateStore,
}

impl MessageValidator {
    /// Create a validator from configuration, downloading certificates over
    /// HTTPS.
    pub fn new(config: &ValidatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Self::builder()
            .trust_policy(config.trust_policy()?)
            .encoding(config.encoding)
            .fetcher_config(config.fetcher_config())
            .build()
    }

    /// Create a validator with the default trust pattern and UTF-8 encoding.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(&ValidatorConfig::default())
    }

    /// Start building a validator.
    pub fn builder() -> MessageValidatorBuilder {
        MessageValidatorBuilder::new()
    }

    pub fn trust_policy(&self) -> &TrustPolicy {
        &self.trust
    }

    pub fn encoding(&self) -> SignatureEncoding {
        self.verifier.encoding()
    }

    pub fn certificate_cache(&self) -> &Arc<CertificateCache> {
        self.certificates.cache()
    }

    /// Validate a raw message.
    ///
    /// On success returns the normalized message, identical in content to the
    /// input apart from normalization.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first failing step. See
    /// [`ValidationError::kind`] for the categories.
    pub async fn validate(&self, raw: RawMessage) -> Result<SnsMessage, ValidationError> {
        let message = normalize(raw);
        let message_id = message.message_id().unwrap_or_default().to_string();

        validate_structure(&message).inspect_err(|e| {
            debug!(message_id = %message_id, error = %e, "Message failed structural validation");
        })?;

        // Presence was checked above.
        let cert_url = message.signing_cert_url().unwrap_or_default();
        let url = self.trust.certificate_url(cert_url).ok_or_else(|| {
            debug!(message_id = %message_id, url = %cert_url, "Untrusted signing certificate URL");
            ValidationError::UntrustedCertificateUrl {
                url: cert_url.to_string(),
            }
        })?;

        check_signature_version(&message)?;

        let certificate = self.certificates.certificate_for(&url).await?;

        self.verifier
            .verify(&message, &certificate)
            .inspect_err(|e| {
                debug!(message_id = %message_id, error = %e, "Signature verification failed");
            })?;

        debug!(message_id = %message_id, "Message signature verified");
        Ok(message)
    }
}

/// Builder for [`MessageValidator`].
///
/// Unset parts take their defaults: the default trust pattern, UTF-8, a fresh
/// cache and an [`HttpCertificateFetcher`] built from the fetcher config.
#[derive(Default)]
pub struct MessageValidatorBuilder {
    trust: Option<TrustPolicy>,
    encoding: SignatureEncoding,
    fetcher: Option<Arc<dyn CertificateFetcher>>,
    fetcher_config: FetcherConfig,
    cache: Option<Arc<CertificateCache>>,
}

impl MessageValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trust policy for certificate URLs.
    pub fn trust_policy(mut self, trust: TrustPolicy) -> Self {
        self.trust = Some(trust);
        self
    }

    /// Compile and set the certificate host pattern.
    pub fn host_pattern(self, pattern: &str) -> Result<Self, ConfigError> {
        Ok(self.trust_policy(TrustPolicy::new(pattern)?))
    }

    /// Set the encoding of the signed canonical string.
    pub fn encoding(mut self, encoding: SignatureEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Use a custom certificate transport. Overrides the fetcher config.
    pub fn fetcher(mut self, fetcher: Arc<dyn CertificateFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Configure the default HTTP certificate fetcher.
    pub fn fetcher_config(mut self, config: FetcherConfig) -> Self {
        self.fetcher_config = config;
        self
    }

    /// Share a certificate cache with other validators.
    pub fn cache(mut self, cache: Arc<CertificateCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the validator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Fetcher`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<MessageValidator, ConfigError> {
        let fetcher: Arc<dyn CertificateFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpCertificateFetcher::new(&self.fetcher_config)?),
        };

        let cache = self.cache.unwrap_or_default();

        Ok(MessageValidator {
            trust: self.trust.unwrap_or_default(),
            verifier: SignatureVerifier::new(self.encoding),
            certificates: CertificateStore::with_cache(fetcher, cache),
        })
    }
}

impl std::fmt::Debug for MessageValidatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageValidatorBuilder")
            .field("trust", &self.trust)
            .field("encoding", &self.encoding)
            .field("custom_fetcher", &self.fetcher.is_some())
            .field("fetcher_config", &self.fetcher_config)
            .finish()
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
