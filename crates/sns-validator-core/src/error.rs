//! Error types for SNS message validation.
//!
//! Every failure the engine can produce is a [`ValidationError`]. Callers that
//! need to branch on the category of a failure (for example to choose an HTTP
//! status code) use [`ValidationError::kind`] rather than matching on the
//! human-readable message.

use std::fmt;
use thiserror::Error;

/// Failures produced while validating a single SNS message.
///
/// All variants are terminal for the validation call that produced them. The
/// engine never retries; [`ValidationError::is_transient`] lets the caller
/// decide whether resubmitting the same message could succeed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more required fields are absent. The field is deliberately not
    /// named.
    #[error("Message missing required keys.")]
    MissingRequiredKeys,

    /// The signing certificate URL failed the scheme, extension or host check.
    #[error("The certificate is located on an invalid domain: {url}")]
    UntrustedCertificateUrl { url: String },

    /// The message uses a signature version other than `1`.
    #[error("The signature version {version} is not supported.")]
    UnsupportedSignatureVersion { version: String },

    /// The signing certificate could not be downloaded.
    #[error("Certificate could not be retrieved from {url}: {source}")]
    CertificateRetrieval {
        url: String,
        #[source]
        source: FetchError,
    },

    /// The signature was checked and does not match the message.
    #[error("The message signature is invalid.")]
    InvalidSignature,

    /// The verification routine could not run to completion.
    #[error("Signature verification failed: {0}")]
    VerificationFailed(#[from] VerificationFailure),
}

impl ValidationError {
    /// The category of this failure.
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingRequiredKeys => ValidationErrorKind::MissingRequiredKeys,
            Self::UntrustedCertificateUrl { .. } => ValidationErrorKind::UntrustedCertificateUrl,
            Self::UnsupportedSignatureVersion { .. } => {
                ValidationErrorKind::UnsupportedSignatureVersion
            }
            Self::CertificateRetrieval { .. } => ValidationErrorKind::CertificateRetrieval,
            Self::InvalidSignature => ValidationErrorKind::InvalidSignature,
            Self::VerificationFailed(_) => ValidationErrorKind::VerificationFailed,
        }
    }

    /// Check if this error represents a transient condition.
    ///
    /// Only certificate retrieval can fail transiently: timeouts, connection
    /// failures and 5xx/429 responses. A malformed or forged message fails the
    /// same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::CertificateRetrieval { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MissingRequiredKeys,
    UntrustedCertificateUrl,
    UnsupportedSignatureVersion,
    CertificateRetrieval,
    InvalidSignature,
    VerificationFailed,
}

impl ValidationErrorKind {
    /// Stable snake_case identifier, suitable for logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredKeys => "missing_required_keys",
            Self::UntrustedCertificateUrl => "untrusted_certificate_url",
            Self::UnsupportedSignatureVersion => "unsupported_signature_version",
            Self::CertificateRetrieval => "certificate_retrieval",
            Self::InvalidSignature => "invalid_signature",
            Self::VerificationFailed => "verification_failed",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors while downloading a signing certificate.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than `200 OK`.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, TLS, refused connection, ...).
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body could not be read as text.
    #[error("failed to read response body: {message}")]
    Body { message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}

impl FetchError {
    /// Check if a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::UnexpectedStatus { status } => *status >= 500 || *status == 429,
            Self::Timeout => true,
            Self::Network { .. } => true,
            Self::Body { .. } => true,
            Self::ClientBuild { .. } => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_builder() {
            Self::ClientBuild {
                message: error.to_string(),
            }
        } else if error.is_body() || error.is_decode() {
            Self::Body {
                message: error.to_string(),
            }
        } else {
            Self::Network {
                message: error.to_string(),
            }
        }
    }
}

/// Reasons the signature verification routine could not produce a verdict.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationFailure {
    /// The downloaded body is not a parseable PEM X.509 certificate.
    #[error("malformed certificate: {message}")]
    MalformedCertificate { message: String },

    /// The certificate does not carry an RSA public key.
    #[error("unsupported certificate key: {message}")]
    UnsupportedKey { message: String },

    /// The `Signature` field is not valid base64.
    #[error("malformed signature: {message}")]
    MalformedSignature { message: String },
}

/// Errors in validator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The trust host pattern is not a valid regular expression.
    #[error("Invalid host pattern '{pattern}': {message}")]
    InvalidHostPattern { pattern: String, message: String },

    /// A configuration value is outside its allowed range.
    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The certificate fetcher could not be created.
    #[error("Failed to create certificate fetcher: {0}")]
    Fetcher(#[from] FetchError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
