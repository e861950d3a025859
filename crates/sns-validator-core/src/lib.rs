//! # SNS Validator Core
//!
//! Authenticates Amazon SNS HTTP(S) messages by verifying their signature.
//!
//! A message is trusted only if:
//! - it carries every field its type requires,
//! - its `SigningCertURL` is an HTTPS `.pem` URL on an allow-listed host,
//! - it uses signature version `1`,
//! - its `Signature` is a valid RSA-SHA1 signature, made with the key of the
//!   certificate at `SigningCertURL`, over the canonical string of its fields.
//!
//! Certificates are downloaded once per URL and cached for the lifetime of the
//! validator.
//!
//! This crate performs single-certificate signature verification only. It does
//! not walk certificate chains, check revocation or enforce expiry; trust is
//! anchored entirely in the host pattern.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sns_validator_core::{MessageValidator, RawMessage, ValidationErrorKind};
//!
//! # async fn handle(body: &str) -> Result<u16, Box<dyn std::error::Error>> {
//! let validator = MessageValidator::with_defaults()?;
//! let raw: RawMessage = serde_json::from_str(body)?;
//!
//! let status = match validator.validate(raw).await {
//!     Ok(message) => {
//!         println!("{:?}: {:?}", message.message_type(), message.body());
//!         200
//!     }
//!     Err(e) if e.kind() == ValidationErrorKind::CertificateRetrieval => 503,
//!     Err(_) => 403,
//! };
//! # Ok(status)
//! # }
//! ```

pub mod certificate;
pub mod config;
pub mod error;
pub mod message;
pub mod signature;
pub mod trust;
pub mod validator;

pub use certificate::{
    CertificateCache, CertificateFetcher, CertificateStore, FetcherConfig, HttpCertificateFetcher,
};
pub use config::ValidatorConfig;
pub use error::{ConfigError, FetchError, ValidationError, ValidationErrorKind, VerificationFailure};
pub use message::{normalize, MessageType, RawMessage, SnsMessage};
pub use signature::{canonical_string, SignatureEncoding, SignatureVerifier};
pub use trust::{TrustPolicy, DEFAULT_HOST_PATTERN};
pub use validator::{MessageValidator, MessageValidatorBuilder};
