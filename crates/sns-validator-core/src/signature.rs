//! SNS signature verification.
//!
//! SNS signs a canonical string built from a fixed, ordered subset of message
//! fields: for each field in the list that is present in the message,
//! `"<Name>\n<Value>\n"` is appended. Absent fields are skipped, never
//! replaced by an empty value. Version `1` signatures are RSA PKCS#1 v1.5
//! over SHA-1, base64 encoded, checked against the public key of the
//! certificate named by `SigningCertURL`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::borrow::Cow;
use x509_parser::pem::parse_x509_pem;

use crate::error::{ValidationError, VerificationFailure};
use crate::message::{fields, MessageType, SnsMessage};

/// The only signature version this crate verifies.
pub const SUPPORTED_SIGNATURE_VERSION: &str = "1";

/// Signed fields of every type except `SubscriptionConfirmation`.
///
/// `UnsubscribeConfirmation` carries a `Token` but does not sign it.
pub const NOTIFICATION_SIGNABLE_FIELDS: &[&str] = &[
    fields::MESSAGE,
    fields::MESSAGE_ID,
    fields::SUBJECT,
    fields::SUBSCRIBE_URL,
    fields::TIMESTAMP,
    fields::TOPIC_ARN,
    fields::TYPE,
];

/// Signed fields of `SubscriptionConfirmation` messages.
pub const SUBSCRIPTION_SIGNABLE_FIELDS: &[&str] = &[
    fields::MESSAGE,
    fields::MESSAGE_ID,
    fields::SUBJECT,
    fields::SUBSCRIBE_URL,
    fields::TIMESTAMP,
    fields::TOKEN,
    fields::TOPIC_ARN,
    fields::TYPE,
];

/// Text encoding applied to the canonical string before hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// ISO-8859-1. Characters above U+00FF keep only their low byte.
    #[serde(alias = "binary", alias = "iso-8859-1")]
    Latin1,
}

impl SignatureEncoding {
    /// Encode `text` into bytes.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Latin1 if text.is_ascii() => Cow::Borrowed(text.as_bytes()),
            Self::Latin1 => Cow::Owned(text.chars().map(|c| (c as u32 & 0xFF) as u8).collect()),
        }
    }
}

/// The ordered list of signed fields for a message type.
pub fn signable_fields(message_type: Option<&MessageType>) -> &'static [&'static str] {
    match message_type {
        Some(MessageType::SubscriptionConfirmation) => SUBSCRIPTION_SIGNABLE_FIELDS,
        _ => NOTIFICATION_SIGNABLE_FIELDS,
    }
}

/// Build the canonical string SNS signed for `message`.
pub fn canonical_string(message: &SnsMessage) -> String {
    let message_type = message.message_type();
    let mut canonical = String::new();

    for name in signable_fields(message_type.as_ref()) {
        if let Some(value) = message.get(name) {
            canonical.push_str(name);
            canonical.push('\n');
            canonical.push_str(value);
            canonical.push('\n');
        }
    }

    canonical
}

/// Reject any signature version other than [`SUPPORTED_SIGNATURE_VERSION`].
///
/// # Errors
///
/// - [`ValidationError::MissingRequiredKeys`] if the message has no
///   `SignatureVersion`.
/// - [`ValidationError::UnsupportedSignatureVersion`] naming the version
///   otherwise.
pub fn check_signature_version(message: &SnsMessage) -> Result<(), ValidationError> {
    match message.signature_version() {
        Some(SUPPORTED_SIGNATURE_VERSION) => Ok(()),
        Some(version) => Err(ValidationError::UnsupportedSignatureVersion {
            version: version.to_string(),
        }),
        None => Err(ValidationError::MissingRequiredKeys),
    }
}

/// Verifies message signatures against a certificate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier {
    encoding: SignatureEncoding,
}

impl SignatureVerifier {
    /// Create a verifier that encodes the canonical string with `encoding`.
    pub fn new(encoding: SignatureEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> SignatureEncoding {
        self.encoding
    }

    /// Verify the signature of `message` against `certificate_pem`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::UnsupportedSignatureVersion`] for versions other
    ///   than `1`.
    /// - [`ValidationError::VerificationFailed`] when the certificate or the
    ///   signature cannot be decoded.
    /// - [`ValidationError::InvalidSignature`] when the signature does not
    ///   match.
    pub fn verify(&self, message: &SnsMessage, certificate_pem: &str) -> Result<(), ValidationError> {
        check_signature_version(message)?;

        let encoded_signature = message
            .signature()
            .ok_or(ValidationError::MissingRequiredKeys)?;

        let canonical = canonical_string(message);
        let signed_bytes = self.encoding.encode(&canonical);

        let public_key = public_key_from_pem(certificate_pem)?;
        let signature = decode_signature(encoded_signature)?;

        let verifying_key = VerifyingKey::<Sha1>::new(public_key);
        verifying_key
            .verify(&signed_bytes, &signature)
            .map_err(|_| ValidationError::InvalidSignature)
    }
}

/// Extract the RSA public key from a PEM encoded X.509 certificate.
pub fn public_key_from_pem(certificate_pem: &str) -> Result<RsaPublicKey, VerificationFailure> {
    let (_, pem) = parse_x509_pem(certificate_pem.as_bytes()).map_err(|e| {
        VerificationFailure::MalformedCertificate {
            message: format!("invalid PEM: {}", e),
        }
    })?;

    let certificate = pem
        .parse_x509()
        .map_err(|e| VerificationFailure::MalformedCertificate {
            message: format!("invalid X.509 DER: {}", e),
        })?;

    RsaPublicKey::from_public_key_der(certificate.public_key().raw).map_err(|e| {
        VerificationFailure::UnsupportedKey {
            message: e.to_string(),
        }
    })
}

fn decode_signature(encoded: &str) -> Result<Signature, VerificationFailure> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| VerificationFailure::MalformedSignature {
            message: e.to_string(),
        })?;

    Signature::try_from(bytes.as_slice()).map_err(|e| VerificationFailure::MalformedSignature {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
