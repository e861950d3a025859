//! Common test utilities for sns-validator integration tests
//!
//! This module provides:
//! - Test key material shared with the core crate
//! - Fake certificate fetchers
//! - Builders for signed SNS messages

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding as _, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use sns_validator_core::{
    canonical_string, normalize, CertificateFetcher, FetchError, FetcherConfig,
    HttpCertificateFetcher, MessageValidator, RawMessage,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

// ============================================================================
// Key Material
// ============================================================================

pub const SIGNING_KEY: &str = include_str!("../../../sns-validator-core/test-data/signing-key.pem");
pub const SIGNING_CERT: &str =
    include_str!("../../../sns-validator-core/test-data/signing-cert.pem");
#[allow(dead_code)]
pub const OTHER_KEY: &str = include_str!("../../../sns-validator-core/test-data/other-key.pem");
#[allow(dead_code)]
pub const OTHER_CERT: &str = include_str!("../../../sns-validator-core/test-data/other-cert.pem");
/// `openssl dgst -sha1 -sign signing-key.pem` over the canonical string of
/// [`example_notification`] without its `Signature`.
#[allow(dead_code)]
pub const OPENSSL_SIGNATURE: &str =
    include_str!("../../../sns-validator-core/test-data/notification-signature.b64");

/// openssl signatures over the canonical strings of [`lifecycle_message`].
#[allow(dead_code)]
pub const OPENSSL_SUBSCRIPTION_SIGNATURE: &str =
    include_str!("../../../sns-validator-core/test-data/subscription-confirmation-signature.b64");
#[allow(dead_code)]
pub const OPENSSL_UNSUBSCRIBE_SIGNATURE: &str =
    include_str!("../../../sns-validator-core/test-data/unsubscribe-confirmation-signature.b64");

pub const CERT_URL: &str = "https://sns.us-east-1.amazonaws.com/cert.pem";
#[allow(dead_code)]
pub const OTHER_CERT_URL: &str = "https://sns.eu-west-1.amazonaws.com/other.pem";

// ============================================================================
// Fake Certificate Fetcher
// ============================================================================

/// Serves fixed certificate bodies by URL and records every fetch.
#[derive(Default)]
pub struct FakeCertificateFetcher {
    certificates: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl FakeCertificateFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the standard test certificate at [`CERT_URL`].
    pub fn with_default_certificate() -> Self {
        Self::new().serving(CERT_URL, SIGNING_CERT)
    }

    pub fn serving(mut self, url: &str, body: &str) -> Self {
        self.certificates.insert(url.to_string(), body.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }
}

#[async_trait]
impl CertificateFetcher for FakeCertificateFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.certificates
            .get(url.as_str())
            .cloned()
            .ok_or(FetchError::UnexpectedStatus { status: 404 })
    }
}

/// Sends every certificate request to a local mock server, keeping the path.
///
/// Trusted certificate URLs are always HTTPS on an AWS host; this lets the
/// real HTTP fetcher run against a plain-HTTP `wiremock` server instead.
#[allow(dead_code)]
pub struct MockServerFetcher {
    inner: HttpCertificateFetcher,
    base: Url,
}

#[allow(dead_code)]
impl MockServerFetcher {
    pub fn new(server_uri: &str) -> Self {
        let config = FetcherConfig::default()
            .with_https_only(false)
            .with_timeout(Duration::from_secs(2));

        Self {
            inner: HttpCertificateFetcher::new(&config).expect("Failed to build HTTP client"),
            base: Url::parse(server_uri).expect("Mock server URI should be a URL"),
        }
    }
}

#[async_trait]
impl CertificateFetcher for MockServerFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let target = self
            .base
            .join(url.path())
            .expect("Certificate path should join onto the mock server URI");
        self.inner.fetch(&target).await
    }
}

// ============================================================================
// Validators
// ============================================================================

pub fn validator_with(fetcher: Arc<dyn CertificateFetcher>) -> MessageValidator {
    MessageValidator::builder()
        .fetcher(fetcher)
        .build()
        .expect("Failed to build validator")
}

// ============================================================================
// Message Builders
// ============================================================================

/// The example notification used throughout, unsigned.
pub fn example_notification() -> RawMessage {
    RawMessage::from_iter([
        ("Type", "Notification"),
        ("Message", "hi"),
        ("MessageId", "1"),
        ("Timestamp", "2024-01-01T00:00:00Z"),
        ("TopicArn", "arn:x"),
        ("SigningCertURL", CERT_URL),
        ("SignatureVersion", "1"),
    ])
}

#[allow(dead_code)]
pub const LIFECYCLE_BODY: &str =
    "You have chosen to subscribe to the topic arn:x. To confirm, visit the SubscribeURL.";
#[allow(dead_code)]
pub const LIFECYCLE_MESSAGE_ID: &str = "165545c9-2a5c-472c-8df2-7ff2be2b3b1b";
#[allow(dead_code)]
pub const LIFECYCLE_TOKEN: &str = "2336412f37fb687f5d51e6e241d09c805a5a57b30d712f794cc5f6a988666d92768dd60a747ba6f3beb71854e285d6ad02428b09ceece29417f1f02d609c582afbacc99c583a916b9981dd2728f4ae6fdb82efd087cc3b7849e05798d2d2785c03b0879594eeac82c01f235d0e717736";
#[allow(dead_code)]
pub const LIFECYCLE_SUBSCRIBE_URL: &str =
    "https://sns.us-east-1.amazonaws.com/?Action=ConfirmSubscription&TopicArn=arn:x&Token=2336412f37";

/// An unsigned subscription lifecycle message of the given type.
#[allow(dead_code)]
pub fn lifecycle_message(message_type: &str) -> RawMessage {
    RawMessage::from_iter([
        ("Type", message_type),
        ("Message", LIFECYCLE_BODY),
        ("MessageId", LIFECYCLE_MESSAGE_ID),
        ("Token", LIFECYCLE_TOKEN),
        ("TopicArn", "arn:x"),
        ("SubscribeURL", LIFECYCLE_SUBSCRIBE_URL),
        ("Timestamp", "2024-01-01T00:00:00Z"),
        ("SigningCertURL", CERT_URL),
        ("SignatureVersion", "1"),
    ])
}

/// Sign `raw` with the PKCS#8 private key `key_pem`, replacing any existing
/// `Signature`.
pub fn sign_with(mut raw: RawMessage, key_pem: &str) -> RawMessage {
    raw.remove("Signature");
    let canonical = canonical_string(&normalize(raw.clone()));
    let key = RsaPrivateKey::from_pkcs8_pem(key_pem).expect("Test key should parse");
    let signature = SigningKey::<Sha1>::new(key).sign(canonical.as_bytes());
    raw.insert("Signature", BASE64.encode(signature.to_bytes()));
    raw
}

/// Sign `raw` with the standard test key.
pub fn sign(raw: RawMessage) -> RawMessage {
    sign_with(raw, SIGNING_KEY)
}
