//! SNS message representation.
//!
//! An SNS HTTP(S) delivery is a flat JSON object of string fields. Two types
//! model it:
//!
//! - [`RawMessage`]: the payload as received. Values are optional so that an
//!   explicit JSON `null` (as emitted by the Lambda transport for `Subject`)
//!   is representable.
//! - [`SnsMessage`]: the normalized form. Field names use canonical casing and
//!   every value is a string. Absent fields and empty-string fields remain
//!   distinguishable through the `Option`-returning accessors.
//!
//! [`normalize`] converts the first into the second; [`structure`] checks the
//! result carries the fields its type requires.

pub mod normalize;
pub mod structure;

pub use normalize::normalize;
pub use structure::{has_required_fields, validate_structure};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Canonical SNS field names.
pub mod fields {
    pub const MESSAGE: &str = "Message";
    pub const MESSAGE_ID: &str = "MessageId";
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNATURE_VERSION: &str = "SignatureVersion";
    pub const SIGNING_CERT_URL: &str = "SigningCertURL";
    pub const SUBJECT: &str = "Subject";
    pub const SUBSCRIBE_URL: &str = "SubscribeURL";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const TOKEN: &str = "Token";
    pub const TOPIC_ARN: &str = "TopicArn";
    pub const TYPE: &str = "Type";
    pub const UNSUBSCRIBE_URL: &str = "UnsubscribeURL";
}

/// The value of the `Type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageType {
    Notification,
    SubscriptionConfirmation,
    UnsubscribeConfirmation,
    /// Any type this crate does not know about. Treated like a notification.
    Other(String),
}

impl MessageType {
    /// Parse the `Type` field value. Matching is case-sensitive.
    pub fn parse(value: &str) -> Self {
        match value {
            "Notification" => Self::Notification,
            "SubscriptionConfirmation" => Self::SubscriptionConfirmation,
            "UnsubscribeConfirmation" => Self::UnsubscribeConfirmation,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Notification => "Notification",
            Self::SubscriptionConfirmation => "SubscriptionConfirmation",
            Self::UnsubscribeConfirmation => "UnsubscribeConfirmation",
            Self::Other(value) => value,
        }
    }

    /// Whether this type confirms or revokes a subscription and therefore
    /// carries `SubscribeURL` and `Token`.
    pub fn is_subscription_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::SubscriptionConfirmation | Self::UnsubscribeConfirmation
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An SNS payload before normalization.
///
/// Deserializes from any JSON object. String values are kept, `null` is
/// recorded as an explicit null, and any other value (such as the
/// `MessageAttributes` object of a Lambda record) is kept as its compact JSON
/// text. Such fields are never signed or required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawMessage {
    fields: BTreeMap<String, Option<String>>,
}

impl RawMessage {
    /// Create an empty raw message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a string value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), Some(value.into()));
    }

    /// Set a field to an explicit `null`.
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.fields.insert(name.into(), None);
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Option<String>> {
        self.fields.remove(name)
    }

    /// Look up a field. The outer `Option` is presence, the inner is nullness.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.fields.get(name).map(|value| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn into_fields(self) -> BTreeMap<String, Option<String>> {
        self.fields
    }
}

impl<'de> Deserialize<'de> for RawMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object = BTreeMap::<String, Value>::deserialize(deserializer)?;

        let fields = object
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Null => None,
                    Value::String(text) => Some(text),
                    other => Some(other.to_string()),
                };
                (name, value)
            })
            .collect();

        Ok(Self { fields })
    }
}

impl From<HashMap<String, String>> for RawMessage {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for RawMessage {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<SnsMessage> for RawMessage {
    fn from(message: SnsMessage) -> Self {
        message.fields.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for RawMessage
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), Some(value.into())))
                .collect(),
        }
    }
}

/// A normalized SNS message.
///
/// Produced by [`normalize`] and returned by the validator on success. Field
/// names are canonical; no value is null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnsMessage {
    fields: BTreeMap<String, String>,
}

impl SnsMessage {
    pub(crate) fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Look up any field by its canonical name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The parsed `Type` field, if present.
    pub fn message_type(&self) -> Option<MessageType> {
        self.get(fields::TYPE).map(MessageType::parse)
    }

    /// The `Message` field: the published payload.
    pub fn body(&self) -> Option<&str> {
        self.get(fields::MESSAGE)
    }

    pub fn message_id(&self) -> Option<&str> {
        self.get(fields::MESSAGE_ID)
    }

    pub fn topic_arn(&self) -> Option<&str> {
        self.get(fields::TOPIC_ARN)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get(fields::TIMESTAMP)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get(fields::SUBJECT)
    }

    pub fn signature(&self) -> Option<&str> {
        self.get(fields::SIGNATURE)
    }

    pub fn signature_version(&self) -> Option<&str> {
        self.get(fields::SIGNATURE_VERSION)
    }

    pub fn signing_cert_url(&self) -> Option<&str> {
        self.get(fields::SIGNING_CERT_URL)
    }

    pub fn subscribe_url(&self) -> Option<&str> {
        self.get(fields::SUBSCRIBE_URL)
    }

    pub fn unsubscribe_url(&self) -> Option<&str> {
        self.get(fields::UNSUBSCRIBE_URL)
    }

    pub fn token(&self) -> Option<&str> {
        self.get(fields::TOKEN)
    }

    /// Iterate over all fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the message, returning the underlying field map.
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
