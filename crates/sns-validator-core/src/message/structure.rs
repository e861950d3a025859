//! Structural validation of normalized messages.

use super::{fields, SnsMessage};
use crate::error::ValidationError;

/// Fields every SNS message must carry.
pub const REQUIRED_FIELDS: &[&str] = &[
    fields::MESSAGE,
    fields::MESSAGE_ID,
    fields::TIMESTAMP,
    fields::TOPIC_ARN,
    fields::TYPE,
    fields::SIGNATURE,
    fields::SIGNING_CERT_URL,
    fields::SIGNATURE_VERSION,
];

/// Additional fields carried by subscription lifecycle messages.
pub const SUBSCRIPTION_CONTROL_FIELDS: &[&str] = &[fields::SUBSCRIBE_URL, fields::TOKEN];

/// Whether the message carries every field its type requires.
pub fn has_required_fields(message: &SnsMessage) -> bool {
    let base = REQUIRED_FIELDS.iter().all(|name| message.contains(name));
    if !base {
        return false;
    }

    match message.message_type() {
        Some(message_type) if message_type.is_subscription_lifecycle() => {
            SUBSCRIPTION_CONTROL_FIELDS
                .iter()
                .all(|name| message.contains(name))
        }
        _ => true,
    }
}

/// Check the message carries every field its type requires.
///
/// # Errors
///
/// Returns [`ValidationError::MissingRequiredKeys`] without identifying which
/// field is missing.
pub fn validate_structure(message: &SnsMessage) -> Result<(), ValidationError> {
    if has_required_fields(message) {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredKeys)
    }
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
