//! Field normalization for alternate SNS encodings.
//!
//! Messages delivered through AWS Lambda spell two URL fields differently
//! (`SigningCertUrl`, `UnsubscribeUrl`) and carry `"Subject": null` when no
//! subject was published. Normalization folds those into the canonical HTTP(S)
//! delivery shape.

use std::collections::BTreeMap;

use super::{fields, RawMessage, SnsMessage};

/// Alternate field names and their canonical equivalents.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("SigningCertUrl", fields::SIGNING_CERT_URL),
    ("UnsubscribeUrl", fields::UNSUBSCRIBE_URL),
];

/// Normalize a raw message.
///
/// - Aliased field names are renamed to their canonical form. When both the
///   alias and the canonical field are present, the alias value wins.
/// - A `null` `Subject` is removed.
/// - Any other `null` value is removed as well, so it reads as absent.
pub fn normalize(raw: RawMessage) -> SnsMessage {
    let mut fields = raw.into_fields();

    for (alias, canonical) in FIELD_ALIASES {
        if let Some(value) = fields.remove(*alias) {
            fields.insert((*canonical).to_string(), value);
        }
    }

    let normalized: BTreeMap<String, String> = fields
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect();

    SnsMessage::from_fields(normalized)
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
