//! Tests for the message types.

use super::*;

#[test]
fn test_message_type_parse_known_values() {
    assert_eq!(MessageType::parse("Notification"), MessageType::Notification);
    assert_eq!(
        MessageType::parse("SubscriptionConfirmation"),
        MessageType::SubscriptionConfirmation
    );
    assert_eq!(
        MessageType::parse("UnsubscribeConfirmation"),
        MessageType::UnsubscribeConfirmation
    );
}

#[test]
fn test_message_type_parse_is_case_sensitive() {
    assert_eq!(
        MessageType::parse("notification"),
        MessageType::Other("notification".to_string())
    );
}

#[test]
fn test_message_type_lifecycle_classification() {
    assert!(MessageType::SubscriptionConfirmation.is_subscription_lifecycle());
    assert!(MessageType::UnsubscribeConfirmation.is_subscription_lifecycle());
    assert!(!MessageType::Notification.is_subscription_lifecycle());
    assert!(!MessageType::Other("FutureType".to_string()).is_subscription_lifecycle());
}

#[test]
fn test_message_type_display_round_trips_unknown_value() {
    let other = MessageType::parse("FutureType");
    assert_eq!(other.to_string(), "FutureType");
}

#[test]
fn test_raw_message_deserializes_null_values() {
    let json = r#"{"Type":"Notification","Subject":null,"Message":"hi"}"#;
    let raw: RawMessage = serde_json::from_str(json).expect("valid JSON object");

    assert_eq!(raw.len(), 3);
    assert_eq!(raw.get("Type"), Some(Some("Notification")));
    assert_eq!(raw.get("Subject"), Some(None));
    assert_eq!(raw.get("Missing"), None);
}

#[test]
fn test_raw_message_accepts_lambda_record() {
    let json = r#"{
        "SignatureVersion": "1",
        "Timestamp": "2019-01-02T12:45:07.000Z",
        "Signature": "tcc6faL2yUC6dgZdmrwh1Y4cGa/ebXEkAi6RibDsvpi+tE/1+82j...65r==",
        "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService-ac565b8b1a6c5d002d285f9598aa1d9b.pem",
        "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
        "Message": "Hello from SNS!",
        "MessageAttributes": {
            "Test": {"Type": "String", "Value": "TestString"}
        },
        "Type": "Notification",
        "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
        "TopicArn": "arn:aws:sns:us-east-1:123456789012:sns-lambda",
        "Subject": null
    }"#;

    let raw: RawMessage = serde_json::from_str(json).expect("Lambda record should parse");

    assert_eq!(raw.len(), 12);
    assert_eq!(raw.get("Message"), Some(Some("Hello from SNS!")));
    assert_eq!(raw.get("Subject"), Some(None));
    assert_eq!(
        raw.get("MessageAttributes"),
        Some(Some(r#"{"Test":{"Type":"String","Value":"TestString"}}"#))
    );
}

#[test]
fn test_raw_message_stringifies_scalar_values() {
    let json = r#"{"SignatureVersion":1,"Flag":true,"Empty":{},"List":[1,2]}"#;

    let raw: RawMessage = serde_json::from_str(json).unwrap();

    assert_eq!(raw.get("SignatureVersion"), Some(Some("1")));
    assert_eq!(raw.get("Flag"), Some(Some("true")));
    assert_eq!(raw.get("Empty"), Some(Some("{}")));
    assert_eq!(raw.get("List"), Some(Some("[1,2]")));
}

#[test]
fn test_raw_message_rejects_non_object_json() {
    let result: Result<RawMessage, _> = serde_json::from_str(r#"["Type"]"#);
    assert!(result.is_err());
}

#[test]
fn test_raw_message_from_hash_map() {
    let mut map = HashMap::new();
    map.insert("Type".to_string(), "Notification".to_string());

    let raw = RawMessage::from(map);

    assert!(raw.contains("Type"));
    assert!(!raw.is_empty());
}

#[test]
fn test_sns_message_accessors_distinguish_absent_and_empty() {
    let mut fields = BTreeMap::new();
    fields.insert("Subject".to_string(), String::new());
    fields.insert("Type".to_string(), "Notification".to_string());
    let message = SnsMessage::from_fields(fields);

    assert_eq!(message.subject(), Some(""));
    assert_eq!(message.token(), None);
    assert_eq!(message.message_type(), Some(MessageType::Notification));
}

#[test]
fn test_sns_message_serializes_as_flat_object() {
    let mut fields = BTreeMap::new();
    fields.insert("Message".to_string(), "hi".to_string());
    fields.insert("Type".to_string(), "Notification".to_string());
    let message = SnsMessage::from_fields(fields);

    let json = serde_json::to_value(&message).expect("serializable");

    assert_eq!(
        json,
        serde_json::json!({"Message": "hi", "Type": "Notification"})
    );
}
