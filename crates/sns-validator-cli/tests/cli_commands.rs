//! End-to-end tests for the `sns-validator` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

const MISSING_TOPIC: &str = r#"{
    "Type": "Notification",
    "MessageId": "1",
    "Message": "hi",
    "Timestamp": "2024-01-01T00:00:00Z",
    "SignatureVersion": "1",
    "Signature": "AAAA",
    "SigningCertURL": "https://sns.us-east-1.amazonaws.com/cert.pem"
}"#;

fn sns_validator() -> Command {
    let mut cmd = Command::cargo_bin("sns-validator").expect("sns-validator binary");
    cmd.env_remove("RUST_LOG").env_remove("SNS_VALIDATOR_CONFIG");
    cmd
}

#[test]
fn check_url_trusted_exits_zero() {
    sns_validator()
        .args(["check-url", "https://sns.us-east-1.amazonaws.com/cert.pem"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("trusted: "));
}

#[test]
fn check_url_untrusted_exits_one() {
    sns_validator()
        .args(["check-url", "https://evil.com/cert.pem"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("untrusted: "));
}

#[test]
fn host_pattern_can_be_overridden_from_environment() {
    sns_validator()
        .env("SNS_VALIDATOR__VALIDATOR__HOST_PATTERN", r"^certs\.example\.org$")
        .args(["check-url", "https://certs.example.org/signing.pem"])
        .assert()
        .success();
}

#[test]
fn validate_from_stdin_reports_missing_keys() {
    sns_validator()
        .args(["validate", "-", "--format", "json"])
        .write_stdin(MISSING_TOPIC)
        .assert()
        .code(10)
        .stdout(predicate::str::contains("\"missing_required_keys\""));
}

#[test]
fn validate_accepts_lambda_record_shape() {
    let record = r#"{
        "SignatureVersion": "1",
        "Timestamp": "2019-01-02T12:45:07.000Z",
        "Signature": "AAAA",
        "SigningCertUrl": "https://evil.com/cert.pem",
        "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
        "Message": "Hello from SNS!",
        "MessageAttributes": {},
        "Type": "Notification",
        "TopicArn": "arn:aws:sns:us-east-1:123456789012:sns-lambda",
        "Subject": null
    }"#;

    sns_validator()
        .arg("validate")
        .write_stdin(record)
        .assert()
        .code(11)
        .stdout(predicate::str::starts_with("invalid (untrusted_certificate_url)"));
}

#[test]
fn validate_reports_each_failure_once_on_stderr() {
    let assert = sns_validator()
        .args(["validate", "-"])
        .write_stdin(MISSING_TOPIC)
        .assert()
        .code(10);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert_eq!(stderr.matches("Message missing required keys.").count(), 1, "{stderr}");
}

#[test]
fn validate_rejects_non_json_input() {
    sns_validator()
        .arg("validate")
        .write_stdin("[1, 2, 3]")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn missing_config_file_exits_two() {
    sns_validator()
        .args(["--config", "/nonexistent/sns-validator.yaml", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn config_prints_defaults() {
    sns_validator()
        .args(["config", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"host_pattern\""))
        .stdout(predicate::str::contains("\"level\": \"warn\""));
}
