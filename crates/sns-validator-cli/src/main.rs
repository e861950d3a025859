use sns_validator_cli::{run_cli, CliError};
use sns_validator_core::ValidationErrorKind;

#[tokio::main]
async fn main() {
    // Run CLI and handle errors
    if let Err(e) = run_cli().await {
        // Written directly: configuration and logging failures happen before
        // a subscriber exists
        eprintln!("error: {}", e);

        // Exit with appropriate code based on error type
        let exit_code = match &e {
            CliError::UntrustedUrl { .. } => 1,
            CliError::Configuration(_) => 2,
            CliError::InvalidInput { .. } => 3,
            CliError::Io(_) => 4,
            CliError::Logging { .. } => 5,
            CliError::Validation(v) => match v.kind() {
                ValidationErrorKind::MissingRequiredKeys => 10,
                ValidationErrorKind::UntrustedCertificateUrl => 11,
                ValidationErrorKind::UnsupportedSignatureVersion => 12,
                ValidationErrorKind::CertificateRetrieval => 13,
                ValidationErrorKind::InvalidSignature => 14,
                ValidationErrorKind::VerificationFailed => 15,
            },
        };

        std::process::exit(exit_code);
    }
}
