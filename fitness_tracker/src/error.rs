use fitness_store::StoreError;
use thiserror::Error;

/// Bad user input. Always recoverable: the screen shows the message and
/// nothing is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your full name")]
    MissingName,
    #[error("Full name cannot contain ': ' or line breaks")]
    InvalidName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your email address")]
    MissingEmail,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please accept the terms and conditions")]
    TermsNotAccepted,
    #[error("Please select at least one focus area")]
    NoFocusArea,
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    #[error("Please enter a valid duration")]
    InvalidDuration,
    #[error("Please enter a valid date ({format})")]
    InvalidDate { format: String },
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
