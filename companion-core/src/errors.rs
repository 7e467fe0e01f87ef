use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("conflict: {0}")]
    Conflict(&'static str),
    #[error("busy: {0}")]
    Busy(&'static str),
    #[error("storage error: {0}")]
    Storage(&'static str),
    #[error("suggestion service error: {0}")]
    Integration(String),
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
    #[error("configuration error: {0}")]
    Config(String),
}

/// How an error is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Persistence,
    Integration,
    Authentication,
    Configuration,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound(_)
            | CoreError::Invalid(_)
            | CoreError::Conflict(_)
            | CoreError::Busy(_) => ErrorKind::Validation,
            CoreError::Storage(_) => ErrorKind::Persistence,
            CoreError::Integration(_) => ErrorKind::Integration,
            CoreError::Auth(AuthError::Misconfigured | AuthError::Network) => {
                ErrorKind::Configuration
            }
            CoreError::Auth(_) => ErrorKind::Authentication,
            CoreError::Config(_) => ErrorKind::Configuration,
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    WeakPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("an account with this email already exists")]
    AlreadyRegistered,
    #[error("network error while contacting the authentication backend")]
    Network,
    #[error("authentication backend is not configured")]
    Misconfigured,
}
