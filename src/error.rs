// src/error.rs
//! Error types shared by the registry, the services and the API server.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Every failure the certificate service can report.
///
/// The in-memory registry itself never fails: lookups on absent ids return
/// `None`/`false`. These variants cover input validation, administrator
/// authentication and the ambient concerns (configuration, worker tasks).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A required input field was empty or whitespace.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A query parameter or field had an unrecognised value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Unknown username and wrong password both map here.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthorized,

    /// Authenticated, but the role does not allow the operation.
    #[error("operation requires the {0} role")]
    Forbidden(&'static str),

    #[error("username `{0}` is already taken")]
    DuplicateUsername(String),

    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("cryptographic operation failed")]
    Crypto,

    #[error("failed to load the configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ring::error::Unspecified> for RegistryError {
    fn from(_: ring::error::Unspecified) -> Self {
        RegistryError::Crypto
    }
}
