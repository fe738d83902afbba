//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during sign-in and profile operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] yasira_core::EmailError),

    /// Wrong password or unknown account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The operation needs a signed-in account.
    #[error("not signed in")]
    NotAuthenticated,

    /// Display name is blank.
    #[error("name cannot be empty")]
    MissingName,
}
