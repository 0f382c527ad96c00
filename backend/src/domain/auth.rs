//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use super::{EmailAddress, EmailError, Password, PasswordError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing, blank or malformed.
    #[error("email is invalid: {0}")]
    Email(#[source] EmailError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised the same way account creation normalises it, so a
///   user may type the domain in any case.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("cook@EXAMPLE.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "cook@example.com");
/// assert_eq!(creds.password().expose(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::normalize(email).map_err(LoginValidationError::Email)?;
        let password = Password::new(password).map_err(|err| match err {
            PasswordError::Empty | PasswordError::Hashing { .. } => {
                LoginValidationError::EmptyPassword
            }
        })?;
        Ok(Self { email, password })
    }

    /// Normalised email suitable for user lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}
