//! User accounts and the factory that creates them.
//!
//! Accounts are identified by a normalised email address. The factory
//! functions here validate input and hash the password; persistence and the
//! uniqueness check happen in [`crate::domain::AccountService`].

use std::fmt;

use serde::Serialize;

use super::{
    EmailAddress, EmailError, EntityId, Password, PasswordDigest, PasswordError, UserId,
};

/// Maximum length of a user's display name.
pub const USER_NAME_MAX: usize = 255;

/// Validation errors for user profile fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name exceeds [`USER_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Free-text display name. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// Optional fields accepted alongside email and password on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserExtras {
    /// Display name; empty when absent.
    pub name: Option<String>,
}

/// Failures raised while creating an account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateUserError {
    /// Caller supplied no email at all, or only whitespace.
    #[error("users must have an email address")]
    MissingEmail,
    /// Email was present but malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[source] EmailError),
    /// Name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(#[source] UserValidationError),
    /// Password was empty or could not be hashed.
    #[error("invalid password: {0}")]
    InvalidPassword(#[source] PasswordError),
    /// Another account already uses the normalised email.
    #[error("a user with this email already exists")]
    DuplicateEmail,
    /// Storage was unreachable.
    #[error("user store unavailable: {message}")]
    Unavailable { message: String },
    /// Storage failed while persisting the user.
    #[error("user store failed: {message}")]
    Storage { message: String },
}

impl CreateUserError {
    /// True when the caller broke the factory's contract rather than
    /// supplying data that merely failed validation.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::MissingEmail)
    }
}

/// Application user.
///
/// ## Invariants
/// - `email` is normalised and non-empty.
/// - `password` is an Argon2id PHC digest, never plain text.
/// - Superusers are always staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: UserName,
    password: PasswordDigest,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
}

/// Stored representation used by repositories to rebuild a [`User`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    /// Create a regular, active account.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{Password, User, UserExtras};
    ///
    /// let password = Password::new("12345678").expect("password");
    /// let user = User::create(Some("test00@outlook.com"), &password, UserExtras::default())
    ///     .expect("valid user");
    /// assert_eq!(user.email().as_ref(), "test00@outlook.com");
    /// assert!(user.check_password("12345678"));
    /// ```
    pub fn create(
        email: Option<&str>,
        password: &Password,
        extras: UserExtras,
    ) -> Result<Self, CreateUserError> {
        let email = match email.map(str::trim) {
            None | Some("") => return Err(CreateUserError::MissingEmail),
            Some(raw) => EmailAddress::normalize(raw).map_err(CreateUserError::InvalidEmail)?,
        };
        let name = UserName::new(extras.name.unwrap_or_default())
            .map_err(CreateUserError::InvalidName)?;
        let password = PasswordDigest::hash(password).map_err(CreateUserError::InvalidPassword)?;

        Ok(Self {
            id: UserId::random(),
            email,
            name,
            password,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        })
    }

    /// Create an account with staff and superuser privileges.
    pub fn create_superuser(
        email: Option<&str>,
        password: &Password,
    ) -> Result<Self, CreateUserError> {
        let mut user = Self::create(email, password, UserExtras::default())?;
        user.is_staff = true;
        user.is_superuser = true;
        Ok(user)
    }

    /// Rebuild a user from storage without re-validating it.
    pub fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: EmailAddress::from_stored(record.email),
            name: UserName(record.name),
            password: PasswordDigest::from_phc(record.password_hash),
            is_active: record.is_active,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
        }
    }

    /// Flatten into the stored representation.
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            email: self.email.to_string(),
            name: self.name.to_string(),
            password_hash: self.password.as_phc().to_owned(),
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }

    /// Verify a plain-text password against the stored digest.
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password.verify(candidate)
    }

    /// Replace the display name.
    pub fn rename(&mut self, name: UserName) {
        self.name = name;
    }

    /// Replace the password with a freshly salted digest.
    pub fn set_password(&mut self, password: &Password) -> Result<(), PasswordError> {
        self.password = PasswordDigest::hash(password)?;
        Ok(())
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Whether the account may sign in.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the account has staff privileges.
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Whether the account has every privilege.
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.email, f)
    }
}

#[cfg(test)]
mod tests;
