//! Normalised email addresses used as the login identity.

use std::fmt;

use serde::Serialize;

/// Maximum stored length of an email address.
pub const EMAIL_MAX: usize = 255;

/// Reasons an email address fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// The address was empty once trimmed.
    #[error("email must not be empty")]
    Blank,
    /// The address lacks an `@` or has an empty local or domain part.
    #[error("email must contain a local part and a domain separated by '@'")]
    Malformed,
    /// The address exceeds [`EMAIL_MAX`] characters.
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
}

/// Email address with a lowercased domain.
///
/// The local part keeps the caller's casing; only the domain after the
/// final `@` is folded to lowercase, and surrounding whitespace is trimmed.
///
/// # Examples
/// ```
/// use recipe_backend::domain::EmailAddress;
///
/// let email = EmailAddress::normalize("test@OUTLOOK.COM").expect("valid email");
/// assert_eq!(email.as_ref(), "test@outlook.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise raw input.
    pub fn normalize(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Blank);
        }
        let (local, domain) = trimmed.rsplit_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::Malformed);
        }
        let normalized = format!("{local}@{}", domain.to_lowercase());
        if normalized.chars().count() > EMAIL_MAX {
            return Err(EmailError::TooLong { max: EMAIL_MAX });
        }
        Ok(Self(normalized))
    }

    /// Rehydrate an address that was normalised before it was stored.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
