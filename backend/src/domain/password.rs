//! Password secrets and their Argon2id digests.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use zeroize::Zeroizing;

/// Number of random salt bytes mixed into each digest.
const SALT_LEN: usize = 16;

/// Errors raised while accepting or hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The password was empty.
    #[error("password must not be empty")]
    Empty,
    /// The hashing primitive rejected its input.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

/// Plain-text password held in zeroising memory.
///
/// Whitespace is preserved; only the empty string is rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept a caller-provided password.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(raw))
    }

    /// Password text for hashing and verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Argon2id digest stored as a PHC string.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{Password, PasswordDigest};
///
/// let password = Password::new("test123").expect("non-empty password");
/// let digest = PasswordDigest::hash(&password).expect("hashing succeeds");
/// assert!(digest.verify("test123"));
/// assert!(!digest.verify("wrong"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|err| PasswordError::Hashing {
            message: err.to_string(),
        })?;

        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })
    }

    /// Rehydrate a digest loaded from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check `candidate` against the digest.
    ///
    /// A malformed stored digest never verifies.
    pub fn verify(&self, candidate: &str) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()
        })
    }

    /// PHC string for persistence.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(**redacted**)")
    }
}
