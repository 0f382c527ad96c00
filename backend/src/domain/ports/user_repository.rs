//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "user repository query failed: {message}",
        /// Another user already holds this email address.
        DuplicateEmail { email } => "user with email {email} already exists",
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateEmail` when the normalised
    /// email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing user's mutable fields.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;
}
