//! Driving port for account creation and profile updates.

use async_trait::async_trait;

use crate::domain::{CreateUserError, Error, Password, User, UserExtras, UserId, UserName};

/// Input for registering an account.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Raw email; normalised by the service. `None` is a contract violation.
    pub email: Option<String>,
    pub password: Password,
    pub extras: UserExtras,
}

/// Input for updating the caller's own profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileRequest {
    pub user_id: UserId,
    pub name: Option<UserName>,
    pub password: Option<Password>,
}

/// Domain use-case port for account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a regular account.
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, CreateUserError>;

    /// Create an account with staff and superuser flags set.
    async fn create_superuser(
        &self,
        email: Option<String>,
        password: Password,
    ) -> Result<User, CreateUserError>;

    /// Apply profile changes. Passwords are re-hashed.
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, Error>;
}
