//! Account domain service.
//!
//! Implements registration, authentication and the "manage my profile"
//! use-cases over a [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CreateUserRequest, LoginService, UpdateProfileRequest,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    CreateUserError, Error, LoginCredentials, Password, PasswordError, User, UserId,
};

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    /// Create a new service over the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    fn map_repository_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { email } => {
                Error::internal(format!("unexpected email conflict for {email}"))
            }
        }
    }

    fn map_create_error(error: UserPersistenceError) -> CreateUserError {
        match error {
            UserPersistenceError::DuplicateEmail { .. } => CreateUserError::DuplicateEmail,
            UserPersistenceError::Connection { message } => {
                CreateUserError::Unavailable { message }
            }
            UserPersistenceError::Query { message } => CreateUserError::Storage { message },
        }
    }

    async fn persist_new(&self, user: User) -> Result<User, CreateUserError> {
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_create_error)?;
        debug!(user_id = %user.id(), "created user");
        Ok(user)
    }

    async fn load(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, CreateUserError> {
        let CreateUserRequest {
            email,
            password,
            extras,
        } = request;
        let user = User::create(email.as_deref(), &password, extras)?;
        self.persist_new(user).await
    }

    async fn create_superuser(
        &self,
        email: Option<String>,
        password: Password,
    ) -> Result<User, CreateUserError> {
        let user = User::create_superuser(email.as_deref(), &password)?;
        self.persist_new(user).await
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<User, Error> {
        let mut user = self.load(&request.user_id).await?;
        if let Some(name) = request.name {
            user.rename(name);
        }
        if let Some(password) = request.password {
            user.set_password(&password).map_err(password_error)?;
        }
        self.users
            .update(&user)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(user)
    }
}

#[async_trait]
impl<U> AccountQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load(user_id).await
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_repository_error)?;

        match user {
            Some(user)
                if user.is_active() && user.check_password(credentials.password().expose()) =>
            {
                Ok(*user.id())
            }
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

fn password_error(error: PasswordError) -> Error {
    match error {
        PasswordError::Empty => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "blank_field" })),
        PasswordError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
    }
}

impl From<CreateUserError> for Error {
    fn from(value: CreateUserError) -> Self {
        let message = value.to_string();
        let (field, code) = match value {
            CreateUserError::MissingEmail => ("email", "missing_field"),
            CreateUserError::InvalidEmail(_) => ("email", "invalid_email"),
            CreateUserError::InvalidName(_) => ("name", "too_long"),
            CreateUserError::DuplicateEmail => ("email", "duplicate"),
            CreateUserError::InvalidPassword(error) => return password_error(error),
            CreateUserError::Unavailable { message } => {
                return Self::service_unavailable(format!(
                    "user repository unavailable: {message}"
                ));
            }
            CreateUserError::Storage { message } => {
                return Self::internal(format!("user repository error: {message}"));
            }
        };
        Self::invalid_request(message).with_details(json!({ "field": field, "code": code }))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
