//! Account handlers: registration, login and the caller's own profile.
//!
//! ```text
//! POST  /api/v1/users    {"email":"cook@example.com","password":"secret","name":"Ada"}
//! POST  /api/v1/login    {"email":"cook@example.com","password":"secret"}
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me {"name":"Ada Lovelace"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{CreateUserRequest, UpdateProfileRequest};
use crate::domain::{
    EmailError, Error, LoginCredentials, LoginValidationError, Password, PasswordError, User,
    UserExtras, UserName,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, invalid_field, password_error, present, read_only_field_error, require,
    user_name_error,
};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
    #[schema(example = "Ada")]
    pub name: Option<String>,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Profile changes for `PATCH /api/v1/users/me`. The email is the login
/// identity and cannot be changed here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileBody {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<serde_json::Value>>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account. Password digests never leave the server.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().to_string(),
        }
    }
}

fn login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Email(EmailError::Blank) => invalid_field(
            EMAIL,
            ErrorCode::BlankField,
            "email must not be empty",
        ),
        LoginValidationError::Email(inner) => invalid_field(
            EMAIL,
            ErrorCode::InvalidEmail,
            format!("email is invalid: {inner}"),
        ),
        LoginValidationError::EmptyPassword => password_error(PasswordError::Empty),
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let password = Password::new(require(password, PASSWORD)?).map_err(password_error)?;
    let request = CreateUserRequest {
        email,
        password,
        extras: UserExtras { name },
    };

    let user = state.accounts.create_user(request).await.map_err(|err| {
        if err.is_contract_violation() {
            debug!(error = %err, "registration without an email");
        }
        Error::from(err)
    })?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// The authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.account_query.fetch_profile(&user_id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Update the caller's name and/or password.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    if body.email.is_some() {
        return Err(read_only_field_error(EMAIL));
    }
    let name = body
        .name
        .map(UserName::new)
        .transpose()
        .map_err(|err| user_name_error(&err))?;
    let password = body
        .password
        .map(Password::new)
        .transpose()
        .map_err(password_error)?;

    let user = state
        .accounts
        .update_profile(UpdateProfileRequest {
            user_id,
            name,
            password,
        })
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}
