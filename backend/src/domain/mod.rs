//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters, plus the services implementing each use-case over
//! the ports in [`ports`]. Types validate on construction so adapters never
//! hold an invalid value.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - User, Tag, Ingredient, Recipe: the four aggregates.
//! - AccountService, LabelService, RecipeService: use-case implementations.
//! - OwnerScope: per-user visibility for every lookup.

pub(crate) mod access_scope;
mod account_service;
mod auth;
mod email;
pub mod error;
mod ids;
mod image_path;
mod label_service;
mod labels;
mod password;
pub mod ports;
mod recipe;
mod recipe_service;
mod trace_id;
mod user;

pub use self::access_scope::{OwnerScope, Owned, dedupe_ids, reference_not_found};
pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::email::{EMAIL_MAX, EmailAddress, EmailError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{EntityId, IdValidationError, IngredientId, RecipeId, TagId, UserId};
pub use self::image_path::{
    EXTENSION_MAX, ImagePathError, RECIPE_UPLOAD_DIR, RandomUploadIds, RecipeImagePath,
    UploadIdSource, recipe_image_file_path, recipe_image_file_path_with,
};
pub use self::label_service::LabelService;
pub use self::labels::{
    Ingredient, LABEL_NAME_MAX, Label, LabelKind, LabelName, LabelValidationError, Tag,
    sort_labels,
};
pub use self::password::{Password, PasswordDigest, PasswordError};
pub use self::recipe::{
    CookingTime, LINK_MAX, PRICE_MAX_CENTS, Price, Recipe, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeLink, RecipePatch, RecipeRecord, RecipeTitle, RecipeValidationError,
    TIME_MINUTES_MAX, TITLE_MAX, sort_recipes,
};
pub use self::recipe_service::RecipeService;
pub use self::trace_id::{InvalidTraceId, TraceId};
pub use self::user::{
    CreateUserError, USER_NAME_MAX, User, UserExtras, UserName, UserRecord, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
