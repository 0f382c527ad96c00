//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every handler annotated in the inbound layer, the
//! request and response DTOs, and the schema wrappers for domain errors. The
//! document is served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::labels_dto::{LabelRequest, LabelResponse};
use crate::inbound::http::recipes_dto::{
    PriceInput, RecipeDetailResponse, RecipeImageResponse, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateProfileBody, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Session-authenticated management of recipes, tags and ingredients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::labels::list_tags,
        crate::inbound::http::labels::create_tag,
        crate::inbound::http::labels::update_tag,
        crate::inbound::http::labels::delete_tag,
        crate::inbound::http::labels::list_ingredients,
        crate::inbound::http::labels::create_ingredient,
        crate::inbound::http::labels::update_ingredient,
        crate::inbound::http::labels::delete_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        UpdateProfileBody,
        UserResponse,
        LabelRequest,
        LabelResponse,
        PriceInput,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
        RecipeImageResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and the caller's profile"),
        (name = "tags", description = "Tags owned by the caller"),
        (name = "ingredients", description = "Ingredients owned by the caller"),
        (name = "recipes", description = "Recipes owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
