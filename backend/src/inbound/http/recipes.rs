//! Recipe handlers.
//!
//! ```text
//! GET    /api/v1/recipes?tags=<uuid,..>&ingredients=<uuid,..>
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PUT    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! POST   /api/v1/recipes/{id}/upload-image   (raw body, Content-Disposition filename)
//! ```

use actix_web::http::header::{self, ContentDisposition};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};

use crate::domain::ports::ImageUpload;
use crate::domain::{Error, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes_dto::{
    RecipeDetailResponse, RecipeImageResponse, RecipeListQuery, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ErrorCode, FieldName, invalid_field, parse_id};

const ID: FieldName = FieldName::new("id");
const IMAGE: FieldName = FieldName::new("image");

/// Largest accepted image upload.
pub const IMAGE_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

fn recipe_id(raw: &str) -> Result<RecipeId, Error> {
    parse_id(raw, ID)
}

fn upload_filename(req: &HttpRequest) -> Result<String, Error> {
    req.headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| ContentDisposition::from_raw(value).ok())
        .and_then(|disposition| disposition.get_filename().map(str::to_owned))
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            invalid_field(
                IMAGE,
                ErrorCode::InvalidImage,
                "upload needs a Content-Disposition header with a filename",
            )
        })
}

/// List the caller's recipes by title, optionally filtered by tag and
/// ingredient ids.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let owner = session.require_user_id()?;
    let filter = query.to_filter()?;
    let recipes = state.recipe_query.list(&owner, filter).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.create(&owner, draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

/// One of the caller's recipes with tags and ingredients expanded.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeDetailResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let owner = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let detail = state.recipe_query.detail(&owner, id).await?;
    Ok(web::Json(RecipeDetailResponse::from(&detail)))
}

/// Replace every writable field of a recipe.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let owner = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    let recipe = state.recipes.replace(&owner, id, draft).await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Update the supplied fields of a recipe.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let owner = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    let recipe = state.recipes.patch(&owner, id, patch).await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Delete a recipe. Its tags and ingredients are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = recipe_id(&path)?;
    state.recipes.delete(&owner, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Store an image for a recipe, replacing any previous one.
///
/// The request body is the raw file; its name comes from the
/// `Content-Disposition` header and only the extension is kept.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/upload-image",
    params(
        ("id" = String, Path, description = "Recipe id"),
        ("Content-Disposition" = String, Header, description = "attachment; filename=\"photo.jpg\"")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeImageResponse>> {
    let owner = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let filename = upload_filename(&req)?;
    let upload = ImageUpload {
        filename,
        bytes: body.to_vec(),
    };
    let recipe = state.recipes.attach_image(&owner, id, upload).await?;
    Ok(web::Json(RecipeImageResponse::from(&recipe)))
}

/// Register the recipe routes on a `/api/v1` scope.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_recipes)
        .service(create_recipe)
        .service(get_recipe)
        .service(replace_recipe)
        .service(patch_recipe)
        .service(delete_recipe)
        .service(
            web::resource("/recipes/{id}/upload-image")
                .app_data(web::PayloadConfig::new(IMAGE_UPLOAD_MAX_BYTES))
                .route(web::post().to(upload_image)),
        );
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
