//! Tag and ingredient handlers.
//!
//! ```text
//! GET    /api/v1/tags?assigned_only=1
//! POST   /api/v1/tags        {"name":"Vegan"}
//! PATCH  /api/v1/tags/{id}   {"name":"Vegetarian"}
//! DELETE /api/v1/tags/{id}
//! ```
//!
//! Ingredients expose the same routes under `/api/v1/ingredients`. Both
//! kinds share one generic implementation; the per-kind handlers only pin
//! the label type for routing and OpenAPI.

use actix_web::{HttpResponse, web};

use crate::domain::{Error, Ingredient, Label, LabelName, Tag, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::labels_dto::{LabelListQuery, LabelRequest, LabelResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, LabelState};
use crate::inbound::http::validation::{
    FieldName, label_name_error, parse_id, read_only_field_error, require,
};

const ID: FieldName = FieldName::new("id");
const NAME: FieldName = FieldName::new("name");

fn label_name(body: LabelRequest) -> Result<LabelName, Error> {
    if body.id.is_some() {
        return Err(read_only_field_error(ID));
    }
    LabelName::new(require(body.name, NAME)?).map_err(|err| label_name_error(&err))
}

async fn list<L: Label>(
    state: &HttpState,
    owner: &UserId,
    query: &LabelListQuery,
) -> ApiResult<Vec<LabelResponse>>
where
    HttpState: LabelState<L>,
{
    let labels = <HttpState as LabelState<L>>::label_ports(state)
        .query
        .list(owner, query.assigned_only())
        .await?;
    Ok(labels.iter().map(LabelResponse::from_label).collect())
}

async fn create<L: Label>(
    state: &HttpState,
    owner: &UserId,
    body: LabelRequest,
) -> ApiResult<LabelResponse>
where
    HttpState: LabelState<L>,
{
    let name = label_name(body)?;
    let label: L = <HttpState as LabelState<L>>::label_ports(state)
        .command
        .create(owner, name)
        .await?;
    Ok(LabelResponse::from_label(&label))
}

async fn rename<L: Label>(
    state: &HttpState,
    owner: &UserId,
    id: &str,
    body: LabelRequest,
) -> ApiResult<LabelResponse>
where
    HttpState: LabelState<L>,
{
    let id = parse_id::<L::Id>(id, ID)?;
    let name = label_name(body)?;
    let label: L = <HttpState as LabelState<L>>::label_ports(state)
        .command
        .rename(owner, id, name)
        .await?;
    Ok(LabelResponse::from_label(&label))
}

async fn delete<L: Label>(state: &HttpState, owner: &UserId, id: &str) -> ApiResult<()>
where
    HttpState: LabelState<L>,
{
    let id = parse_id::<L::Id>(id, ID)?;
    <HttpState as LabelState<L>>::label_ports(state)
        .command
        .delete(owner, id)
        .await
}

macro_rules! label_handlers {
    (
        label = $label:ty,
        tag = $tag:literal,
        collection = $collection:literal,
        item = $item:literal,
        list = $list:ident,
        create = $create:ident,
        update = $update:ident,
        delete = $delete:ident $(,)?
    ) => {
        /// List the caller's labels of this kind, name descending.
        #[utoipa::path(
            get,
            path = $collection,
            params(LabelListQuery),
            responses(
                (status = 200, description = "Labels", body = [LabelResponse]),
                (status = 400, description = "Invalid request", body = ErrorSchema),
                (status = 401, description = "Unauthorised", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $list(
            state: web::Data<HttpState>,
            session: SessionContext,
            query: web::Query<LabelListQuery>,
        ) -> ApiResult<web::Json<Vec<LabelResponse>>> {
            let owner = session.require_user_id()?;
            list::<$label>(&state, &owner, &query).await.map(web::Json)
        }

        /// Create a label owned by the caller.
        #[utoipa::path(
            post,
            path = $collection,
            request_body = LabelRequest,
            responses(
                (status = 201, description = "Created", body = LabelResponse),
                (status = 400, description = "Invalid request", body = ErrorSchema),
                (status = 401, description = "Unauthorised", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $create(
            state: web::Data<HttpState>,
            session: SessionContext,
            payload: web::Json<LabelRequest>,
        ) -> ApiResult<HttpResponse> {
            let owner = session.require_user_id()?;
            let created = create::<$label>(&state, &owner, payload.into_inner()).await?;
            Ok(HttpResponse::Created().json(created))
        }

        /// Rename one of the caller's labels.
        #[utoipa::path(
            patch,
            path = $item,
            params(("id" = String, Path, description = "Label id")),
            request_body = LabelRequest,
            responses(
                (status = 200, description = "Renamed", body = LabelResponse),
                (status = 400, description = "Invalid request", body = ErrorSchema),
                (status = 401, description = "Unauthorised", body = ErrorSchema),
                (status = 404, description = "Not found", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $update(
            state: web::Data<HttpState>,
            session: SessionContext,
            path: web::Path<String>,
            payload: web::Json<LabelRequest>,
        ) -> ApiResult<web::Json<LabelResponse>> {
            let owner = session.require_user_id()?;
            rename::<$label>(&state, &owner, &path, payload.into_inner())
                .await
                .map(web::Json)
        }

        /// Delete one of the caller's labels, detaching it from recipes.
        #[utoipa::path(
            delete,
            path = $item,
            params(("id" = String, Path, description = "Label id")),
            responses(
                (status = 204, description = "Deleted"),
                (status = 400, description = "Invalid request", body = ErrorSchema),
                (status = 401, description = "Unauthorised", body = ErrorSchema),
                (status = 404, description = "Not found", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $delete(
            state: web::Data<HttpState>,
            session: SessionContext,
            path: web::Path<String>,
        ) -> ApiResult<HttpResponse> {
            let owner = session.require_user_id()?;
            delete::<$label>(&state, &owner, &path).await?;
            Ok(HttpResponse::NoContent().finish())
        }
    };
}

label_handlers!(
    label = Tag,
    tag = "tags",
    collection = "/api/v1/tags",
    item = "/api/v1/tags/{id}",
    list = list_tags,
    create = create_tag,
    update = update_tag,
    delete = delete_tag,
);

label_handlers!(
    label = Ingredient,
    tag = "ingredients",
    collection = "/api/v1/ingredients",
    item = "/api/v1/ingredients/{id}",
    list = list_ingredients,
    create = create_ingredient,
    update = update_ingredient,
    delete = delete_ingredient,
);

/// Register the tag and ingredient routes on a `/api/v1` scope.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tags")
            .route(web::get().to(list_tags))
            .route(web::post().to(create_tag)),
    )
    .service(
        web::resource("/tags/{id}")
            .route(web::patch().to(update_tag))
            .route(web::delete().to(delete_tag)),
    )
    .service(
        web::resource("/ingredients")
            .route(web::get().to(list_ingredients))
            .route(web::post().to(create_ingredient)),
    )
    .service(
        web::resource("/ingredients/{id}")
            .route(web::patch().to(update_ingredient))
            .route(web::delete().to(delete_ingredient)),
    );
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
