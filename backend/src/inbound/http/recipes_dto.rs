//! Recipe wire types and request parsing.
//!
//! Recipes have three read forms: the list form carries tag and ingredient
//! ids, the detail form nests `{id, name}` objects, and the image form
//! carries only the id and stored image path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    CookingTime, EntityId, Error, IngredientId, Price, Recipe, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeLink, RecipePatch, RecipeTitle, RecipeValidationError, TIME_MINUTES_MAX,
    TagId,
};
use crate::inbound::http::labels_dto::LabelResponse;
use crate::inbound::http::validation::{
    FieldName, parse_id_csv, parse_id_list, present, read_only_field_error, recipe_error,
    require,
};

const ID: FieldName = FieldName::new("id");
const IMAGE: FieldName = FieldName::new("image");
const TITLE: FieldName = FieldName::new("title");
const TIME_MINUTES: FieldName = FieldName::new("time_minutes");
const PRICE: FieldName = FieldName::new("price");
const TAGS: FieldName = FieldName::new("tags");
const INGREDIENTS: FieldName = FieldName::new("ingredients");

/// Prices arrive either as decimal strings (`"5.50"`) or JSON numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    #[schema(value_type = f64)]
    Number(serde_json::Number),
}

impl PriceInput {
    fn parse(&self) -> Result<Price, RecipeValidationError> {
        match self {
            Self::Text(raw) => Price::parse(raw),
            Self::Number(number) => Price::parse(&number.to_string()),
        }
    }
}

/// Body for creating, replacing or patching a recipe.
///
/// Every field is optional at the wire level so that missing fields can be
/// reported with the shared error envelope. `id` and `image` are read-only.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RecipeRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, read_only)]
    pub id: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, read_only)]
    pub image: Option<Option<Value>>,
    #[schema(example = "Sample recipe")]
    pub title: Option<String>,
    #[schema(value_type = Option<i64>, example = 10)]
    pub time_minutes: Option<serde_json::Number>,
    #[schema(example = "5.50")]
    pub price: Option<PriceInput>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, example = "https://example.com/recipe.pdf")]
    pub link: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

fn time_minutes(raw: &serde_json::Number) -> Result<CookingTime, Error> {
    raw.as_i64()
        .ok_or(RecipeValidationError::InvalidTimeMinutes {
            max: TIME_MINUTES_MAX,
        })
        .and_then(CookingTime::from_signed)
        .map_err(|err| recipe_error(&err))
}

fn title(raw: &str) -> Result<RecipeTitle, Error> {
    RecipeTitle::new(raw).map_err(|err| recipe_error(&err))
}

fn price(raw: &PriceInput) -> Result<Price, Error> {
    raw.parse().map_err(|err| recipe_error(&err))
}

fn link(raw: Option<&str>) -> Result<Option<RecipeLink>, Error> {
    raw.map_or(Ok(None), RecipeLink::optional)
        .map_err(|err| recipe_error(&err))
}

impl RecipeRequest {
    fn reject_read_only(&self) -> Result<(), Error> {
        if self.id.is_some() {
            return Err(read_only_field_error(ID));
        }
        if self.image.is_some() {
            return Err(read_only_field_error(IMAGE));
        }
        Ok(())
    }

    /// Validate a full write: title, cooking time and price are required;
    /// missing relations mean none.
    pub(crate) fn into_draft(self) -> Result<RecipeDraft, Error> {
        self.reject_read_only()?;
        Ok(RecipeDraft {
            title: title(&require(self.title, TITLE)?)?,
            time_minutes: time_minutes(&require(self.time_minutes, TIME_MINUTES)?)?,
            price: price(&require(self.price, PRICE)?)?,
            link: link(self.link.flatten().as_deref())?,
            tags: parse_id_list::<TagId>(&self.tags.unwrap_or_default(), TAGS)?,
            ingredients: parse_id_list::<IngredientId>(
                &self.ingredients.unwrap_or_default(),
                INGREDIENTS,
            )?,
        })
    }

    /// Validate a partial write. Only supplied fields change; `null` or an
    /// empty string clears the link.
    pub(crate) fn into_patch(self) -> Result<RecipePatch, Error> {
        self.reject_read_only()?;
        Ok(RecipePatch {
            title: self.title.as_deref().map(title).transpose()?,
            time_minutes: self.time_minutes.as_ref().map(time_minutes).transpose()?,
            price: self.price.as_ref().map(price).transpose()?,
            link: self
                .link
                .map(|raw| link(raw.as_deref()))
                .transpose()?,
            tags: self
                .tags
                .map(|ids| parse_id_list::<TagId>(&ids, TAGS))
                .transpose()?,
            ingredients: self
                .ingredients
                .map(|ids| parse_id_list::<IngredientId>(&ids, INGREDIENTS))
                .transpose()?,
        })
    }
}

/// Query string for recipe listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Comma-separated tag ids; recipes with any of them match.
    pub tags: Option<String>,
    /// Comma-separated ingredient ids; recipes with any of them match.
    pub ingredients: Option<String>,
}

impl RecipeListQuery {
    pub(crate) fn to_filter(&self) -> Result<RecipeFilter, Error> {
        Ok(RecipeFilter {
            tags: parse_id_csv::<TagId>(self.tags.as_deref(), TAGS)?,
            ingredients: parse_id_csv::<IngredientId>(self.ingredients.as_deref(), INGREDIENTS)?,
        })
    }
}

fn uuids<I: EntityId>(ids: &[I]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

/// List form of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    #[schema(example = "Sample recipe")]
    pub title: String,
    pub ingredients: Vec<Uuid>,
    pub tags: Vec<Uuid>,
    #[schema(example = 10)]
    pub time_minutes: u32,
    /// Decimal string with two places.
    #[schema(example = "5.50")]
    pub price: String,
    /// Empty when the recipe has no link.
    pub link: String,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: *recipe.id().as_uuid(),
            title: recipe.title().to_string(),
            ingredients: uuids(recipe.ingredients()),
            tags: uuids(recipe.tags()),
            time_minutes: recipe.time_minutes().minutes(),
            price: recipe.price().to_string(),
            link: recipe.link().map(ToString::to_string).unwrap_or_default(),
        }
    }
}

/// Detail form of a recipe with tags and ingredients expanded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub ingredients: Vec<LabelResponse>,
    pub tags: Vec<LabelResponse>,
    pub time_minutes: u32,
    #[schema(example = "5.50")]
    pub price: String,
    pub link: String,
}

impl From<&RecipeDetail> for RecipeDetailResponse {
    fn from(detail: &RecipeDetail) -> Self {
        let base = RecipeResponse::from(&detail.recipe);
        Self {
            id: base.id,
            title: base.title,
            ingredients: detail
                .ingredients
                .iter()
                .map(LabelResponse::from_label)
                .collect(),
            tags: detail.tags.iter().map(LabelResponse::from_label).collect(),
            time_minutes: base.time_minutes,
            price: base.price,
            link: base.link,
        }
    }
}

/// Image form of a recipe, returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecipeImageResponse {
    pub id: Uuid,
    #[schema(example = "uploads/recipe/3fa85f64-5717-4562-b3fc-2c963f66afa6.jpg")]
    pub image: Option<String>,
}

impl From<&Recipe> for RecipeImageResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: *recipe.id().as_uuid(),
            image: recipe.image().map(|path| path.as_str().to_owned()),
        }
    }
}
