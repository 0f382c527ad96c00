//! Recipe aggregate, its scalar value objects and list filters.
//!
//! A recipe references tags and ingredients by id only. Ownership of those
//! references is checked by [`crate::domain::OwnerScope`] before a recipe is
//! built, so the types here assume every id they hold is already scoped.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use url::Url;

use super::{
    EntityId, Ingredient, IngredientId, Owned, RecipeId, RecipeImagePath, Tag, TagId, UserId,
};

/// Maximum length of a recipe title.
pub const TITLE_MAX: usize = 255;
/// Maximum length of a recipe link.
pub const LINK_MAX: usize = 255;
/// Largest representable price in cents: five digits, two of them decimal.
pub const PRICE_MAX_CENTS: i64 = 99_999;
/// Largest accepted cooking time; the store keeps a signed 32-bit column.
pub const TIME_MINUTES_MAX: u32 = i32::MAX.unsigned_abs();

/// Validation failures for recipe fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// Title was empty once trimmed.
    #[error("title must not be blank")]
    BlankTitle,
    /// Title exceeds [`TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Cooking time was negative, fractional or too large.
    #[error("time_minutes must be a whole number between 0 and {max}")]
    InvalidTimeMinutes { max: u32 },
    /// Price could not be parsed as a decimal number.
    #[error("price must be a decimal number")]
    MalformedPrice,
    /// Price was negative.
    #[error("price must not be negative")]
    NegativePrice,
    /// Price carried more than two decimal places.
    #[error("price must have at most 2 decimal places")]
    PriceTooPrecise,
    /// Price needed more than five digits.
    #[error("price must have at most 5 digits")]
    PriceTooLarge,
    /// Link was not an absolute http(s) URL.
    #[error("link must be an absolute http or https URL")]
    InvalidLink,
    /// Link exceeds [`LINK_MAX`] characters.
    #[error("link must be at most {max} characters")]
    LinkTooLong { max: usize },
}

impl RecipeValidationError {
    /// Wire field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankTitle | Self::TitleTooLong { .. } => "title",
            Self::InvalidTimeMinutes { .. } => "time_minutes",
            Self::MalformedPrice
            | Self::NegativePrice
            | Self::PriceTooPrecise
            | Self::PriceTooLarge => "price",
            Self::InvalidLink | Self::LinkTooLong { .. } => "link",
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankTitle => "blank_field",
            Self::TitleTooLong { .. } | Self::LinkTooLong { .. } => "too_long",
            Self::InvalidTimeMinutes { .. } => "invalid_time_minutes",
            Self::MalformedPrice
            | Self::NegativePrice
            | Self::PriceTooPrecise
            | Self::PriceTooLarge => "invalid_price",
            Self::InvalidLink => "invalid_link",
        }
    }
}

/// Non-blank recipe title, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Validate and construct a [`RecipeTitle`].
    pub fn new(title: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::BlankTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(RecipeValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preparation time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CookingTime(u32);

impl CookingTime {
    /// Validate and construct a [`CookingTime`].
    pub fn new(minutes: u32) -> Result<Self, RecipeValidationError> {
        if minutes > TIME_MINUTES_MAX {
            return Err(RecipeValidationError::InvalidTimeMinutes {
                max: TIME_MINUTES_MAX,
            });
        }
        Ok(Self(minutes))
    }

    /// Accept a signed value, rejecting negatives.
    pub fn from_signed(minutes: i64) -> Result<Self, RecipeValidationError> {
        u32::try_from(minutes)
            .map_err(|_| RecipeValidationError::InvalidTimeMinutes {
                max: TIME_MINUTES_MAX,
            })
            .and_then(Self::new)
    }

    /// Minutes as an unsigned integer.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

/// Non-negative price with two decimal places, held as whole cents.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Price;
///
/// let price = Price::parse("5.5").expect("valid price");
/// assert_eq!(price.cents(), 550);
/// assert_eq!(price.to_string(), "5.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(i64);

impl Price {
    /// Construct from whole cents.
    pub fn from_cents(cents: i64) -> Result<Self, RecipeValidationError> {
        if cents < 0 {
            return Err(RecipeValidationError::NegativePrice);
        }
        if cents > PRICE_MAX_CENTS {
            return Err(RecipeValidationError::PriceTooLarge);
        }
        Ok(Self(cents))
    }

    /// Construct from a decimal amount with at most two decimal places.
    pub fn from_decimal(amount: Decimal) -> Result<Self, RecipeValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        if amount.normalize().scale() > 2 {
            return Err(RecipeValidationError::PriceTooPrecise);
        }
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .ok_or(RecipeValidationError::PriceTooLarge)?;
        Self::from_cents(cents)
    }

    /// Parse a decimal string such as `"5.50"`.
    pub fn parse(raw: &str) -> Result<Self, RecipeValidationError> {
        let amount =
            Decimal::from_str(raw.trim()).map_err(|_| RecipeValidationError::MalformedPrice)?;
        Self::from_decimal(amount)
    }

    /// Price in whole cents.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Price as a two-place decimal.
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_decimal(), f)
    }
}

/// Absolute http(s) link to an external recipe page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    /// Validate a link. The caller's spelling is kept.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > LINK_MAX {
            return Err(RecipeValidationError::LinkTooLong { max: LINK_MAX });
        }
        let url = Url::parse(trimmed).map_err(|_| RecipeValidationError::InvalidLink)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RecipeValidationError::InvalidLink);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validate an optional link where the empty string means "no link".
    pub fn optional(raw: &str) -> Result<Option<Self>, RecipeValidationError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Self::new(raw).map(Some)
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete set of writable recipe fields, used for create and replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: RecipeTitle,
    pub time_minutes: CookingTime,
    pub price: Price,
    pub link: Option<RecipeLink>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientId>,
}

/// Partial update; `None` leaves a field untouched.
///
/// `link: Some(None)` clears the link. Supplied `tags` or `ingredients`
/// replace the whole relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<RecipeTitle>,
    pub time_minutes: Option<CookingTime>,
    pub price: Option<Price>,
    pub link: Option<Option<RecipeLink>>,
    pub tags: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<IngredientId>>,
}

/// Stored representation used by repositories to rebuild a [`Recipe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub owner: UserId,
    pub title: RecipeTitle,
    pub time_minutes: CookingTime,
    pub price: Price,
    pub link: Option<RecipeLink>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientId>,
    pub image: Option<RecipeImagePath>,
}

/// A user's recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    owner: UserId,
    title: RecipeTitle,
    time_minutes: CookingTime,
    price: Price,
    link: Option<RecipeLink>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientId>,
    image: Option<RecipeImagePath>,
}

impl Recipe {
    /// Create a recipe with a fresh identifier and no image.
    pub fn new(owner: UserId, draft: RecipeDraft) -> Self {
        let RecipeDraft {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        } = draft;
        Self {
            id: RecipeId::random(),
            owner,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            image: None,
        }
    }

    /// Rebuild a recipe from storage.
    pub fn from_record(record: RecipeRecord) -> Self {
        let RecipeRecord {
            id,
            owner,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            image,
        } = record;
        Self {
            id,
            owner,
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
            image,
        }
    }

    /// Overwrite every writable field. Identity, owner and image survive.
    pub fn replace(&mut self, draft: RecipeDraft) {
        self.title = draft.title;
        self.time_minutes = draft.time_minutes;
        self.price = draft.price;
        self.link = draft.link;
        self.tags = draft.tags;
        self.ingredients = draft.ingredients;
    }

    /// Overwrite the supplied fields only.
    pub fn apply(&mut self, patch: RecipePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(time_minutes) = patch.time_minutes {
            self.time_minutes = time_minutes;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(link) = patch.link {
            self.link = link;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
    }

    /// Store a new image reference, returning the one it replaces.
    pub fn set_image(&mut self, image: RecipeImagePath) -> Option<RecipeImagePath> {
        self.image.replace(image)
    }

    /// Drop a tag from the relation, if present.
    pub fn forget_tag(&mut self, tag: TagId) {
        self.tags.retain(|id| *id != tag);
    }

    /// Drop an ingredient from the relation, if present.
    pub fn forget_ingredient(&mut self, ingredient: IngredientId) {
        self.ingredients.retain(|id| *id != ingredient);
    }

    /// Stable identifier.
    pub fn id(&self) -> RecipeId {
        self.id
    }

    /// Title.
    pub fn title(&self) -> &RecipeTitle {
        &self.title
    }

    /// Preparation time.
    pub fn time_minutes(&self) -> CookingTime {
        self.time_minutes
    }

    /// Price.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Optional external link.
    pub fn link(&self) -> Option<&RecipeLink> {
        self.link.as_ref()
    }

    /// Attached tag ids, in attachment order.
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Attached ingredient ids, in attachment order.
    pub fn ingredients(&self) -> &[IngredientId] {
        &self.ingredients
    }

    /// Stored image reference, if any.
    pub fn image(&self) -> Option<&RecipeImagePath> {
        self.image.as_ref()
    }
}

impl Owned for Recipe {
    fn owner(&self) -> &UserId {
        &self.owner
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.title, f)
    }
}

/// Recipe with its tag and ingredient relations expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

/// List filter: a recipe matches when it carries any requested tag and any
/// requested ingredient. An empty list does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientId>,
}

impl RecipeFilter {
    /// Whether `recipe` passes the filter.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let tag_ok = self.tags.is_empty() || recipe.tags.iter().any(|id| self.tags.contains(id));
        let ingredient_ok = self.ingredients.is_empty()
            || recipe
                .ingredients
                .iter()
                .any(|id| self.ingredients.contains(id));
        tag_ok && ingredient_ok
    }
}

/// Order recipes the way listings present them: title, then id.
pub fn sort_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}
