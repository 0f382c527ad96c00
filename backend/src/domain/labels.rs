//! Tags and ingredients: user-owned labels attached to recipes.
//!
//! Both entities share one shape (an id, an owner and a name) and the same
//! validation rules. The [`Label`] trait lets services and repositories
//! handle them generically.

use std::fmt;

use serde::Serialize;

use super::{EntityId, IngredientId, Owned, TagId, UserId};

/// Maximum length of a label name.
pub const LABEL_NAME_MAX: usize = 255;

/// Validation errors for label names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelValidationError {
    /// Name was empty once trimmed.
    #[error("name must not be blank")]
    BlankName,
    /// Name exceeds [`LABEL_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Validated label name, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct LabelName(String);

impl LabelName {
    /// Validate and construct a [`LabelName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, LabelValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LabelValidationError::BlankName);
        }
        if trimmed.chars().count() > LABEL_NAME_MAX {
            return Err(LabelValidationError::NameTooLong {
                max: LABEL_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LabelName> for String {
    fn from(value: LabelName) -> Self {
        value.0
    }
}

/// Which relation of a recipe a label type populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Recipe tags.
    Tag,
    /// Recipe ingredients.
    Ingredient,
}

impl LabelKind {
    /// Singular noun for messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

    /// Recipe field name carrying this relation on the wire.
    pub fn field(self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::Ingredient => "ingredients",
        }
    }
}

/// Behaviour shared by [`Tag`] and [`Ingredient`].
pub trait Label:
    Owned + Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static
{
    /// Identifier type of this label.
    type Id: EntityId;

    /// Relation this label populates.
    const KIND: LabelKind;

    /// Build a label from validated parts.
    fn from_parts(id: Self::Id, owner: UserId, name: LabelName) -> Self;

    /// Stable identifier.
    fn id(&self) -> Self::Id;

    /// Display name.
    fn name(&self) -> &LabelName;

    /// Copy of this label carrying a new name.
    #[must_use]
    fn renamed(&self, name: LabelName) -> Self {
        Self::from_parts(self.id(), *self.owner(), name)
    }
}

macro_rules! define_label {
    ($(#[$meta:meta])* $name:ident, $id:ty, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        pub struct $name {
            id: $id,
            #[serde(skip)]
            owner: UserId,
            name: LabelName,
        }

        impl $name {
            /// Create a new label with a fresh identifier.
            pub fn new(owner: UserId, name: LabelName) -> Self {
                Self {
                    id: <$id as EntityId>::random(),
                    owner,
                    name,
                }
            }
        }

        impl Label for $name {
            type Id = $id;

            const KIND: LabelKind = $kind;

            fn from_parts(id: $id, owner: UserId, name: LabelName) -> Self {
                Self { id, owner, name }
            }

            fn id(&self) -> $id {
                self.id
            }

            fn name(&self) -> &LabelName {
                &self.name
            }
        }

        impl Owned for $name {
            fn owner(&self) -> &UserId {
                &self.owner
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.name, f)
            }
        }
    };
}

define_label! {
    /// A user-defined tag such as "Vegan" or "Dessert".
    Tag, TagId, LabelKind::Tag
}

define_label! {
    /// A user-defined ingredient such as "Salt".
    Ingredient, IngredientId, LabelKind::Ingredient
}

/// Order labels the way listings present them: name descending, then id.
pub fn sort_labels<L: Label>(labels: &mut [L]) {
    labels.sort_by(|a, b| b.name().cmp(a.name()).then_with(|| a.id().cmp(&b.id())));
}
