//! Typed UUID identifiers for the recipe aggregates.
//!
//! Each entity gets its own identifier type so a tag id can never be handed
//! to a recipe lookup by accident. All identifiers share one shape: a UUID
//! wrapper that parses from canonical strings and serialises as a string.

use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

/// Validation errors returned when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("{kind} id must not be empty")]
    Empty { kind: &'static str },
    /// The identifier was not a canonical UUID.
    #[error("{kind} id must be a valid UUID")]
    Invalid { kind: &'static str },
}

/// Behaviour shared by every entity identifier.
pub trait EntityId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    /// Wrap an existing UUID.
    fn from_uuid(uuid: Uuid) -> Self;

    /// Access the underlying UUID.
    fn as_uuid(&self) -> &Uuid;

    /// Generate a fresh random identifier.
    fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Parse a canonical UUID string. Surrounding whitespace is rejected.
    fn parse(raw: &str) -> Result<Self, IdValidationError> {
        if raw.is_empty() {
            return Err(IdValidationError::Empty { kind: Self::KIND });
        }
        if raw.trim() != raw {
            return Err(IdValidationError::Invalid { kind: Self::KIND });
        }
        Uuid::parse_str(raw)
            .map(Self::from_uuid)
            .map_err(|_| IdValidationError::Invalid { kind: Self::KIND })
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct an identifier from a string.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                <Self as EntityId>::parse(id.as_ref())
            }
        }

        impl EntityId for $name {
            const KIND: &'static str = $kind;

            fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_entity_id! {
    /// Stable user identifier.
    UserId => "user"
}

define_entity_id! {
    /// Identifier of a user-owned tag.
    TagId => "tag"
}

define_entity_id! {
    /// Identifier of a user-owned ingredient.
    IngredientId => "ingredient"
}

define_entity_id! {
    /// Identifier of a recipe.
    RecipeId => "recipe"
}
