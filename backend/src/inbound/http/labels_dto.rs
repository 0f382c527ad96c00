//! Tag and ingredient wire types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{EntityId, Label};
use crate::inbound::http::validation::present;

/// Body for creating or renaming a tag or ingredient.
///
/// `id` is accepted only so it can be rejected as read-only.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LabelRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, read_only)]
    pub id: Option<Option<serde_json::Value>>,
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

/// A tag or ingredient as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct LabelResponse {
    #[schema(example = "9b2f7c1e-8d4a-4f5b-a6c7-1e2d3f4a5b6c")]
    pub id: Uuid,
    #[schema(example = "Vegan")]
    pub name: String,
}

impl LabelResponse {
    /// Project any label kind onto the shared wire shape.
    pub fn from_label<L: Label>(label: &L) -> Self {
        Self {
            id: *label.id().as_uuid(),
            name: label.name().as_ref().to_owned(),
        }
    }
}

/// Query string for label listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LabelListQuery {
    /// Non-zero to list only labels attached to at least one recipe.
    pub assigned_only: Option<u8>,
}

impl LabelListQuery {
    pub(crate) fn assigned_only(&self) -> bool {
        self.assigned_only.is_some_and(|flag| flag != 0)
    }
}
