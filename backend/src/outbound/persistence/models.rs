//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changeset struct for updating existing user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// ---------------------------------------------------------------------------
// Label models
// ---------------------------------------------------------------------------

/// Row struct for reading from the tags table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Insertable struct for creating ingredients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: Option<String>,
    pub image: Option<String>,
}

/// Insertable struct for creating recipes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Changeset for overwriting a recipe. `None` clears nullable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price_cents: i64,
    pub link: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Association row linking a recipe to a tag.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeTagRow {
    pub recipe_id: Uuid,
    pub tag_id: Uuid,
    pub position: i32,
}

/// Association row linking a recipe to an ingredient.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub position: i32,
}
