//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the deployed database exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When the schema changes, regenerate this file with `diesel print-schema`
//! against a live database or update it by hand.

diesel::table! {
    /// User accounts.
    ///
    /// `email` carries a unique index over the normalised address.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised email address (max 255 characters).
        email -> Varchar,
        /// Free-text display name, possibly empty.
        name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        /// Set by the column default on insert.
        created_at -> Timestamptz,
        /// Bumped to `now()` by every update.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned recipe tags.
    tags (id) {
        id -> Uuid,
        /// Owning user; cascades on user delete.
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned ingredients.
    ingredients (id) {
        id -> Uuid,
        /// Owning user; cascades on user delete.
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes. Prices are stored as integer cents.
    recipes (id) {
        id -> Uuid,
        /// Owning user; cascades on user delete.
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        /// Price in cents, `0..=99999`.
        price_cents -> Int8,
        link -> Nullable<Varchar>,
        /// Relative path under the media root, e.g. `uploads/recipe/<id>.jpg`.
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe-to-tag association. Rows cascade on delete of either side.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Uuid,
        tag_id -> Uuid,
        /// Order in which the tag was attached.
        position -> Int4,
    }
}

diesel::table! {
    /// Recipe-to-ingredient association. Rows cascade on delete of either
    /// side.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Uuid,
        /// Order in which the ingredient was attached.
        position -> Int4,
    }
}

diesel::joinable!(tags -> users (user_id));
diesel::joinable!(ingredients -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
);
