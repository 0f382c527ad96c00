//! PostgreSQL-backed `LabelRepository` implementations for tags and
//! ingredients.
//!
//! Both tables share one shape, so a macro stamps out the adapter for each.
//! Deleting a label relies on the `ON DELETE CASCADE` foreign key from its
//! association table to detach it from recipes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{LabelPersistenceError, LabelRepository};
use crate::domain::{EntityId, Ingredient, Label, LabelName, Owned, Tag, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::DbPool;
use super::schema::{ingredients, recipe_ingredients, recipe_tags, tags};

fn row_to_label<L: Label>(
    id: Uuid,
    owner: Uuid,
    name: String,
) -> Result<L, LabelPersistenceError> {
    let name = LabelName::new(name).map_err(|err| {
        LabelPersistenceError::query(format!(
            "invalid {} name in database: {err}",
            L::KIND.noun()
        ))
    })?;
    Ok(L::from_parts(
        <L::Id as EntityId>::from_uuid(id),
        UserId::from_uuid(owner),
        name,
    ))
}

fn to_uuids<I: EntityId>(ids: &[I]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

macro_rules! diesel_label_repository {
    (
        $(#[$meta:meta])*
        $repo:ident, $label:ty, $table:ident, $row:ty, $new_row:ident,
        $join:ident :: $join_column:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl LabelRepository<$label> for $repo {
            async fn insert(&self, label: &$label) -> Result<(), LabelPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = $new_row {
                    id: *label.id().as_uuid(),
                    user_id: *label.owner().as_uuid(),
                    name: label.name().as_ref(),
                };
                diesel::insert_into($table::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }

            async fn update(&self, label: &$label) -> Result<(), LabelPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let name: &str = label.name().as_ref();
                let updated = diesel::update($table::table.find(label.id().as_uuid()))
                    .set($table::name.eq(name))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                if updated == 0 {
                    return Err(LabelPersistenceError::query(format!(
                        "{} not found for update",
                        <$label as Label>::KIND.noun()
                    )));
                }
                Ok(())
            }

            async fn delete(
                &self,
                id: &<$label as Label>::Id,
            ) -> Result<bool, LabelPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let removed = diesel::delete($table::table.find(id.as_uuid()))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(removed > 0)
            }

            async fn find_by_ids(
                &self,
                ids: &[<$label as Label>::Id],
            ) -> Result<Vec<$label>, LabelPersistenceError> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .filter($table::id.eq_any(to_uuids(ids)))
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter()
                    .map(|row| row_to_label(row.id, row.user_id, row.name))
                    .collect()
            }

            async fn list_for_owner(
                &self,
                owner: &UserId,
                assigned_only: bool,
            ) -> Result<Vec<$label>, LabelPersistenceError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let mut query = $table::table
                    .filter($table::user_id.eq(owner.as_uuid()))
                    .select(<$row>::as_select())
                    .order(($table::name.desc(), $table::id.asc()))
                    .into_boxed();
                if assigned_only {
                    query = query.filter(
                        $table::id.eq_any($join::table.select($join::$join_column)),
                    );
                }
                let rows: Vec<$row> = query
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter()
                    .map(|row| row_to_label(row.id, row.user_id, row.name))
                    .collect()
            }
        }
    };
}

diesel_label_repository! {
    /// Diesel-backed tag storage.
    DieselTagRepository, Tag, tags, TagRow, NewTagRow, recipe_tags::tag_id
}

diesel_label_repository! {
    /// Diesel-backed ingredient storage.
    DieselIngredientRepository, Ingredient, ingredients, IngredientRow, NewIngredientRow,
    recipe_ingredients::ingredient_id
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use crate::domain::TagId;
    use rstest::rstest;

    #[rstest]
    fn rows_rebuild_labels_with_their_owner() {
        let (id, owner) = (Uuid::new_v4(), Uuid::new_v4());
        let tag: Tag = row_to_label(id, owner, "Vegan".to_owned()).expect("valid row");

        assert_eq!(tag.id(), TagId::from_uuid(id));
        assert_eq!(tag.owner(), &UserId::from_uuid(owner));
        assert_eq!(tag.to_string(), "Vegan");
    }

    #[rstest]
    fn blank_names_in_storage_are_query_errors() {
        let err = row_to_label::<Ingredient>(Uuid::new_v4(), Uuid::new_v4(), "  ".to_owned())
            .expect_err("blank name");
        assert!(matches!(err, LabelPersistenceError::Query { .. }));
        assert!(err.to_string().contains("ingredient"));
    }
}
