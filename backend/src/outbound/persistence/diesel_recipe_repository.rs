//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe and its association rows are written in one transaction. The
//! `position` column on `recipe_tags` and `recipe_ingredients` keeps the
//! attachment order the domain hands in, so reads return relations in the
//! same order.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecipePersistenceError, RecipeRepository};
use crate::domain::{
    CookingTime, EntityId, IngredientId, Owned, Price, Recipe, RecipeFilter, RecipeId,
    RecipeImagePath, RecipeLink, RecipeRecord, RecipeTitle, TagId, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, RecipeUpdate};
use super::pool::DbPool;
use super::schema::{recipe_ingredients, recipe_tags, recipes};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Association ids grouped by recipe id.
#[derive(Default)]
struct Relations {
    tags: HashMap<Uuid, Vec<TagId>>,
    ingredients: HashMap<Uuid, Vec<IngredientId>>,
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

fn minutes_column(recipe: &Recipe) -> i32 {
    i32::try_from(recipe.time_minutes().minutes()).unwrap_or(i32::MAX)
}

fn tag_rows(recipe: &Recipe) -> Vec<RecipeTagRow> {
    let recipe_id = *recipe.id().as_uuid();
    recipe
        .tags()
        .iter()
        .enumerate()
        .map(|(index, tag)| RecipeTagRow {
            recipe_id,
            tag_id: *tag.as_uuid(),
            position: position(index),
        })
        .collect()
}

fn ingredient_rows(recipe: &Recipe) -> Vec<RecipeIngredientRow> {
    let recipe_id = *recipe.id().as_uuid();
    recipe
        .ingredients()
        .iter()
        .enumerate()
        .map(|(index, ingredient)| RecipeIngredientRow {
            recipe_id,
            ingredient_id: *ingredient.as_uuid(),
            position: position(index),
        })
        .collect()
}

fn invalid_row(field: &str, detail: impl std::fmt::Display) -> RecipePersistenceError {
    RecipePersistenceError::query(format!("invalid recipe {field} in database: {detail}"))
}

fn row_to_recipe(
    row: RecipeRow,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientId>,
) -> Result<Recipe, RecipePersistenceError> {
    let minutes = u32::try_from(row.time_minutes)
        .map_err(|err| invalid_row("time_minutes", err))?;
    let link = row
        .link
        .as_deref()
        .map(RecipeLink::optional)
        .transpose()
        .map_err(|err| invalid_row("link", err))?
        .flatten();
    let image = row
        .image
        .map(RecipeImagePath::new)
        .transpose()
        .map_err(|err| invalid_row("image", err))?;

    Ok(Recipe::from_record(RecipeRecord {
        id: RecipeId::from_uuid(row.id),
        owner: UserId::from_uuid(row.user_id),
        title: RecipeTitle::new(&row.title).map_err(|err| invalid_row("title", err))?,
        time_minutes: CookingTime::new(minutes).map_err(|err| invalid_row("time_minutes", err))?,
        price: Price::from_cents(row.price_cents).map_err(|err| invalid_row("price", err))?,
        link,
        tags,
        ingredients,
        image,
    }))
}

async fn load_relations(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[Uuid],
) -> Result<Relations, diesel::result::Error> {
    let mut relations = Relations::default();
    if recipe_ids.is_empty() {
        return Ok(relations);
    }

    let tag_rows: Vec<RecipeTagRow> = recipe_tags::table
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .order((recipe_tags::recipe_id, recipe_tags::position))
        .select(RecipeTagRow::as_select())
        .load(conn)
        .await?;
    for row in tag_rows {
        relations
            .tags
            .entry(row.recipe_id)
            .or_default()
            .push(TagId::from_uuid(row.tag_id));
    }

    let ingredient_rows: Vec<RecipeIngredientRow> = recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order((recipe_ingredients::recipe_id, recipe_ingredients::position))
        .select(RecipeIngredientRow::as_select())
        .load(conn)
        .await?;
    for row in ingredient_rows {
        relations
            .ingredients
            .entry(row.recipe_id)
            .or_default()
            .push(IngredientId::from_uuid(row.ingredient_id));
    }

    Ok(relations)
}

fn assemble(
    rows: Vec<RecipeRow>,
    mut relations: Relations,
) -> Result<Vec<Recipe>, RecipePersistenceError> {
    rows.into_iter()
        .map(|row| {
            let tags = relations.tags.remove(&row.id).unwrap_or_default();
            let ingredients = relations.ingredients.remove(&row.id).unwrap_or_default();
            row_to_recipe(row, tags, ingredients)
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRecipeRow {
            id: *recipe.id().as_uuid(),
            user_id: *recipe.owner().as_uuid(),
            title: recipe.title().as_ref(),
            time_minutes: minutes_column(recipe),
            price_cents: recipe.price().cents(),
            link: recipe.link().map(AsRef::as_ref),
            image: recipe.image().map(RecipeImagePath::as_str),
        };
        let tags = tag_rows(recipe);
        let ingredients = ingredient_rows(recipe);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                if !tags.is_empty() {
                    diesel::insert_into(recipe_tags::table)
                        .values(&tags)
                        .execute(conn)
                        .await?;
                }
                if !ingredients.is_empty() {
                    diesel::insert_into(recipe_ingredients::table)
                        .values(&ingredients)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *recipe.id().as_uuid();
        let changes = RecipeUpdate {
            title: recipe.title().as_ref(),
            time_minutes: minutes_column(recipe),
            price_cents: recipe.price().cents(),
            link: recipe.link().map(AsRef::as_ref),
            image: recipe.image().map(RecipeImagePath::as_str),
        };
        let tags = tag_rows(recipe);
        let ingredients = ingredient_rows(recipe);

        let updated = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(recipes::table.find(id))
                        .set((&changes, recipes::updated_at.eq(now)))
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(0);
                    }
                    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(
                        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
                    )
                    .execute(conn)
                    .await?;
                    if !tags.is_empty() {
                        diesel::insert_into(recipe_tags::table)
                            .values(&tags)
                            .execute(conn)
                            .await?;
                    }
                    if !ingredients.is_empty() {
                        diesel::insert_into(recipe_ingredients::table)
                            .values(&ingredients)
                            .execute(conn)
                            .await?;
                    }
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(RecipePersistenceError::query("recipe not found for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(recipes::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id.as_uuid();
        let (row, relations) = conn
            .transaction(|conn| {
                async move {
                    let row: Option<RecipeRow> = recipes::table
                        .find(id)
                        .select(RecipeRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let relations = match row {
                        Some(_) => load_relations(conn, &[id]).await?,
                        None => Relations::default(),
                    };
                    Ok((row, relations))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(assemble(row.into_iter().collect(), relations)?.pop())
    }

    async fn list_for_owner(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *owner.as_uuid();
        let tag_ids: Vec<Uuid> = filter.tags.iter().map(|id| *id.as_uuid()).collect();
        let ingredient_ids: Vec<Uuid> = filter
            .ingredients
            .iter()
            .map(|id| *id.as_uuid())
            .collect();

        let (rows, relations) = conn
            .transaction(|conn| {
                async move {
                    let mut query = recipes::table
                        .filter(recipes::user_id.eq(owner))
                        .select(RecipeRow::as_select())
                        .order((recipes::title, recipes::id))
                        .into_boxed();
                    if !tag_ids.is_empty() {
                        query = query.filter(
                            recipes::id.eq_any(
                                recipe_tags::table
                                    .filter(recipe_tags::tag_id.eq_any(tag_ids))
                                    .select(recipe_tags::recipe_id),
                            ),
                        );
                    }
                    if !ingredient_ids.is_empty() {
                        query = query.filter(
                            recipes::id.eq_any(
                                recipe_ingredients::table
                                    .filter(recipe_ingredients::ingredient_id.eq_any(ingredient_ids))
                                    .select(recipe_ingredients::recipe_id),
                            ),
                        );
                    }
                    let rows: Vec<RecipeRow> = query.load(conn).await?;
                    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
                    let relations = load_relations(conn, &ids).await?;
                    Ok((rows, relations))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        assemble(rows, relations)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion and association ordering.
    use super::*;
    use crate::domain::RecipeDraft;
    use rstest::rstest;

    fn row() -> RecipeRow {
        RecipeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Soup".to_owned(),
            time_minutes: 20,
            price_cents: 550,
            link: Some("https://example.com/soup".to_owned()),
            image: Some("uploads/recipe/abc.jpg".to_owned()),
        }
    }

    #[rstest]
    fn rows_rebuild_recipes_with_relations() {
        let raw = row();
        let tag = TagId::random();
        let recipe = row_to_recipe(raw.clone(), vec![tag], Vec::new()).expect("valid row");

        assert_eq!(recipe.id().as_uuid(), &raw.id);
        assert_eq!(recipe.price().cents(), 550);
        assert_eq!(recipe.tags(), [tag].as_slice());
        assert_eq!(
            recipe.image().map(RecipeImagePath::as_str),
            Some("uploads/recipe/abc.jpg")
        );
    }

    #[rstest]
    #[case::negative_minutes(RecipeRow { time_minutes: -1, ..row() }, "time_minutes")]
    #[case::negative_price(RecipeRow { price_cents: -5, ..row() }, "price")]
    #[case::blank_title(RecipeRow { title: " ".to_owned(), ..row() }, "title")]
    #[case::bad_image(RecipeRow { image: Some("elsewhere/x.jpg".to_owned()), ..row() }, "image")]
    fn corrupt_rows_are_query_errors(#[case] raw: RecipeRow, #[case] field: &str) {
        let err = row_to_recipe(raw, Vec::new(), Vec::new()).expect_err("invalid row");
        assert!(matches!(err, RecipePersistenceError::Query { .. }));
        assert!(err.to_string().contains(field));
    }

    #[rstest]
    fn association_rows_keep_attachment_order() {
        let (first, second) = (IngredientId::random(), IngredientId::random());
        let recipe = Recipe::new(
            UserId::random(),
            RecipeDraft {
                title: RecipeTitle::new("Stew").expect("title"),
                time_minutes: CookingTime::new(90).expect("time"),
                price: Price::from_cents(1200).expect("price"),
                link: None,
                tags: Vec::new(),
                ingredients: vec![first, second],
            },
        );

        let rows = ingredient_rows(&recipe);
        let order: Vec<(Uuid, i32)> = rows
            .iter()
            .map(|row| (row.ingredient_id, row.position))
            .collect();
        assert_eq!(order, vec![(*first.as_uuid(), 0), (*second.as_uuid(), 1)]);
        assert!(tag_rows(&recipe).is_empty());
    }
}
