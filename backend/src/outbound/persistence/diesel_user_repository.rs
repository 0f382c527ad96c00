//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The unique index on `users.email` is the source of truth for duplicate
//! detection; a violation surfaces as `DuplicateEmail` rather than a generic
//! query failure.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, EntityId, User, UserId, UserRecord};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> User {
    User::from_record(UserRecord {
        id: UserId::from_uuid(row.id),
        email: row.email,
        name: row.name,
        password_hash: row.password_hash,
        is_active: row.is_active,
        is_staff: row.is_staff,
        is_superuser: row.is_superuser,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let record = user.to_record();
        let row = NewUserRow {
            id: *record.id.as_uuid(),
            email: &record.email,
            name: &record.name,
            password_hash: &record.password_hash,
            is_active: record.is_active,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error) {
                    UserPersistenceError::duplicate_email(record.email.as_str())
                } else {
                    map_diesel_error(error)
                }
            })
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let record = user.to_record();
        let changes = UserUpdate {
            name: &record.name,
            password_hash: &record.password_hash,
            is_active: record.is_active,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
        };

        let updated = diesel::update(users::table.find(record.id.as_uuid()))
            .set((&changes, users::updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.to_string()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_user))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use crate::domain::Password;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn rows_rebuild_users_with_their_flags() {
        let password = Password::new("pw").expect("password");
        let hash = User::create(Some("a@example.com"), &password, Default::default())
            .expect("user")
            .to_record()
            .password_hash;
        let id = Uuid::new_v4();

        let user = row_to_user(UserRow {
            id,
            email: "a@example.com".to_owned(),
            name: "Ann".to_owned(),
            password_hash: hash,
            is_active: true,
            is_staff: true,
            is_superuser: false,
        });

        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.name().as_ref(), "Ann");
        assert!(user.is_staff());
        assert!(user.check_password("pw"));
    }
}
