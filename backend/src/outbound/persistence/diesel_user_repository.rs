//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Unique-violation errors on `users.national_id` are mapped to
//! `UserPersistenceError::DuplicateNationalId` so the user service can turn
//! a lost create race into a conflict instead of an opaque query failure.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserDraft};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
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

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user persistence errors.
///
/// `national_id` identifies the record being written so unique violations
/// can name the conflicting value.
fn map_diesel_error(error: diesel::result::Error, national_id: &str) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_national_id(national_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Map Diesel errors from read paths, where no national id is in play.
fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(error, "")
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        Ok(row.map(User::from))
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::national_id.eq(national_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            name: &draft.name,
            national_id: &draft.national_id,
            email: &draft.email,
            phone_number: &draft.phone_number,
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &draft.national_id))?;

        Ok(User::from(row))
    }

    async fn replace(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            name: &user.name,
            national_id: &user.national_id,
            email: &user.email,
            phone_number: &user.phone_number,
            updated_at: Utc::now(),
        };

        let row: UserRow = diesel::update(users::table.find(user.id))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &user.national_id))?;

        Ok(User::from(row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok(removed > 0)
    }
}
