//! PostgreSQL-backed `OrderRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{OrderPersistenceError, OrderRepository};
use crate::domain::{Order, OrderDraft};

use super::models::{NewOrderRow, OrderChangeset, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain order persistence errors.
fn map_pool_error(error: PoolError) -> OrderPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            OrderPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors to domain order persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> OrderPersistenceError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            OrderPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => OrderPersistenceError::query("record not found"),
        _ => OrderPersistenceError::query("database error"),
    }
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn find_all(&self) -> Result<Vec<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrderRow> = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Order::from))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn insert(&self, draft: &OrderDraft) -> Result<Order, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewOrderRow {
            user_id: draft.user_id,
            item_description: &draft.item_description,
            item_quantity: draft.item_quantity,
            item_price: draft.item_price,
            total_value: draft.total_value,
        };

        let row: OrderRow = diesel::insert_into(orders::table)
            .values(&new_row)
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Order::from(row))
    }

    async fn replace(&self, order: &Order) -> Result<Order, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = OrderChangeset {
            user_id: order.user_id,
            item_description: &order.item_description,
            item_quantity: order.item_quantity,
            item_price: order.item_price,
            total_value: order.total_value,
            updated_at: Utc::now(),
        };

        let row: OrderRow = diesel::update(orders::table.find(order.id))
            .set(&changeset)
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Order::from(row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, OrderPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(orders::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}
