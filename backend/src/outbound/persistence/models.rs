//! Row types bridging Diesel and the domain entities.
//!
//! Insert structs omit `id` and the timestamp columns so the database
//! assigns them; `created_at` defaults to `now()` and `updated_at` stays
//! null until the first update.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Order, User};

use super::schema::{orders, users};

/// A persisted order row.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub item_description: String,
    pub item_quantity: i32,
    pub item_price: f64,
    pub total_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            item_description: row.item_description,
            item_quantity: row.item_quantity,
            item_price: row.item_price,
            total_value: row.total_value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable order values for new records.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub user_id: i64,
    pub item_description: &'a str,
    pub item_quantity: i32,
    pub item_price: f64,
    pub total_value: f64,
}

/// Column values written when replacing a stored order.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset<'a> {
    pub user_id: i64,
    pub item_description: &'a str,
    pub item_quantity: i32,
    pub item_price: f64,
    pub total_value: f64,
    pub updated_at: DateTime<Utc>,
}

/// A persisted user row.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            email: row.email,
            phone_number: row.phone_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable user values for new records.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub national_id: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
}

/// Column values written when replacing a stored user.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset<'a> {
    pub name: &'a str,
    pub national_id: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub updated_at: DateTime<Utc>,
}
