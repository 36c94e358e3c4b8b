//! Diesel-backed persistence adapters for orders and users.

pub mod diesel_order_repository;
pub mod diesel_user_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
