//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches infrastructure (the record
//! store, the remote user directory); driving ports describe the operations
//! inbound adapters may invoke. Each driven port exposes strongly typed
//! errors so adapters map their failures into predictable variants instead
//! of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::{Error, Order, OrderDraft, User, UserDraft};

/// Errors surfaced by order persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderPersistenceError {
    /// Connection to the store could not be established.
    #[error("order repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("order repository query failed: {message}")]
    Query { message: String },
}

impl OrderPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by user persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Connection to the store could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The store's unique constraint rejected a duplicate national id.
    ///
    /// This is the last line of defence when concurrent creates race past
    /// the service's check-then-insert.
    #[error("national id {national_id} is already registered")]
    DuplicateNationalId { national_id: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-constraint violations on the national id.
    pub fn duplicate_national_id(national_id: impl Into<String>) -> Self {
        Self::DuplicateNationalId {
            national_id: national_id.into(),
        }
    }
}

/// Errors surfaced by the remote user directory adapter.
///
/// A definitive "user does not exist" answer is `Ok(false)` on the port, not
/// an error; these variants all mean "could not verify right now" and map to
/// a retryable service failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDirectoryError {
    /// The lookup exceeded the bounded wait.
    #[error("user directory lookup timed out: {message}")]
    Timeout { message: String },
    /// Transport-level failure reaching the directory.
    #[error("user directory transport failed: {message}")]
    Transport { message: String },
    /// The directory answered with a status that is neither 200 nor 404.
    #[error("user directory returned unexpected status {status}")]
    UnexpectedStatus { status: u16 },
    /// The 200 response body could not be decoded.
    #[error("user directory response could not be decoded: {message}")]
    Decode { message: String },
}

impl UserDirectoryError {
    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Persistence port for order records.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch every stored order.
    async fn find_all(&self) -> Result<Vec<Order>, OrderPersistenceError>;

    /// Fetch one order by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderPersistenceError>;

    /// Fetch every order owned by the given user.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPersistenceError>;

    /// Insert a validated draft, returning the stored record with its
    /// server-assigned identifier and creation timestamp.
    async fn insert(&self, draft: &OrderDraft) -> Result<Order, OrderPersistenceError>;

    /// Replace a stored record in full, refreshing its update timestamp.
    async fn replace(&self, order: &Order) -> Result<Order, OrderPersistenceError>;

    /// Delete by identifier. Returns whether a record was actually removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, OrderPersistenceError>;
}

/// Persistence port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch every stored user.
    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch one user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch one user by canonical national id.
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a validated draft whose `national_id` is already canonical.
    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Replace a stored record in full, refreshing its update timestamp.
    async fn replace(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Delete by identifier. Returns whether a record was actually removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, UserPersistenceError>;
}

/// Remote authority answering "does this user exist?" with a bounded wait.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user id against the remote directory.
    ///
    /// `Ok(false)` is a definitive negative; errors mean the answer is
    /// currently unknowable and callers must not treat them as "false".
    async fn user_exists(&self, user_id: i64) -> Result<bool, UserDirectoryError>;
}

/// Driving port for order operations, implemented by the order service.
#[async_trait]
pub trait OrderOperations: Send + Sync {
    /// List every order.
    async fn list_orders(&self) -> Result<Vec<Order>, Error>;

    /// Fetch one order by identifier.
    async fn order_by_id(&self, id: i64) -> Result<Order, Error>;

    /// List the orders owned by a user.
    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, Error>;

    /// Validate and persist a new order.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, Error>;

    /// Merge a partial draft into a stored order and persist the result.
    async fn update_order(&self, id: i64, draft: OrderDraft) -> Result<Order, Error>;

    /// Delete an order by identifier.
    async fn delete_order(&self, id: i64) -> Result<(), Error>;
}

/// Driving port for user operations, implemented by the user service.
#[async_trait]
pub trait UserOperations: Send + Sync {
    /// List every user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// Fetch one user by identifier.
    async fn user_by_id(&self, id: i64) -> Result<User, Error>;

    /// Validate, canonicalize and persist a new user.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Merge a partial draft into a stored user and persist the result.
    async fn update_user(&self, id: i64, draft: UserDraft) -> Result<User, Error>;

    /// Delete a user by identifier.
    async fn delete_user(&self, id: i64) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_constructors_render_messages() {
        assert_eq!(
            UserPersistenceError::duplicate_national_id("52998224725").to_string(),
            "national id 52998224725 is already registered"
        );
        assert_eq!(
            OrderPersistenceError::connection("pool exhausted").to_string(),
            "order repository connection failed: pool exhausted"
        );
        assert_eq!(
            UserPersistenceError::query("syntax error").to_string(),
            "user repository query failed: syntax error"
        );
    }

    #[test]
    fn directory_errors_name_their_cause() {
        let error = UserDirectoryError::UnexpectedStatus { status: 500 };
        assert_eq!(error.to_string(), "user directory returned unexpected status 500");
        assert_eq!(
            UserDirectoryError::timeout("deadline elapsed").to_string(),
            "user directory lookup timed out: deadline elapsed"
        );
    }
}
