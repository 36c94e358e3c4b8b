//! Order record service.
//!
//! Sequences field validation, the remote user existence check and store
//! calls for each order operation. Validation and reference failures are
//! deterministic rejections; nothing is retried automatically.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    OrderOperations, OrderPersistenceError, OrderRepository, UserDirectory,
};
use crate::domain::validation::Violations;
use crate::domain::{Error, Order, OrderDraft};

/// Order service implementing the [`OrderOperations`] driving port.
#[derive(Clone)]
pub struct OrderService<R, D> {
    orders: Arc<R>,
    directory: Arc<D>,
}

impl<R, D> OrderService<R, D> {
    /// Create a new service from a repository and a user directory.
    pub fn new(orders: Arc<R>, directory: Arc<D>) -> Self {
        Self { orders, directory }
    }
}

impl<R, D> OrderService<R, D>
where
    R: OrderRepository,
    D: UserDirectory,
{
    fn map_persistence_error(error: OrderPersistenceError) -> Error {
        match error {
            OrderPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("order store unavailable: {message}"))
            }
            OrderPersistenceError::Query { message } => {
                Error::internal(format!("order store error: {message}"))
            }
        }
    }

    fn map_validation_error(violations: &Violations) -> Error {
        Error::invalid_request(violations.to_string())
            .with_details(json!({ "violations": violations }))
    }

    /// Confirm the owning user exists before accepting a write.
    ///
    /// A definitive "no" rejects the order as an invalid reference; an
    /// unverifiable answer surfaces as a retryable service failure. The two
    /// outcomes are never conflated.
    async fn ensure_user_exists(&self, user_id: i64) -> Result<(), Error> {
        match self.directory.user_exists(user_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::invalid_reference(format!(
                "user {user_id} does not exist"
            ))),
            Err(error) => {
                warn!(user_id, error = %error, "user existence check failed");
                Err(Error::service_unavailable(format!(
                    "could not verify user {user_id}: {error}"
                )))
            }
        }
    }
}

#[async_trait]
impl<R, D> OrderOperations for OrderService<R, D>
where
    R: OrderRepository,
    D: UserDirectory,
{
    async fn list_orders(&self) -> Result<Vec<Order>, Error> {
        self.orders
            .find_all()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn order_by_id(&self, id: i64) -> Result<Order, Error> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, Error> {
        self.orders
            .find_by_user(user_id)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, Error> {
        draft
            .validate()
            .map_err(|violations| Self::map_validation_error(&violations))?;
        self.ensure_user_exists(draft.user_id).await?;

        self.orders
            .insert(&draft)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn update_order(&self, id: i64, draft: OrderDraft) -> Result<Order, Error> {
        let existing = self.order_by_id(id).await?;

        let merged = existing.merged_with(&draft);
        OrderDraft::from(&merged)
            .validate()
            .map_err(|violations| Self::map_validation_error(&violations))?;

        self.orders
            .replace(&merged)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn delete_order(&self, id: i64) -> Result<(), Error> {
        let removed = self
            .orders
            .delete_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("order {id} not found")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;
    use mockall::mock;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::UserDirectoryError;
    use crate::domain::ErrorCode;

    mock! {
        Directory {}

        #[async_trait]
        impl UserDirectory for Directory {
            async fn user_exists(&self, user_id: i64) -> Result<bool, UserDirectoryError>;
        }
    }

    /// Store fake assigning monotonically increasing identifiers.
    struct InMemoryOrders {
        rows: Mutex<Vec<Order>>,
        next_id: AtomicI64,
    }

    impl Default for InMemoryOrders {
        fn default() -> Self {
            Self::seeded(Vec::new())
        }
    }

    impl InMemoryOrders {
        fn seeded(orders: Vec<Order>) -> Self {
            let next = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
            Self {
                rows: Mutex::new(orders),
                next_id: AtomicI64::new(next),
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().expect("rows poisoned").len()
        }
    }

    #[async_trait]
    impl OrderRepository for InMemoryOrders {
        async fn find_all(&self) -> Result<Vec<Order>, OrderPersistenceError> {
            Ok(self.rows.lock().expect("rows poisoned").clone())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Order>, OrderPersistenceError> {
            let rows = self.rows.lock().expect("rows poisoned");
            Ok(rows.iter().find(|o| o.id == id).cloned())
        }

        async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPersistenceError> {
            let rows = self.rows.lock().expect("rows poisoned");
            Ok(rows.iter().filter(|o| o.user_id == user_id).cloned().collect())
        }

        async fn insert(&self, draft: &OrderDraft) -> Result<Order, OrderPersistenceError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let order = Order {
                id,
                user_id: draft.user_id,
                item_description: draft.item_description.clone(),
                item_quantity: draft.item_quantity,
                item_price: draft.item_price,
                total_value: draft.total_value,
                created_at: Utc::now(),
                updated_at: None,
            };
            self.rows.lock().expect("rows poisoned").push(order.clone());
            Ok(order)
        }

        async fn replace(&self, order: &Order) -> Result<Order, OrderPersistenceError> {
            let mut rows = self.rows.lock().expect("rows poisoned");
            let slot = rows
                .iter_mut()
                .find(|o| o.id == order.id)
                .ok_or_else(|| OrderPersistenceError::query("row vanished"))?;
            let mut replaced = order.clone();
            replaced.updated_at = Some(Utc::now());
            *slot = replaced.clone();
            Ok(replaced)
        }

        async fn delete_by_id(&self, id: i64) -> Result<bool, OrderPersistenceError> {
            let mut rows = self.rows.lock().expect("rows poisoned");
            let before = rows.len();
            rows.retain(|o| o.id != id);
            Ok(rows.len() < before)
        }
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            user_id: 42,
            item_description: "Widget".to_owned(),
            item_quantity: 3,
            item_price: 9.99,
            total_value: 29.97,
        }
    }

    fn stored_order() -> Order {
        Order {
            id: 7,
            user_id: 42,
            item_description: "Widget".to_owned(),
            item_quantity: 1,
            item_price: 9.99,
            total_value: 9.99,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(
        repo: Arc<InMemoryOrders>,
        directory: MockDirectory,
    ) -> OrderService<InMemoryOrders, MockDirectory> {
        OrderService::new(repo, Arc::new(directory))
    }

    #[tokio::test]
    async fn create_persists_and_returns_assigned_identity() {
        let repo = Arc::new(InMemoryOrders::default());
        let mut directory = MockDirectory::new();
        directory.expect_user_exists().return_const(Ok(true));

        let created = service(Arc::clone(&repo), directory)
            .create_order(draft())
            .await
            .expect("order should be created");

        assert!(created.id >= 1);
        assert!(created.updated_at.is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn successive_creates_assign_distinct_identifiers() {
        let repo = Arc::new(InMemoryOrders::default());
        let mut directory = MockDirectory::new();
        directory.expect_user_exists().return_const(Ok(true));
        let service = service(Arc::clone(&repo), directory);

        let first = service.create_order(draft()).await.expect("first create");
        let second = service.create_order(draft()).await.expect("second create");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_before_the_directory_is_consulted() {
        let repo = Arc::new(InMemoryOrders::default());
        let mut directory = MockDirectory::new();
        directory.expect_user_exists().never();

        let err = service(Arc::clone(&repo), directory)
            .create_order(OrderDraft::default())
            .await
            .expect_err("empty draft should fail");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn create_with_unknown_user_is_an_invalid_reference_and_persists_nothing() {
        let repo = Arc::new(InMemoryOrders::default());
        let mut directory = MockDirectory::new();
        directory.expect_user_exists().return_const(Ok(false));

        let err = service(Arc::clone(&repo), directory)
            .create_order(draft())
            .await
            .expect_err("unknown user should fail");

        assert_eq!(err.code(), ErrorCode::InvalidReference);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn create_surfaces_directory_failure_as_service_unavailable() {
        let repo = Arc::new(InMemoryOrders::default());
        let mut directory = MockDirectory::new();
        directory
            .expect_user_exists()
            .return_const(Err(UserDirectoryError::timeout("deadline elapsed")));

        let err = service(Arc::clone(&repo), directory)
            .create_order(draft())
            .await
            .expect_err("unverifiable user should fail");

        // A failed check is retryable, never reported as a bad reference.
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn update_merges_revalidates_and_replaces() {
        let repo = Arc::new(InMemoryOrders::seeded(vec![stored_order()]));
        let directory = MockDirectory::new();

        let updated = service(Arc::clone(&repo), directory)
            .update_order(
                7,
                OrderDraft {
                    item_quantity: 5,
                    ..OrderDraft::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.item_quantity, 5);
        assert_eq!(updated.item_description, "Widget");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_of_missing_order_is_not_found() {
        let repo = Arc::new(InMemoryOrders::default());
        let err = service(repo, MockDirectory::new())
            .update_order(99, draft())
            .await
            .expect_err("missing order should fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(7, true)]
    #[case(99, false)]
    #[tokio::test]
    async fn delete_reports_not_found_for_missing_identifiers(
        #[case] id: i64,
        #[case] expect_success: bool,
    ) {
        let repo = Arc::new(InMemoryOrders::seeded(vec![stored_order()]));
        let result = service(Arc::clone(&repo), MockDirectory::new())
            .delete_order(id)
            .await;

        if expect_success {
            result.expect("delete should succeed");
            assert_eq!(repo.len(), 0);
        } else {
            let err = result.expect_err("missing order should fail");
            assert_eq!(err.code(), ErrorCode::NotFound);
            assert_eq!(repo.len(), 1);
        }
    }

    #[tokio::test]
    async fn reads_filter_by_owner_and_miss_cleanly() {
        let mut other = stored_order();
        other.id = 8;
        other.user_id = 77;
        let repo = Arc::new(InMemoryOrders::seeded(vec![stored_order(), other]));
        let svc = service(repo, MockDirectory::new());

        assert_eq!(svc.list_orders().await.expect("list").len(), 2);
        assert_eq!(svc.orders_for_user(77).await.expect("filter").len(), 1);
        assert_eq!(svc.order_by_id(7).await.expect("get").id, 7);
        let err = svc.order_by_id(99).await.expect_err("missing order");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
