//! User record service.
//!
//! Sequences field validation, national id canonicalization, the uniqueness
//! check and store calls for each user operation. The canonical identifier
//! is threaded explicitly into the record before persisting; no state
//! crosses call boundaries.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{UserOperations, UserPersistenceError, UserRepository};
use crate::domain::validation::Violations;
use crate::domain::{Error, User, UserDraft};

/// User service implementing the [`UserOperations`] driving port.
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a new service from a user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            // Lost the check-then-insert race; the store's unique constraint
            // already rejected the duplicate.
            UserPersistenceError::DuplicateNationalId { national_id } => {
                Self::national_id_conflict(&national_id)
            }
        }
    }

    fn map_validation_error(violations: &Violations) -> Error {
        Error::invalid_request(violations.to_string())
            .with_details(json!({ "violations": violations }))
    }

    fn national_id_conflict(national_id: &str) -> Error {
        Error::conflict("national id already registered")
            .with_details(json!({ "national_id": national_id }))
    }

    /// Validate a draft and return it with the national id canonicalized.
    fn validated_canonical(draft: &UserDraft) -> Result<UserDraft, Error> {
        draft
            .validate()
            .map_err(|violations| Self::map_validation_error(&violations))?;
        let canonical = draft
            .canonical_national_id()
            .ok_or_else(|| Error::internal("validated national id failed to canonicalize"))?;
        let mut canonical_draft = draft.clone();
        canonical_draft.national_id = canonical.into();
        Ok(canonical_draft)
    }

    /// Reject when a different record already holds the canonical id.
    async fn ensure_national_id_free(
        &self,
        national_id: &str,
        own_id: Option<i64>,
    ) -> Result<(), Error> {
        let holder = self
            .users
            .find_by_national_id(national_id)
            .await
            .map_err(Self::map_persistence_error)?;
        match holder {
            Some(existing) if Some(existing.id) != own_id => {
                Err(Self::national_id_conflict(national_id))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> UserOperations for UserService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users
            .find_all()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn user_by_id(&self, id: i64) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let canonical_draft = Self::validated_canonical(&draft)?;
        self.ensure_national_id_free(&canonical_draft.national_id, None)
            .await?;

        self.users
            .insert(&canonical_draft)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn update_user(&self, id: i64, draft: UserDraft) -> Result<User, Error> {
        let existing = self.user_by_id(id).await?;

        let merged = existing.merged_with(&draft);
        let canonical_draft = Self::validated_canonical(&UserDraft::from(&merged))?;
        if canonical_draft.national_id != existing.national_id {
            self.ensure_national_id_free(&canonical_draft.national_id, Some(id))
                .await?;
        }

        let mut replacement = merged;
        replacement.national_id = canonical_draft.national_id;
        self.users
            .replace(&replacement)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let removed = self
            .users
            .delete_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {id} not found")))
        }
    }
}
