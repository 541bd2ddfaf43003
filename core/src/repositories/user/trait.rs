//! User lookup consumed by the token services.
//!
//! The account store belongs to the surrounding system. The token lifecycle
//! only needs to resolve a user ID to its current record, to re-derive claims
//! on refresh and to resolve a consumed reset token to an account.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read-only access to user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this ID
    /// * `Err(DomainError)` - Backend failure
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        (**self).find_by_id(id).await
    }
}
