//! Identity service: login, account creation and profile edits.
//!
//! There are no passwords. A user proves nothing beyond knowing an existing
//! `(UserID, role)` pair.

use serde::Deserialize;

use bookstore_core::{User, UserId, UserType};

use super::{ServiceError, required};
use crate::db::{Gateway, RepositoryError};

/// Raw account form input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Desired user ID as typed; must parse as an integer.
    pub id: Option<String>,
}

/// Identity operations for one request.
pub struct IdentityService<'a> {
    gateway: &'a dyn Gateway,
}

impl<'a> IdentityService<'a> {
    #[must_use]
    pub const fn new(gateway: &'a dyn Gateway) -> Self {
        Self { gateway }
    }

    /// Log in as `role` with the user ID typed on the login form.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidCredentials` if `raw_id` is not numeric or
    /// no user has exactly this ID and role.
    pub async fn authenticate(&self, raw_id: &str, role: UserType) -> Result<User, ServiceError> {
        let id = raw_id
            .parse::<UserId>()
            .map_err(|_| ServiceError::InvalidCredentials)?;

        let user = self
            .gateway
            .find_user(id, role)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        tracing::info!(user_id = %user.id, role = %role, "User authenticated");
        Ok(user)
    }

    /// Create a `role` account.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::MissingField` if name, email or ID is blank.
    /// Returns `ServiceError::InvalidId` if the ID is not an integer.
    /// Returns `ServiceError::DuplicateUserId` if any user already holds the ID.
    pub async fn create_account(
        &self,
        role: UserType,
        draft: &AccountDraft,
    ) -> Result<User, ServiceError> {
        let username = required(draft.name.as_deref(), "name")?;
        let email = required(draft.email.as_deref(), "email")?;
        let raw_id = required(draft.id.as_deref(), "id")?;
        let id = raw_id.parse::<UserId>().map_err(|_| ServiceError::InvalidId)?;

        if self.gateway.user_exists(id).await? {
            return Err(ServiceError::DuplicateUserId);
        }

        let user = User {
            id,
            username,
            email,
            user_type: role,
        };
        self.gateway
            .insert_user(&user)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ServiceError::DuplicateUserId,
                other => ServiceError::StorageUnavailable(other),
            })?;

        tracing::info!(user_id = %user.id, role = %role, "Account created");
        Ok(user)
    }

    /// The stored record of the `(id, role)` user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::UserNotFound` if the user no longer exists.
    pub async fn profile(&self, id: UserId, role: UserType) -> Result<User, ServiceError> {
        self.gateway
            .find_user(id, role)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Overwrite name and email of the `(id, role)` user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::UserNotFound` if no user matched.
    pub async fn update_profile(
        &self,
        id: UserId,
        role: UserType,
        name: &str,
        email: &str,
    ) -> Result<(), ServiceError> {
        if !self
            .gateway
            .update_user_profile(id, role, name, email)
            .await?
        {
            return Err(ServiceError::UserNotFound);
        }

        tracing::info!(user_id = %id, "Profile updated");
        Ok(())
    }
}
