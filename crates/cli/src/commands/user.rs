//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! bookstore-cli user create --id 1 --name "Ada" --email ada@example.com --role Admin
//! ```

use bookstore_core::{User, UserType};
use bookstore_storefront::db::PgGateway;
use bookstore_storefront::services::{AccountDraft, IdentityService};

use super::{CommandError, connect};

/// Create a user directly, as the account form would.
///
/// # Errors
///
/// Returns `CommandError::InvalidRole` for an unknown role, or the service
/// error (`DuplicateUserId`, `MissingField`, ...) if the account is rejected.
pub async fn create(id: i32, name: &str, email: &str, role: &str) -> Result<User, CommandError> {
    let role: UserType = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let gateway = PgGateway::new(connect().await?);
    let draft = AccountDraft {
        name: Some(name.to_owned()),
        email: Some(email.to_owned()),
        id: Some(id.to_string()),
    };
    let user = IdentityService::new(&gateway)
        .create_account(role, &draft)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Name: {}, Role: {}",
        user.id,
        user.username,
        user.user_type
    );
    Ok(user)
}
