//! Session navigator route handlers.
//!
//! Role selection, login, account creation, navigation and logout. Each
//! handler applies one navigator action and returns the new snapshot.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use bookstore_core::{Action, NavigationError, SessionState, Target, User, UserType};

use super::{Envelope, JsonBody};
use crate::error::Result;
use crate::middleware::Navigator;
use crate::models::SessionSnapshot;
use crate::services::AccountDraft;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// A user ID as typed into a form: JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: UserType,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: RawId,
}

/// Account creation form data.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub id: Option<RawId>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub target: Target,
}

/// The role chosen before logging in or creating an account.
fn selected_role(navigator: &Navigator) -> Result<UserType> {
    match navigator.state() {
        SessionState::RoleSelected { role, .. } => Ok(*role),
        SessionState::Unauthenticated => Err(NavigationError::RoleNotSelected.into()),
        SessionState::Authenticated { .. } => Err(NavigationError::AlreadyAuthenticated.into()),
    }
}

async fn log_in(navigator: &mut Navigator, user: User) -> Result<()> {
    navigator
        .apply(Action::LoginSucceeded {
            user_id: user.id,
            display_name: user.username,
        })
        .await
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /session
pub async fn show(navigator: Navigator) -> Json<SessionSnapshot> {
    Json(navigator.snapshot())
}

/// POST /session/role
///
/// # Errors
///
/// Returns `AlreadyAuthenticated` when a user is logged in.
pub async fn select_role(
    mut navigator: Navigator,
    JsonBody(request): JsonBody<RoleRequest>,
) -> Result<Json<SessionSnapshot>> {
    navigator.apply(Action::SelectRole(request.role)).await?;
    Ok(Json(navigator.snapshot()))
}

/// POST /session/login
///
/// # Errors
///
/// Returns `RoleNotSelected` before a role is chosen and `InvalidCredentials`
/// when no user has this ID and role.
pub async fn login(
    State(state): State<AppState>,
    mut navigator: Navigator,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<SessionSnapshot>> {
    let role = selected_role(&navigator)?;
    let user = state
        .identity()
        .authenticate(&request.user_id.into_text(), role)
        .await?;

    log_in(&mut navigator, user).await?;
    Ok(Json(navigator.snapshot()))
}

/// POST /session/account/start
///
/// # Errors
///
/// Returns `RoleNotSelected` before a role is chosen.
pub async fn start_account(mut navigator: Navigator) -> Result<Json<SessionSnapshot>> {
    navigator.apply(Action::StartAccountCreation).await?;
    Ok(Json(navigator.snapshot()))
}

/// POST /session/account
///
/// Creates the account for the selected role and logs straight in.
///
/// # Errors
///
/// Returns `MissingField`, `InvalidId` or `DuplicateUserId` for bad input.
pub async fn create_account(
    State(state): State<AppState>,
    mut navigator: Navigator,
    JsonBody(request): JsonBody<AccountRequest>,
) -> Result<(StatusCode, Json<Envelope<User>>)> {
    let role = selected_role(&navigator)?;
    let draft = AccountDraft {
        name: request.name,
        email: request.email,
        id: request.id.map(RawId::into_text),
    };
    let user = state.identity().create_account(role, &draft).await?;

    log_in(&mut navigator, user.clone()).await?;
    let body = Envelope::new(user, &navigator)
        .with_message(format!("{role} account created successfully!"));
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /session/navigate
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out and `ViewNotAllowed` for
/// targets outside the role's policy.
pub async fn navigate(
    mut navigator: Navigator,
    JsonBody(request): JsonBody<NavigateRequest>,
) -> Result<Json<SessionSnapshot>> {
    navigator.apply(Action::Navigate(request.target)).await?;
    Ok(Json(navigator.snapshot()))
}

/// POST /session/logout
///
/// # Errors
///
/// Returns a session error if the session cannot be cleared.
pub async fn logout(mut navigator: Navigator) -> Result<Json<SessionSnapshot>> {
    navigator.apply(Action::Logout).await?;
    Ok(Json(navigator.snapshot()))
}
