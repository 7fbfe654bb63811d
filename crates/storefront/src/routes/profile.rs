//! Profile route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use bookstore_core::{Action, User};

use super::{Envelope, JsonBody};
use crate::error::Result;
use crate::middleware::Navigator;
use crate::state::AppState;

/// Profile form data. Both fields overwrite the stored values as given.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

/// GET /profile
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out.
pub async fn show(
    State(state): State<AppState>,
    navigator: Navigator,
) -> Result<Json<Envelope<User>>> {
    let user = navigator.require_user()?;
    let profile = state.identity().profile(user.id, user.role).await?;
    Ok(Json(Envelope::new(profile, &navigator)))
}

/// PUT /profile
///
/// Saves the profile and returns to the role's home view.
///
/// # Errors
///
/// Returns `NotAuthenticated` when logged out and `UserNotFound` when the
/// account no longer exists.
pub async fn update(
    State(state): State<AppState>,
    mut navigator: Navigator,
    JsonBody(form): JsonBody<ProfileForm>,
) -> Result<Json<Envelope<User>>> {
    let (id, role) = {
        let user = navigator.require_user()?;
        (user.id, user.role)
    };

    let identity = state.identity();
    identity
        .update_profile(id, role, &form.name, &form.email)
        .await?;
    navigator
        .apply(Action::ProfileSaved {
            display_name: form.name,
        })
        .await?;

    let profile = identity.profile(id, role).await?;
    Ok(Json(
        Envelope::new(profile, &navigator).with_message("Profile updated successfully!"),
    ))
}
