//! Session navigator extractor.
//!
//! Every handler that reads or changes navigation state takes a
//! [`Navigator`]. It loads the [`SessionState`] stored in the session,
//! applies actions through the pure reducer and writes the result back.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{Session, session};

use bookstore_core::{Action, Capability, NavigationError, SessionState, SessionUser, policy};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::models::{SessionSnapshot, session_keys};

/// The current session's navigation state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(navigator: Navigator) -> Result<Json<SessionSnapshot>, AppError> {
///     let user = navigator.require(Capability::PlaceOrders)?;
///     Ok(Json(navigator.snapshot()))
/// }
/// ```
pub struct Navigator {
    session: Session,
    state: SessionState,
}

impl<S> FromRequestParts<S> for Navigator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;

        let state = load_state(&session).await?;
        Ok(Self { session, state })
    }
}

/// Read the stored state, starting over when it can no longer be decoded
/// (for example one written by an older build).
async fn load_state(session: &Session) -> Result<SessionState, AppError> {
    match session.get::<SessionState>(session_keys::NAVIGATOR).await {
        Ok(state) => Ok(state.unwrap_or_default()),
        Err(session::Error::SerdeJson(e)) => {
            tracing::warn!(error = %e, "Discarding unreadable navigator state");
            let state = SessionState::default();
            session.insert(session_keys::NAVIGATOR, &state).await?;
            Ok(state)
        }
        Err(e) => Err(e.into()),
    }
}

impl Navigator {
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.state)
    }

    /// Apply `action` and persist the resulting state.
    ///
    /// On error the stored state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Navigation` if the transition is refused, or
    /// `AppError::Session` if the new state cannot be stored.
    pub async fn apply(&mut self, action: Action) -> Result<(), AppError> {
        let login = matches!(action, Action::LoginSucceeded { .. });
        let logout = matches!(action, Action::Logout);
        let next = self.state.transition(action)?;

        if logout {
            // Drop the whole record so a stale cookie maps to nothing.
            self.session.flush().await?;
            clear_sentry_user();
        } else {
            if login {
                // New ID on privilege change (session fixation).
                self.session.cycle_id().await?;
            }
            self.session.insert(session_keys::NAVIGATOR, &next).await?;
        }

        if let SessionState::Authenticated { user, view } = &next {
            if login {
                set_sentry_user(&user.id, Some(&user.display_name));
            }
            tracing::debug!(user_id = %user.id, view = ?view, "Session navigated");
        }

        self.state = next;
        Ok(())
    }

    /// The logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NotAuthenticated` when logged out.
    pub fn require_user(&self) -> Result<&SessionUser, AppError> {
        self.state
            .user()
            .ok_or(AppError::Navigation(NavigationError::NotAuthenticated))
    }

    /// The logged-in user, provided their role holds `capability`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NotAuthenticated` when logged out, or
    /// `AppError::Forbidden` when the role lacks `capability`.
    pub fn require(&self, capability: Capability) -> Result<&SessionUser, AppError> {
        let user = self.require_user()?;
        if !policy(user.role).can(capability) {
            return Err(AppError::Forbidden(capability));
        }
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tower_sessions::MemoryStore;

    use super::*;

    fn empty_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_missing_state_is_unauthenticated() {
        let session = empty_session();
        assert_eq!(load_state(&session).await.unwrap(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_unreadable_state_is_replaced() {
        let session = empty_session();
        session
            .insert_value(session_keys::NAVIGATOR, json!({ "state": "time_travelling" }))
            .await
            .unwrap();

        assert_eq!(load_state(&session).await.unwrap(), SessionState::Unauthenticated);
        // Overwritten, so the next request reads it cleanly.
        let stored = session
            .get::<SessionState>(session_keys::NAVIGATOR)
            .await
            .unwrap();
        assert_eq!(stored, Some(SessionState::Unauthenticated));
    }
}
