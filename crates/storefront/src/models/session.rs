//! Session-related types.
//!
//! The navigator state is the only value stored in the session; everything
//! else a client sees is derived from it.

use serde::Serialize;

use bookstore_core::{Capability, SessionState, SessionUser, View, ViewFlags, policy};

/// Session keys for stored data.
pub mod session_keys {
    /// Key for the serialized [`SessionState`](bookstore_core::SessionState).
    pub const NAVIGATOR: &str = "navigator";
}

/// What a client needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub flags: ViewFlags,
    pub user: Option<SessionUser>,
    pub view: Option<View>,
    /// Capabilities of the logged-in role; empty when logged out.
    pub capabilities: &'static [Capability],
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        let (user, view) = match state {
            SessionState::Authenticated { user, view } => (Some(user.clone()), Some(*view)),
            SessionState::Unauthenticated | SessionState::RoleSelected { .. } => (None, None),
        };
        let capabilities = user
            .as_ref()
            .map_or(&[][..], |u| policy(u.role).capabilities);

        Self {
            flags: state.flags(),
            user,
            view,
            capabilities,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstore_core::{Action, UserId, UserType};

    use super::*;

    #[test]
    fn test_logged_out_snapshot_is_empty() {
        let snapshot = SessionSnapshot::from(&SessionState::default());
        assert!(snapshot.user.is_none());
        assert!(snapshot.capabilities.is_empty());
        assert!(!snapshot.flags.authenticated);
    }

    #[test]
    fn test_customer_snapshot_lands_on_search() {
        let state = SessionState::default()
            .transition(Action::SelectRole(UserType::Customer))
            .unwrap()
            .transition(Action::LoginSucceeded {
                user_id: UserId::new(42),
                display_name: "Kim".to_owned(),
            })
            .unwrap();

        let snapshot = SessionSnapshot::from(&state);
        assert_eq!(snapshot.view, Some(View::Search));
        assert!(snapshot.capabilities.contains(&Capability::PlaceOrders));
        assert!(snapshot.flags.search && snapshot.flags.order);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let state = SessionState::default()
            .transition(Action::SelectRole(UserType::Admin))
            .unwrap()
            .transition(Action::LoginSucceeded {
                user_id: UserId::new(7),
                display_name: "A".to_owned(),
            })
            .unwrap();

        let value = serde_json::to_value(SessionSnapshot::from(&state)).unwrap();
        assert_eq!(value["view"]["name"], "manage_books");
        assert_eq!(value["view"]["mode"], "browse");
        assert_eq!(value["flags"]["manage_books"], true);
        assert_eq!(value["user"]["display_name"], "A");
        assert!(
            value["capabilities"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("manage_books"))
        );
    }
}
