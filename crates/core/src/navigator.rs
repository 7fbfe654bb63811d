//! Session navigator.
//!
//! A session is always in exactly one [`SessionState`]. Transitions go
//! through [`SessionState::transition`], which takes the current state by
//! reference and returns a fresh value, so a failed transition leaves the
//! caller's state untouched.
//!
//! ```text
//! Unauthenticated --SelectRole--> RoleSelected --LoginSucceeded--> Authenticated(home)
//!        ^                          |  ^                               |
//!        |                          |  +--StartAccountCreation         +--Navigate(target)
//!        +----------------------Logout (from any state)----------------+--ProfileSaved
//! ```
//!
//! Renderers that still think in terms of per-screen booleans read the
//! [`ViewFlags`] projection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::{Capability, policy};
use crate::types::{UserId, UserType};

/// Sub-mode of the book management view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookMode {
    Browse,
    Add,
    Delete,
}

/// The single active screen of an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "name", content = "mode", rename_all = "snake_case")]
pub enum View {
    EditProfile,
    Search,
    ManageOrders,
    Reviews,
    ManageBooks(BookMode),
}

/// A navigation request from the sidebar or the book management buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Home,
    EditProfile,
    ManageOrders,
    Reviews,
    AddBooks,
    DeleteBooks,
}

/// Identity of the logged-in user as held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub role: UserType,
    pub display_name: String,
}

/// Navigation state of one interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unauthenticated,
    RoleSelected {
        role: UserType,
        creating_account: bool,
    },
    Authenticated {
        user: SessionUser,
        view: View,
    },
}

/// Events that move a session between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectRole(UserType),
    StartAccountCreation,
    /// Identity check passed for the selected role.
    LoginSucceeded {
        user_id: UserId,
        display_name: String,
    },
    Navigate(Target),
    ProfileSaved {
        display_name: String,
    },
    Logout,
}

/// Reasons a transition is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("already logged in")]
    AlreadyAuthenticated,
    #[error("select Customer or Admin first")]
    RoleNotSelected,
    #[error("{role} accounts cannot open {target:?}")]
    ViewNotAllowed { role: UserType, target: Target },
}

impl SessionState {
    /// Compute the state that follows `action`.
    ///
    /// # Errors
    ///
    /// Returns a `NavigationError` when `action` is not valid from this state;
    /// `self` is never modified.
    pub fn transition(&self, action: Action) -> Result<Self, NavigationError> {
        match (self, action) {
            (_, Action::Logout) => Ok(Self::Unauthenticated),

            (
                Self::Authenticated { .. },
                Action::SelectRole(_) | Action::StartAccountCreation | Action::LoginSucceeded { .. },
            ) => Err(NavigationError::AlreadyAuthenticated),

            (_, Action::SelectRole(role)) => Ok(Self::RoleSelected {
                role,
                creating_account: false,
            }),

            (Self::RoleSelected { role, .. }, Action::StartAccountCreation) => {
                Ok(Self::RoleSelected {
                    role: *role,
                    creating_account: true,
                })
            }

            (
                Self::RoleSelected { role, .. },
                Action::LoginSucceeded {
                    user_id,
                    display_name,
                },
            ) => Ok(Self::Authenticated {
                user: SessionUser {
                    id: user_id,
                    role: *role,
                    display_name,
                },
                view: policy(*role).home,
            }),

            (Self::Unauthenticated, Action::StartAccountCreation | Action::LoginSucceeded { .. }) => {
                Err(NavigationError::RoleNotSelected)
            }

            (Self::Authenticated { user, .. }, Action::Navigate(target)) => {
                let entry = policy(user.role);
                if !entry.allows(target) {
                    return Err(NavigationError::ViewNotAllowed {
                        role: user.role,
                        target,
                    });
                }
                Ok(Self::Authenticated {
                    user: user.clone(),
                    view: entry.resolve(target),
                })
            }

            (Self::Authenticated { user, .. }, Action::ProfileSaved { display_name }) => {
                Ok(Self::Authenticated {
                    user: SessionUser {
                        display_name,
                        ..user.clone()
                    },
                    view: policy(user.role).home,
                })
            }

            (_, Action::Navigate(_) | Action::ProfileSaved { .. }) => {
                Err(NavigationError::NotAuthenticated)
            }
        }
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The role picked on the landing screen or held by the logged-in user.
    #[must_use]
    pub const fn role(&self) -> Option<UserType> {
        match self {
            Self::Unauthenticated => None,
            Self::RoleSelected { role, .. } => Some(*role),
            Self::Authenticated { user, .. } => Some(user.role),
        }
    }

    /// Project the state onto the per-screen flags.
    #[must_use]
    pub fn flags(&self) -> ViewFlags {
        match self {
            Self::Unauthenticated => ViewFlags::default(),
            Self::RoleSelected {
                role,
                creating_account,
            } => ViewFlags {
                user_type: Some(*role),
                creating_account: *creating_account,
                ..ViewFlags::default()
            },
            Self::Authenticated { user, view } => {
                let mut flags = ViewFlags {
                    authenticated: true,
                    user_type: Some(user.role),
                    ..ViewFlags::default()
                };
                match view {
                    View::EditProfile => flags.edit_mode = true,
                    View::Search => {
                        flags.search = true;
                        flags.order = policy(user.role).can(Capability::PlaceOrders);
                    }
                    View::ManageOrders => flags.viewing_orders = true,
                    View::Reviews => flags.reviews = true,
                    View::ManageBooks(mode) => {
                        flags.manage_books = true;
                        flags.add_mode = *mode == BookMode::Add;
                        flags.delete_mode = *mode == BookMode::Delete;
                    }
                }
                flags
            }
        }
    }
}

/// Flat per-screen flags derived from a [`SessionState`].
///
/// `order` is a sub-flag of `search`, and `add_mode`/`delete_mode` are
/// sub-flags of `manage_books`; see [`ViewFlags::active_views`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ViewFlags {
    pub authenticated: bool,
    pub user_type: Option<UserType>,
    pub creating_account: bool,
    pub edit_mode: bool,
    pub search: bool,
    pub order: bool,
    pub manage_books: bool,
    pub viewing_orders: bool,
    pub reviews: bool,
    pub add_mode: bool,
    pub delete_mode: bool,
}

impl ViewFlags {
    /// Number of top-level views switched on. Zero or one for any reachable state.
    #[must_use]
    pub fn active_views(&self) -> usize {
        [
            self.edit_mode,
            self.search || self.order,
            self.manage_books,
            self.viewing_orders,
            self.reviews,
        ]
        .into_iter()
        .filter(|on| *on)
        .count()
    }

    /// Whether sub-flags only appear under their parent view and never together.
    #[must_use]
    pub const fn sub_modes_consistent(&self) -> bool {
        let modes_ok = !(self.add_mode && self.delete_mode)
            && (self.manage_books || !(self.add_mode || self.delete_mode));
        let order_ok = self.search || !self.order;
        modes_ok && order_ok
    }
}
