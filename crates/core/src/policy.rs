//! Role policy table.
//!
//! One static entry per [`UserType`] decides the home view, the navigation
//! targets a role may enter, and what the role may do. The navigator and the
//! HTTP layer both read this table instead of branching on the role.

use serde::Serialize;

use crate::navigator::{BookMode, Target, View};
use crate::types::UserType;

/// Something a role is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List and search the catalog.
    BrowseCatalog,
    /// Order books from the catalog.
    PlaceOrders,
    /// Submit reviews.
    WriteReviews,
    /// Read everyone's reviews.
    ReadReviews,
    /// Add and delete books.
    ManageBooks,
    /// See every user's orders rather than only one's own.
    ViewAllOrders,
}

/// Per-role policy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Policy {
    pub role: UserType,
    /// View entered on login and on the `Home` target.
    pub home: View,
    /// Navigation targets this role may request.
    pub targets: &'static [Target],
    pub capabilities: &'static [Capability],
}

const CUSTOMER: Policy = Policy {
    role: UserType::Customer,
    home: View::Search,
    targets: &[
        Target::Home,
        Target::EditProfile,
        Target::ManageOrders,
        Target::Reviews,
    ],
    capabilities: &[
        Capability::BrowseCatalog,
        Capability::PlaceOrders,
        Capability::WriteReviews,
        Capability::ReadReviews,
    ],
};

const ADMIN: Policy = Policy {
    role: UserType::Admin,
    home: View::ManageBooks(BookMode::Browse),
    targets: &[
        Target::Home,
        Target::EditProfile,
        Target::ManageOrders,
        Target::Reviews,
        Target::AddBooks,
        Target::DeleteBooks,
    ],
    capabilities: &[
        Capability::ReadReviews,
        Capability::ManageBooks,
        Capability::ViewAllOrders,
    ],
};

/// Look up the policy for `role`.
#[must_use]
pub const fn policy(role: UserType) -> &'static Policy {
    match role {
        UserType::Customer => &CUSTOMER,
        UserType::Admin => &ADMIN,
    }
}

impl Policy {
    /// Whether this role may navigate to `target`.
    #[must_use]
    pub fn allows(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    /// Whether this role holds `capability`.
    #[must_use]
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// The view a permitted `target` lands on for this role.
    #[must_use]
    pub const fn resolve(&self, target: Target) -> View {
        match target {
            Target::Home => self.home,
            Target::EditProfile => View::EditProfile,
            Target::ManageOrders => View::ManageOrders,
            Target::Reviews => View::Reviews,
            Target::AddBooks => View::ManageBooks(BookMode::Add),
            Target::DeleteBooks => View::ManageBooks(BookMode::Delete),
        }
    }
}
