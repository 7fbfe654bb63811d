//! Role and status enums.
//!
//! Both enums travel as their variant names (`"Customer"`, `"Admin"`,
//! `"Processing"`), which is also how they are persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a stored or submitted value names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownVariant {
    #[error("unknown user type: {0}")]
    UserType(String),
    #[error("unknown order status: {0}")]
    OrderStatus(String),
}

/// Account role, fixed at account creation.
///
/// Gates which views and capabilities are reachable (see [`crate::policy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Customer,
    Admin,
}

impl UserType {
    /// Both roles, in the order the role picker offers them.
    pub const ALL: [Self; 2] = [Self::Customer, Self::Admin];

    /// The persisted/wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Self::Customer),
            "Admin" => Ok(Self::Admin),
            _ => Err(UnknownVariant::UserType(s.to_owned())),
        }
    }
}

/// Order lifecycle status.
///
/// Orders are created as `Processing` and no operation moves them on;
/// fulfilment states are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
}

impl OrderStatus {
    /// The persisted/wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "Processing",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            _ => Err(UnknownVariant::OrderStatus(s.to_owned())),
        }
    }
}
