//! Bookstore Core - Shared types and session navigation logic.
//!
//! This crate provides the pieces every bookstore component agrees on:
//! - `storefront` - HTTP surface, services and persistence gateway
//! - `cli` - Migrations, seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The session navigator is a reducer over immutable state
//! values, so it can be exercised exhaustively without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, ratings, roles and statuses
//! - [`records`] - The four persisted record shapes (users, books, orders, reviews)
//! - [`policy`] - Role policy table (home view, allowed views, capabilities)
//! - [`navigator`] - Session state machine and its flag projection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod navigator;
pub mod policy;
pub mod records;
pub mod types;

pub use navigator::{Action, BookMode, NavigationError, SessionState, SessionUser, Target, View, ViewFlags};
pub use policy::{Capability, Policy, policy};
pub use records::{Book, NewBook, Order, Review, SearchField, User};
pub use types::*;
