//! Request and response models for storefront.

pub mod session;

pub use session::{SessionSnapshot, session_keys};
