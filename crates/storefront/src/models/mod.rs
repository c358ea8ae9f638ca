//! Storefront models kept in the visitor's session.

pub mod session;

pub use session::{StoredAuth, keys as session_keys};
