//! PhotoArt Core - Domain types and pure storefront logic.
//!
//! This crate holds everything the storefront computes without touching the
//! network: the photo catalog, print options and pricing, the session cart,
//! and the checkout wizard.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session handling. The `storefront` crate stores these values in
//! the visitor's session and renders them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and form errors
//! - [`catalog`] - Photos and collections
//! - [`print`] - Print options, customization pricing, and preview styling
//! - [`cart`] - The session cart and its totals
//! - [`checkout`] - Checkout wizard, payment, shipping, contact, and orders
//! - [`account`] - Signed-in user, order history, and profile forms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod print;
pub mod types;

pub use account::{OrderHistoryEntry, OrderStatus, User};
pub use cart::{Cart, CartItem, CartTotals};
pub use catalog::{Catalog, Collection, Photo};
pub use print::{PreviewStyle, PrintCustomization, PrintSelection, Quantity};
pub use types::*;
