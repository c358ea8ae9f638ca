//! PhotoArt storefront library.
//!
//! The binary in `main.rs` only wires up tracing, Sentry, and the listener;
//! everything else lives here so integration tests can drive the router
//! directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
