//! Locale negotiation middleware and translation lookup for server-rendered
//! pages.
//!
//! The crate has three layers: an immutable [`config::Config`] loaded once
//! at startup, the [`i18n`] module (resolver, axum middleware, translation
//! catalog), and the [`server`] module that wires them into a router.

pub mod config;
pub mod i18n;
pub mod server;
