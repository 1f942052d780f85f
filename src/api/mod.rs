//! # API Module
//!
//! This module provides the HTTP endpoints of the short-lived local server
//! that backs the OAuth 2.0 authorization-code flow, plus a health check.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`authorize`] - Entry point the operator visits locally; issues a 302
//!   redirect to Spotify's consent page carrying the client id, redirect
//!   URI, CSRF `state` token and requested scopes.
//! - [`callback`] - Receives the provider redirect with either a `code` or
//!   an `error` parameter, validates the `state` token, performs the token
//!   exchange, and shuts the listener down. Exactly one callback is
//!   consumed per flow invocation.
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status and version information.
//!
//! ## Architecture
//!
//! The module is built using the [Axum](https://docs.rs/axum) web framework.
//! Both auth endpoints share an [`crate::types::AuthFlow`] record through an
//! `Extension` layer; the flow driver in [`crate::management`] polls it for
//! the outcome.
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Listener lifecycle (bind, serve, graceful shutdown)
//! - [`crate::spotify`] - Token exchange against the provider

mod auth;
mod callback;
mod health;

pub use auth::authorize;
pub use callback::callback;
pub use health::health;
