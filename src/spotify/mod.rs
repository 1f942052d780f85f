//! # Spotify Integration Module
//!
//! This module is the integration layer between splcli and the Spotify Web
//! API. It handles the OAuth 2.0 authorization-code flow against the
//! accounts service and all authenticated resource calls against the Web
//! API, hiding pagination and batching from higher-level code.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorize URL, code exchange, refresh)
//!     └── Resource Client (playlists, tracks, batched writes)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! [`auth`] implements the server-to-server half of the authorization-code
//! flow: consent-page URL construction, code-for-token exchange and token
//! refresh, both authenticated with HTTP Basic credentials built from the
//! configured client id and secret. The interactive half (the local
//! callback listener) lives in [`crate::server`] and [`crate::api`]; the
//! state machine driving it lives in [`crate::management`].
//!
//! [`client`] implements [`SpotifyClient`], the authenticated resource
//! client. It owns an HTTP session with the bearer token as a default
//! header and exposes:
//!
//! - cursor pagination that follows server-provided `next` URLs
//!   sequentially until exhaustion;
//! - playlist identifier resolution by canonical URI or name substring;
//! - batched track inserts chunked at the provider's per-call limit, with
//!   first-failure semantics that report how much was committed;
//! - snapshot-guarded track replacement.
//!
//! ## Error Handling
//!
//! No function in this module retries or backs off internally. Every
//! failure is surfaced as a [`crate::error::SpotifyError`] with full
//! context (operation, HTTP status, provider body) so the caller can
//! distinguish client errors from retryable server errors and decide on
//! policy itself.
//!
//! ## API Coverage
//!
//! - `POST {token_url}` - code exchange and token refresh
//! - `GET /me/playlists` - the user's playlists, paginated
//! - `GET /playlists/{id}/tracks` - playlist tracks, paginated
//! - `POST /playlists/{id}/tracks` - batched track insert
//! - `PUT /playlists/{id}/tracks` - snapshot-guarded replace

pub mod auth;
pub mod client;

pub use client::SpotifyClient;
