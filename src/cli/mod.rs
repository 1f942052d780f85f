//! # CLI Module
//!
//! This module provides the command-line interface layer for splcli, a
//! Spotify API client for managing playlists and their tracks. It implements
//! all user-facing commands and coordinates between the credential layer,
//! the API client and user interaction.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Runs the OAuth 2.0 authorization-code flow through the
//!   local callback server and persists the resulting credential.
//!
//! ### Playlist Operations
//!
//! - [`list_playlists`] - Lists the user's playlists with optional search
//!   filtering.
//! - [`list_tracks`] - Lists the tracks of a playlist identified by
//!   canonical URI or name substring.
//! - [`add_tracks`] - Adds track URIs to a playlist in provider-sized
//!   batches.
//! - [`replace_tracks`] - Replaces a playlist's tracks in one call and
//!   prints the new snapshot id.
//!
//! ## Data Flow
//!
//! Every command first obtains a valid credential through
//! [`crate::management::CredentialManager`] - running the interactive flow
//! or a silent refresh when needed - then performs resource calls through a
//! [`SpotifyClient`] constructed from that credential. Long-running fetches
//! show an indicatif spinner; listings are rendered as tables.
//!
//! ## Error Handling Philosophy
//!
//! Commands are the outermost layer and translate [`crate::error`] values
//! into terminal messages: unrecoverable failures exit through the
//! `error!` macro, partial failures (e.g. a batch stopping mid-way) are
//! reported with enough context for the user to know what was committed.

mod auth;
mod playlists;
mod tracks;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth;
pub use playlists::list_playlists;
pub use tracks::add_tracks;
pub use tracks::list_tracks;
pub use tracks::replace_tracks;

use crate::{
    error,
    management::{CredentialManager, FileCredentialStore},
    spotify::SpotifyClient,
    types::AuthConfig,
};

/// Obtains a valid credential and builds the authenticated API client
/// every resource command starts from.
pub(crate) async fn authenticated_client() -> SpotifyClient {
    let config = AuthConfig::from_env();
    let store = FileCredentialStore::new();

    let manager = match CredentialManager::obtain(store, &config).await {
        Ok(manager) => manager,
        Err(e) => error!("Failed to obtain Spotify credentials: {}", e),
    };

    match SpotifyClient::from_config(manager.access_token()) {
        Ok(client) => client,
        Err(e) => error!("Failed to construct API client: {}", e),
    }
}

pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
