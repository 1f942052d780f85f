use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::sync::oneshot;

use crate::{error::SpotifyError, utils};

/// The persisted authorization state.
///
/// If `access_token` is present and not expired it is authoritative and no
/// network call is needed. If the record is absent a full authorization-code
/// flow must run; if it is expired a refresh flow must run, which requires
/// `refresh_token` to be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: Vec<String>,
    /// Absolute expiry as Unix seconds.
    pub expires_at: i64,
}

impl Credential {
    /// Builds a credential from a token-endpoint response, converting the
    /// relative `expires_in` into an absolute expiry.
    pub fn from_token_response(token: TokenResponse, now: i64) -> Self {
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            scope: token
                .scope
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
            expires_at: now + token.expires_in,
        }
    }

    /// Whether the access token expires within `margin` seconds of `now`.
    pub fn is_expired(&self, now: i64, margin: i64) -> bool {
        self.expires_at - margin <= now
    }
}

/// Wire shape of a 2xx response from the token endpoint. `refresh_token`
/// is optional on refresh responses; the stored one is retained when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: i64,
}

/// Ephemeral state for one authorization-code round trip.
///
/// Created immediately before the operator is redirected to the consent
/// page, consumed exactly once when the callback arrives, and discarded
/// with the listener regardless of outcome.
#[derive(Debug, Clone)]
pub struct PendingAuthSession {
    /// Random, unguessable CSRF token correlating the callback with the
    /// request that initiated it.
    pub state: String,
    pub redirect_uri: String,
}

impl PendingAuthSession {
    pub fn new(redirect_uri: String) -> Self {
        PendingAuthSession {
            state: utils::generate_state_token(),
            redirect_uri,
        }
    }
}

/// OAuth endpoints and client settings consumed by the credential layer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: Vec<String>,
    /// Bind address of the local callback listener, e.g. `127.0.0.1:8080`.
    pub server_addr: String,
}

impl AuthConfig {
    /// Reads the configuration from the environment. Panics on missing
    /// variables, matching the rest of the config surface.
    pub fn from_env() -> Self {
        AuthConfig {
            client_id: crate::config::spotify_client_id(),
            client_secret: crate::config::spotify_client_secret(),
            auth_url: crate::config::spotify_apiauth_url(),
            token_url: crate::config::spotify_apitoken_url(),
            scope: crate::config::spotify_scope()
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
            server_addr: crate::config::server_addr(),
        }
    }

    /// The `/callback` URL the provider redirects back to.
    pub fn redirect_uri(&self) -> String {
        format!("http://{}/callback", self.server_addr)
    }

    /// The local URL the operator visits to start the flow.
    pub fn local_auth_uri(&self) -> String {
        format!("http://{}/auth", self.server_addr)
    }
}

/// Shared state between the authorization flow and the callback handlers.
///
/// `outcome` is written exactly once by the `/callback` handler; the flow
/// polls it and triggers `shutdown` on every exit path so the listener
/// never outlives a single authorization attempt.
pub struct AuthFlow {
    pub config: AuthConfig,
    pub session: PendingAuthSession,
    pub outcome: Option<Result<Credential, SpotifyError>>,
    pub shutdown: Option<oneshot::Sender<()>>,
}

/// One cursor page of a paginated listing. `next` is a self-contained URL
/// and must be followed without re-parameterization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

/// A playlist entry as returned by the playlist-tracks endpoint: the track
/// itself plus who submitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    #[serde(default)]
    pub added_by: Option<UserRef>,
    pub track: Track,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

/// The tracks of a playlist, either already fetched or still pending a
/// paginated fetch. Laziness is explicit: a `Deferred` source only hits
/// the network when `resolve` is called on it.
#[derive(Debug, Clone)]
pub enum TrackSource {
    Materialized(Vec<TrackItem>),
    Deferred { playlist_id: String },
}

/// Request body for one chunk of a batched track insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub uri: String,
    pub added_by: String,
}
