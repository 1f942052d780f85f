use std::time::Duration;

use reqwest::{
    Client, RequestBuilder,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::SpotifyError,
    types::{AddTracksRequest, Page, Playlist, SnapshotResponse, TrackItem, TrackSource},
    utils,
};

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// Page size for track listings, which paginate by offset.
pub const TRACKS_PAGE_LIMIT: u64 = 100;

/// Spotify accepts at most this many track URIs per add-tracks call.
pub const MAX_TRACKS_PER_CALL: usize = 100;

/// Explicit request timeout for resource calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the Spotify Web API resource endpoints.
///
/// Owns an HTTP session with the bearer token attached as a default header;
/// no other component configures headers or authentication. Listing
/// operations transparently follow pagination cursors, mutation operations
/// transparently split oversized payloads into provider-accepted chunks,
/// and every non-2xx response is translated into [`SpotifyError::Api`].
///
/// The client never re-reads or rotates credentials during its lifetime;
/// a long-running process that outlives the access token must construct a
/// fresh client through a new [`crate::management::CredentialManager`].
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    /// Builds a client from a bearer token and the API base URL.
    ///
    /// The base URL is injectable so tests can point the client at a local
    /// mock server; production callers use [`SpotifyClient::from_config`].
    pub fn new(access_token: &str, api_url: impl Into<String>) -> Result<Self, SpotifyError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
            SpotifyError::Authorization("access token is not a valid header value".to_string())
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(SpotifyClient {
            http,
            api_url: api_url.into(),
        })
    }

    /// Builds a client against the configured `SPOTIFY_API_URL`.
    pub fn from_config(access_token: &str) -> Result<Self, SpotifyError> {
        Self::new(access_token, crate::config::spotify_apiurl())
    }

    /// Paginates through a cursor-paginated listing starting at `url`.
    ///
    /// Issues GET `url` with `params` (falling back to `limit=50` when no
    /// params are given), appends each page's `items`, and follows the
    /// server-provided `next` URL verbatim until it is absent. The cursor
    /// URL is self-contained and is never re-parameterized.
    ///
    /// Pages are fetched strictly sequentially; provider cursors are
    /// stateful on the server side and not safely parallelizable. A non-2xx
    /// response on any page fails the whole call with no partial results.
    pub async fn paginate<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, SpotifyError> {
        let request = if params.is_empty() {
            self.http
                .get(url)
                .query(&[("limit", DEFAULT_PAGE_LIMIT.to_string())])
        } else {
            self.http.get(url).query(params)
        };

        let mut items = Vec::new();
        let mut page: Page<T> = self.execute(request).await?;

        loop {
            items.extend(page.items);
            match page.next {
                Some(next) => page = self.execute(self.http.get(&next)).await?,
                None => break,
            }
        }

        Ok(items)
    }

    /// Resolves a playlist identifier to its id.
    ///
    /// A canonical `spotify:playlist:<id>` URI is resolved by pure string
    /// extraction with zero network calls. Anything else is treated as a
    /// name fragment: the user's playlists are listed and the first whose
    /// name contains the identifier as a substring wins (case-sensitive,
    /// listing order). No match is [`SpotifyError::NotFound`].
    pub async fn resolve_playlist_id(&self, identifier: &str) -> Result<String, SpotifyError> {
        if utils::is_playlist_uri(identifier) {
            return utils::id_from_uri(identifier)
                .map(str::to_owned)
                .ok_or_else(|| SpotifyError::NotFound(identifier.to_string()));
        }

        self.all_playlists()
            .await?
            .into_iter()
            .find(|p| p.name.contains(identifier))
            .map(|p| p.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SpotifyError::NotFound(identifier.to_string()))
    }

    /// All playlists of the current user, in server order.
    pub async fn all_playlists(&self) -> Result<Vec<Playlist>, SpotifyError> {
        let url = format!("{}/me/playlists", self.api_url);
        self.paginate(&url, &[]).await
    }

    /// All tracks of a playlist, in server order.
    pub async fn all_tracks(&self, playlist_id: &str) -> Result<Vec<TrackItem>, SpotifyError> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        let params = [
            ("offset", "0".to_string()),
            ("limit", TRACKS_PAGE_LIMIT.to_string()),
        ];
        self.paginate(&url, &params).await
    }

    /// Adds tracks to a playlist, splitting the payload into chunks of
    /// [`MAX_TRACKS_PER_CALL`] URIs issued strictly in order.
    ///
    /// The first failing chunk stops the batch: already committed chunks
    /// are not rolled back (the provider offers no compensating
    /// transaction) and later chunks are never attempted. The returned
    /// [`SpotifyError::Batch`] tells the caller how many chunks were
    /// committed before the failure.
    pub async fn add_tracks(&self, uris: &[String], playlist_id: &str) -> Result<(), SpotifyError> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        let total = uris.len().div_ceil(MAX_TRACKS_PER_CALL);

        for (committed, chunk) in uris.chunks(MAX_TRACKS_PER_CALL).enumerate() {
            let body = AddTracksRequest {
                uris: chunk.to_vec(),
            };
            if let Err(source) = self
                .execute::<SnapshotResponse>(self.http.post(&url).json(&body))
                .await
            {
                return Err(SpotifyError::Batch {
                    committed,
                    total,
                    source: Box::new(source),
                });
            }
        }

        Ok(())
    }

    /// Replaces the tracks of a playlist with a single PUT.
    ///
    /// `data` is passed through as the request body (typically `uris`
    /// and/or a snapshot-guarded reorder payload) and the provider's
    /// response is returned verbatim so callers can pick up the new
    /// snapshot id.
    pub async fn replace_tracks(
        &self,
        playlist_id: &str,
        data: &Value,
    ) -> Result<Value, SpotifyError> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        self.execute(self.http.put(&url).json(data)).await
    }

    /// Resolves a [`TrackSource`], fetching deferred tracks on demand.
    pub async fn resolve_tracks(
        &self,
        source: TrackSource,
    ) -> Result<Vec<TrackItem>, SpotifyError> {
        match source {
            TrackSource::Materialized(items) => Ok(items),
            TrackSource::Deferred { playlist_id } => self.all_tracks(&playlist_id).await,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SpotifyError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyError::from_response(response).await);
        }
        Ok(response.json::<T>().await?)
    }
}
