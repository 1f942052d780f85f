use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    error::SpotifyError,
    types::{AuthConfig, Credential, PendingAuthSession, TokenResponse},
};

/// Explicit timeout for token-endpoint calls rather than inheriting the
/// transport default.
const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the provider consent-page URL the local `/auth` endpoint
/// redirects to.
///
/// Carries the client id, `response_type=code`, the callback URL the
/// session was issued against, the session's CSRF `state` token, and the
/// requested scopes space-joined.
pub fn build_authorize_url(
    config: &AuthConfig,
    session: &PendingAuthSession,
) -> Result<String, SpotifyError> {
    let scope = config.scope.join(" ");
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", session.redirect_uri.as_str()),
            ("state", session.state.as_str()),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| SpotifyError::Authorization(format!("invalid authorize url: {e}")))?;

    Ok(url.into())
}

/// Exchanges an authorization code for a credential.
///
/// Server-to-server POST with grant type `authorization_code`, the code and
/// the redirect URI it was issued against, authenticated with HTTP Basic
/// credentials built from `client_id:client_secret`.
///
/// A non-2xx response is surfaced as [`SpotifyError::Authorization`]
/// carrying the provider's error body. The authorization code is single-use
/// and short-lived, so the exchange happens immediately after the callback.
pub async fn exchange_code(
    config: &AuthConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<Credential, SpotifyError> {
    token_request(
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ],
    )
    .await
}

/// Refreshes an expired access token using a stored refresh token.
///
/// Same endpoint and Basic-auth header as the code exchange, grant type
/// `refresh_token`. The response may omit `refresh_token`; the caller is
/// responsible for retaining the previously stored one in that case.
pub async fn refresh(config: &AuthConfig, refresh_token: &str) -> Result<Credential, SpotifyError> {
    token_request(
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn token_request(
    config: &AuthConfig,
    form: &[(&str, &str)],
) -> Result<Credential, SpotifyError> {
    let client = Client::builder().timeout(TOKEN_TIMEOUT).build()?;

    let response = client
        .post(&config.token_url)
        .header(AUTHORIZATION, basic_auth_header(config))
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SpotifyError::Authorization(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(Credential::from_token_response(token, Utc::now().timestamp()))
}

fn basic_auth_header(config: &AuthConfig) -> String {
    let login = format!("{}:{}", config.client_id, config.client_secret);
    format!("Basic {}", STANDARD.encode(login))
}
