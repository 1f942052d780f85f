use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use tokio::sync::{Mutex, oneshot};

use crate::{
    error::SpotifyError,
    info,
    management::CredentialStore,
    server, spotify,
    types::{AuthConfig, AuthFlow, Credential, PendingAuthSession},
    warning,
};

/// Refresh the access token when it expires within this many seconds,
/// so a token expiring right after the check cannot fail mid-call.
const REFRESH_MARGIN_SECS: i64 = 60;

/// How long the flow waits for the operator to complete the consent page.
const AUTH_FLOW_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The credential lifecycle state machine.
///
/// Construction via [`CredentialManager::obtain`] leaves the manager holding
/// a valid, non-expired credential, running whatever network or interactive
/// steps were necessary:
///
/// - no stored record: the full authorization-code flow runs through the
///   local callback listener;
/// - stored but expired: a single refresh call runs, which requires a
///   stored refresh token;
/// - stored and valid: zero network calls.
///
/// Every successful flow persists the record through the injected store
/// before `obtain` returns. Failures are fatal to the caller; this
/// component never retries on its own.
pub struct CredentialManager<S> {
    store: S,
    credential: Credential,
}

impl<S: CredentialStore> CredentialManager<S> {
    pub async fn obtain(store: S, config: &AuthConfig) -> Result<Self, SpotifyError> {
        let now = Utc::now().timestamp();

        let credential = match store.load().await? {
            // A missing record and a record that never obtained an access
            // token both require the full interactive flow.
            None => {
                let credential = run_authorization_flow(config).await?;
                store.save(&credential).await?;
                credential
            }
            Some(stored) if stored.access_token.is_empty() => {
                let credential = run_authorization_flow(config).await?;
                store.save(&credential).await?;
                credential
            }
            Some(stored) if stored.is_expired(now, REFRESH_MARGIN_SECS) => {
                let refresh_token = stored
                    .refresh_token
                    .clone()
                    .ok_or(SpotifyError::Credential)?;
                let mut fresh = spotify::auth::refresh(config, &refresh_token).await?;
                // Rotate only if the provider returned a new refresh token.
                if fresh.refresh_token.is_none() {
                    fresh.refresh_token = stored.refresh_token;
                }
                store.save(&fresh).await?;
                fresh
            }
            Some(stored) => stored,
        };

        Ok(CredentialManager { store, credential })
    }

    pub fn access_token(&self) -> &str {
        &self.credential.access_token
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Runs one authorization-code round trip through the local listener.
///
/// The listener is a scoped resource: it is bound when the flow starts,
/// handles exactly one callback, and is shut down on every exit path,
/// including timeout and exchange failure.
async fn run_authorization_flow(config: &AuthConfig) -> Result<Credential, SpotifyError> {
    let session = PendingAuthSession::new(config.redirect_uri());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let flow = Arc::new(Mutex::new(AuthFlow {
        config: config.clone(),
        session,
        outcome: None,
        shutdown: Some(shutdown_tx),
    }));

    let server_state = Arc::clone(&flow);
    let server_addr = config.server_addr.clone();
    let server = tokio::spawn(async move {
        server::start_callback_server(&server_addr, server_state, shutdown_rx).await
    });

    let auth_uri = config.local_auth_uri();
    info!("Visit {} and complete the authorization flow", auth_uri);
    if webbrowser::open(&auth_uri).is_err() {
        warning!("Failed to open browser. Please navigate to the URL manually.");
    }

    let mut outcome = None;
    let start = Instant::now();
    while start.elapsed() < AUTH_FLOW_TIMEOUT {
        {
            let mut lock = flow.lock().await;
            if lock.outcome.is_some() {
                outcome = lock.outcome.take();
                break;
            }
        }
        if server.is_finished() {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    // Tear the listener down regardless of how the wait ended.
    {
        let mut lock = flow.lock().await;
        if let Some(tx) = lock.shutdown.take() {
            let _ = tx.send(());
        }
        if outcome.is_none() {
            outcome = lock.outcome.take();
        }
    }

    if server.is_finished() {
        // A listener that died early (e.g. the port was taken) is the real
        // failure; surface it instead of a timeout.
        if let Ok(Err(e)) = server.await {
            if outcome.is_none() {
                return Err(e);
            }
        }
    } else {
        let abort = server.abort_handle();
        if tokio::time::timeout(SHUTDOWN_GRACE, server).await.is_err() {
            abort.abort();
        }
    }

    // A callback that lands right at the timeout boundary completes during
    // the graceful drain above; its outcome still counts.
    if outcome.is_none() {
        outcome = flow.lock().await.outcome.take();
    }

    outcome.unwrap_or_else(|| {
        Err(SpotifyError::Authorization(
            "timed out waiting for the authorization callback".to_string(),
        ))
    })
}
