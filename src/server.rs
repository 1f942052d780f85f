use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::{Mutex, oneshot};

use crate::{api, error::SpotifyError, types::AuthFlow};

/// Runs the local callback listener for one authorization attempt.
///
/// Serves `/auth`, `/callback` and `/health` until the shutdown signal
/// fires, which the callback handler triggers after exactly one callback.
/// Bind and serve failures are surfaced to the flow instead of panicking,
/// so the port is always released on the error path too.
pub async fn start_callback_server(
    addr: &str,
    state: Arc<Mutex<AuthFlow>>,
    shutdown: oneshot::Receiver<()>,
) -> Result<(), SpotifyError> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route(
            "/auth",
            get(api::authorize).layer(Extension(Arc::clone(&state))),
        )
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = SocketAddr::from_str(addr).map_err(|e| {
        SpotifyError::Authorization(format!("invalid callback listener address: {e}"))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        SpotifyError::Authorization(format!("failed to bind callback listener on {addr}: {e}"))
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
        .map_err(|e| SpotifyError::Authorization(format!("callback listener failed: {e}")))
}
