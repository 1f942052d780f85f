use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{error::SpotifyError, spotify, types::AuthFlow, warning};

/// Handles the provider redirect that completes one authorization attempt.
///
/// Validates the CSRF `state` token against the pending session, maps an
/// `error` parameter to an authorization failure, and exchanges a `code`
/// for a credential. Whatever the outcome, it is written into the shared
/// flow state exactly once and the listener shutdown is triggered.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthFlow>>>,
) -> Html<&'static str> {
    let mut flow = shared_state.lock().await;

    if flow.outcome.is_some() {
        return Html("<h4>Authorization already completed. Close this window.</h4>");
    }

    let page = if let Some(error) = params.get("error") {
        flow.outcome = Some(Err(SpotifyError::Authorization(error.clone())));
        Html("<h4>Authorization was denied.</h4>")
    } else if params.get("state") != Some(&flow.session.state) {
        flow.outcome = Some(Err(SpotifyError::Authorization(
            "state parameter mismatch".to_string(),
        )));
        Html("<h4>State mismatch. Authorization aborted.</h4>")
    } else if let Some(code) = params.get("code") {
        let redirect_uri = flow.session.redirect_uri.clone();
        match spotify::auth::exchange_code(&flow.config, code, &redirect_uri).await {
            Ok(credential) => {
                flow.outcome = Some(Ok(credential));
                Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
            }
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                flow.outcome = Some(Err(e));
                Html("<h4>Login failed.</h4>")
            }
        }
    } else {
        flow.outcome = Some(Err(SpotifyError::Authorization(
            "callback carried neither code nor error".to_string(),
        )));
        Html("<h4>Missing authorization code.</h4>")
    };

    // One callback per flow: tear the listener down either way.
    if let Some(tx) = flow.shutdown.take() {
        let _ = tx.send(());
    }

    page
}
