use std::sync::Arc;

use axum::{
    Extension,
    http::{StatusCode, header::LOCATION},
    response::{Html, IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::{spotify, types::AuthFlow};

/// Redirects the operator's browser to the provider consent page.
///
/// Answers with a plain 302 so the user agent replays the hop as a GET.
/// A consent URL that cannot be built fails the flow immediately and tears
/// the listener down instead of idling until the flow timeout.
pub async fn authorize(Extension(shared_state): Extension<Arc<Mutex<AuthFlow>>>) -> Response {
    let mut flow = shared_state.lock().await;

    match spotify::auth::build_authorize_url(&flow.config, &flow.session) {
        Ok(url) => (StatusCode::FOUND, [(LOCATION, url)]).into_response(),
        Err(e) => {
            let page = Html(format!("<h4>Failed to build authorize URL: {e}</h4>"));
            flow.outcome = Some(Err(e));
            if let Some(tx) = flow.shutdown.take() {
                let _ = tx.send(());
            }
            page.into_response()
        }
    }
}
