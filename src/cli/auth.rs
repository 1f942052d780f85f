use crate::{
    error,
    management::{CredentialManager, FileCredentialStore},
    success,
    types::AuthConfig,
};

/// Runs the interactive authorization flow and persists the credential.
///
/// When a valid credential already exists on disk this is a no-op apart
/// from the confirmation message; an expired one triggers a silent refresh
/// instead of the full browser round trip.
pub async fn auth() {
    let config = AuthConfig::from_env();
    let store = FileCredentialStore::new();

    match CredentialManager::obtain(store, &config).await {
        Ok(manager) => {
            let scopes = manager.credential().scope.join(" ");
            success!("Authentication successful! Granted scopes: {}", scopes);
        }
        Err(e) => error!("Authentication failed: {}", e),
    }
}
