use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{error::SpotifyError, types::Credential};

/// Durable storage for the single credential record.
///
/// Injected into [`crate::management::CredentialManager`] so the auth state
/// machine never touches hidden global file state and tests can swap in an
/// in-memory store.
#[allow(async_fn_in_trait)]
pub trait CredentialStore {
    async fn load(&self) -> Result<Option<Credential>, SpotifyError>;
    async fn save(&self, credential: &Credential) -> Result<(), SpotifyError>;
}

/// JSON file in the platform data directory, written atomically via a
/// temp-file-then-rename so a crash mid-write never leaves a record
/// claiming success with stale data.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("splcli/cache/credential.json");
        FileCredentialStore { path }
    }

    pub fn with_path(path: PathBuf) -> Self {
        FileCredentialStore { path }
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, SpotifyError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SpotifyError::Store(e.to_string())),
        };

        let credential: Credential =
            serde_json::from_str(&content).map_err(|e| SpotifyError::Store(e.to_string()))?;
        Ok(Some(credential))
    }

    async fn save(&self, credential: &Credential) -> Result<(), SpotifyError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| SpotifyError::Store(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| SpotifyError::Store(e.to_string()))?;

        // Write to a sibling temp file, then rename over the target.
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json)
            .await
            .map_err(|e| SpotifyError::Store(e.to_string()))?;
        async_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SpotifyError::Store(e.to_string()))
    }
}

/// In-memory store for tests. Clones share the same record.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    inner: Arc<Mutex<Option<Credential>>>,
}

impl MemoryCredentialStore {
    pub fn new(credential: Option<Credential>) -> Self {
        MemoryCredentialStore {
            inner: Arc::new(Mutex::new(credential)),
        }
    }

    /// The currently stored record, if any.
    pub fn stored(&self) -> Option<Credential> {
        self.inner.lock().expect("store lock poisoned").clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credential>, SpotifyError> {
        Ok(self.inner.lock().expect("store lock poisoned").clone())
    }

    async fn save(&self, credential: &Credential) -> Result<(), SpotifyError> {
        *self.inner.lock().expect("store lock poisoned") = Some(credential.clone());
        Ok(())
    }
}
