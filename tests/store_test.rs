use splcli::management::{CredentialStore, FileCredentialStore};
use splcli::types::Credential;

fn sample_credential(access_token: &str) -> Credential {
    Credential {
        access_token: access_token.to_string(),
        refresh_token: Some("refresh-1".to_string()),
        scope: vec!["playlist-read-private".to_string()],
        expires_at: 1_900_000_000,
    }
}

#[tokio::test]
async fn test_file_store_roundtrip_and_mutate_in_place() {
    let dir = std::env::temp_dir().join(format!("splcli-store-test-{}", std::process::id()));
    let path = dir.join("credential.json");
    let store = FileCredentialStore::with_path(path.clone());

    // Nothing stored yet.
    assert!(store.load().await.unwrap().is_none());

    store.save(&sample_credential("token-1")).await.unwrap();
    let loaded = store.load().await.unwrap().expect("credential missing");
    assert_eq!(loaded.access_token, "token-1");
    assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-1"));

    // Saving again mutates the single record in place.
    store.save(&sample_credential("token-2")).await.unwrap();
    let loaded = store.load().await.unwrap().expect("credential missing");
    assert_eq!(loaded.access_token, "token-2");

    // The atomic write leaves no temp file behind.
    assert!(!path.with_extension("json.tmp").exists());

    let _ = std::fs::remove_dir_all(dir);
}
