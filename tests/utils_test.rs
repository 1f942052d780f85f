use splcli::utils::*;

#[test]
fn test_generate_state_token() {
    let token = generate_state_token();

    // Should be exactly STATE_TOKEN_LEN characters
    assert_eq!(token.len(), STATE_TOKEN_LEN);

    // Should contain only alphanumeric characters
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated tokens should be different
    let token2 = generate_state_token();
    assert_ne!(token, token2);
}

#[test]
fn test_id_from_uri_canonical() {
    assert_eq!(
        id_from_uri("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M"),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
}

#[test]
fn test_id_from_uri_rejects_other_forms() {
    // Wrong resource type
    assert_eq!(id_from_uri("spotify:track:abc123"), None);

    // Wrong prefix
    assert_eq!(id_from_uri("deezer:playlist:abc123"), None);

    // Missing id
    assert_eq!(id_from_uri("spotify:playlist:"), None);
    assert_eq!(id_from_uri("spotify:playlist"), None);

    // Trailing segment
    assert_eq!(id_from_uri("spotify:playlist:abc123:extra"), None);

    // Plain names are not URIs
    assert_eq!(id_from_uri("My Playlist"), None);
    assert_eq!(id_from_uri(""), None);
}

#[test]
fn test_is_playlist_uri() {
    assert!(is_playlist_uri("spotify:playlist:abc123"));
    assert!(!is_playlist_uri("spotify:album:abc123"));
    assert!(!is_playlist_uri("Workout Mix"));
}
