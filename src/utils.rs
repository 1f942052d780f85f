use rand::{Rng, distr::Alphanumeric};

/// Length of the CSRF `state` token sent with the authorize request.
pub const STATE_TOKEN_LEN: usize = 32;

pub fn generate_state_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Whether `value` is a canonical playlist URI (`spotify:playlist:<id>`).
pub fn is_playlist_uri(value: &str) -> bool {
    id_from_uri(value).is_some()
}

/// Extracts the id from a canonical playlist URI without any network call.
pub fn id_from_uri(value: &str) -> Option<&str> {
    let mut parts = value.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("spotify"), Some("playlist"), Some(id), None) if !id.is_empty() => Some(id),
        _ => None,
    }
}
