use serde_json::json;
use tabled::Table;

use crate::{
    error,
    error::SpotifyError,
    info,
    spotify::SpotifyClient,
    success,
    types::{TrackSource, TrackTableRow},
    warning,
};

pub async fn list_tracks(playlist: String) {
    let client = super::authenticated_client().await;
    let playlist_id = resolve(&client, &playlist).await;

    let source = TrackSource::Deferred { playlist_id };

    let pb = super::spinner("Fetching tracks...");
    let tracks = match client.resolve_tracks(source).await {
        Ok(tracks) => tracks,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch tracks: {}", e);
        }
    };
    pb.finish_and_clear();

    if tracks.is_empty() {
        warning!("Playlist has no tracks.");
        return;
    }

    let table_rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .map(|item| TrackTableRow {
            name: item.track.name,
            uri: item.track.uri,
            added_by: item.added_by.map(|u| u.id).unwrap_or_default(),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

pub async fn add_tracks(playlist: String, uris: Vec<String>) {
    let client = super::authenticated_client().await;
    let playlist_id = resolve(&client, &playlist).await;

    info!("Adding {} tracks to {}", uris.len(), playlist);
    match client.add_tracks(&uris, &playlist_id).await {
        Ok(()) => success!("Added {} tracks.", uris.len()),
        Err(SpotifyError::Batch {
            committed,
            total,
            source,
        }) => {
            // Committed chunks stay committed; tell the user how far we got.
            error!(
                "Batch stopped: {} of {} chunks committed, chunk {} failed: {}",
                committed,
                total,
                committed + 1,
                source
            );
        }
        Err(e) => error!("Failed to add tracks: {}", e),
    }
}

pub async fn replace_tracks(playlist: String, uris: Vec<String>) {
    let client = super::authenticated_client().await;
    let playlist_id = resolve(&client, &playlist).await;

    match client
        .replace_tracks(&playlist_id, &json!({ "uris": uris }))
        .await
    {
        Ok(response) => {
            let snapshot = response["snapshot_id"].as_str().unwrap_or("<unknown>");
            success!("Playlist replaced. New snapshot id: {}", snapshot);
        }
        Err(e) => error!("Failed to replace tracks: {}", e),
    }
}

async fn resolve(client: &SpotifyClient, playlist: &str) -> String {
    match client.resolve_playlist_id(playlist).await {
        Ok(id) => id,
        Err(e) => error!("Cannot resolve playlist '{}': {}", playlist, e),
    }
}
