use mockito::Matcher;
use serde_json::json;
use splcli::error::SpotifyError;
use splcli::spotify::SpotifyClient;

fn client_for(server: &mockito::ServerGuard) -> SpotifyClient {
    SpotifyClient::new("test-token", server.url()).expect("client construction failed")
}

fn playlist_json(id: &str, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "snapshot_id": format!("snap-{id}") })
}

#[tokio::test]
async fn test_pagination_follows_cursors_in_order() {
    let mut server = mockito::Server::new_async().await;

    // Three pages of 2/2/1 items; pages 1-2 carry a next cursor, page 3 none.
    let page1 = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [playlist_json("p1", "One"), playlist_json("p2", "Two")],
                "next": format!("{}/me/playlists?offset=2&limit=2", server.url()),
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let page2 = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "2".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [playlist_json("p3", "Three"), playlist_json("p4", "Four")],
                "next": format!("{}/me/playlists?offset=4&limit=2", server.url()),
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let page3 = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "4".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": [playlist_json("p5", "Five")], "next": null }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let playlists = client.all_playlists().await.expect("pagination failed");

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);

    page1.assert_async().await;
    page2.assert_async().await;
    page3.assert_async().await;
}

#[tokio::test]
async fn test_pagination_fails_whole_call_on_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::UrlEncoded("limit".into(), "50".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [playlist_json("p1", "One")],
                "next": format!("{}/me/playlists?offset=1", server.url()),
            })
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::UrlEncoded("offset".into(), "1".into()))
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.all_playlists().await;

    // No partial results: the whole call fails with the page's status.
    match result {
        Err(SpotifyError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({ "error": { "status": 404, "message": "Not found" } }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    match client.all_playlists().await {
        Err(SpotifyError::Api { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("Not found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_add_tracks_chunks_preserve_order() {
    let mut server = mockito::Server::new_async().await;

    let uris: Vec<String> = (0..125).map(|i| format!("spotify:track:{i}")).collect();

    // 125 URIs with a 100-item limit: exactly two calls, split 100/25.
    let chunk1 = server
        .mock("POST", "/playlists/p1/tracks")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({ "uris": uris[..100].to_vec() })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "snap-1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let chunk2 = server
        .mock("POST", "/playlists/p1/tracks")
        .match_body(Matcher::Json(json!({ "uris": uris[100..].to_vec() })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "snap-2" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .add_tracks(&uris, "p1")
        .await
        .expect("batched add failed");

    chunk1.assert_async().await;
    chunk2.assert_async().await;
}

#[tokio::test]
async fn test_partial_batch_failure_surfaces_position() {
    let mut server = mockito::Server::new_async().await;

    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{i}")).collect();

    server
        .mock("POST", "/playlists/p1/tracks")
        .match_body(Matcher::Json(json!({ "uris": uris[..100].to_vec() })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "snap-1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    server
        .mock("POST", "/playlists/p1/tracks")
        .match_body(Matcher::Json(json!({ "uris": uris[100..200].to_vec() })))
        .with_status(500)
        .with_body("server error")
        .expect(1)
        .create_async()
        .await;

    // The third chunk must never be attempted.
    let chunk3 = server
        .mock("POST", "/playlists/p1/tracks")
        .match_body(Matcher::Json(json!({ "uris": uris[200..].to_vec() })))
        .with_status(201)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    match client.add_tracks(&uris, "p1").await {
        Err(SpotifyError::Batch {
            committed,
            total,
            source,
        }) => {
            assert_eq!(committed, 1);
            assert_eq!(total, 3);
            match *source {
                SpotifyError::Api { status, .. } => assert_eq!(status.as_u16(), 500),
                other => panic!("expected Api source, got {other:?}"),
            }
        }
        other => panic!("expected Batch error, got {other:?}"),
    }

    chunk3.assert_async().await;
}

#[tokio::test]
async fn test_resolve_by_uri_bypasses_network() {
    let mut server = mockito::Server::new_async().await;

    let listing = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let id = client
        .resolve_playlist_id("spotify:playlist:abc123")
        .await
        .expect("uri resolution failed");

    assert_eq!(id, "abc123");
    listing.assert_async().await;
}

#[tokio::test]
async fn test_resolve_by_name_substring() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [
                    playlist_json("p1", "Morning Mix"),
                    playlist_json("p2", "Evening Mix"),
                    playlist_json("p3", "Workout"),
                ],
                "next": null,
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);

    let id = client
        .resolve_playlist_id("Evening")
        .await
        .expect("name resolution failed");
    assert_eq!(id, "p2");

    // First match in listing order wins.
    let id = client.resolve_playlist_id("Mix").await.unwrap();
    assert_eq!(id, "p1");

    // Matching is case-sensitive.
    match client.resolve_playlist_id("evening").await {
        Err(SpotifyError::NotFound(identifier)) => assert_eq!(identifier, "evening"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    match client.resolve_playlist_id("Nope").await {
        Err(SpotifyError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_replace_tracks_returns_snapshot() {
    let mut server = mockito::Server::new_async().await;

    let uris = vec!["spotify:track:a".to_string(), "spotify:track:b".to_string()];

    let replace = server
        .mock("PUT", "/playlists/p9/tracks")
        .match_body(Matcher::Json(json!({ "uris": uris })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "snapshot_id": "snap-new" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .replace_tracks("p9", &json!({ "uris": uris }))
        .await
        .expect("replace failed");

    assert_eq!(response["snapshot_id"], "snap-new");
    replace.assert_async().await;
}

#[tokio::test]
async fn test_deferred_track_source_resolves_lazily() {
    use splcli::types::TrackSource;

    let mut server = mockito::Server::new_async().await;

    let tracks = server
        .mock("GET", "/playlists/p1/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [{
                    "added_by": { "id": "user-1" },
                    "track": { "id": "t1", "name": "Song", "uri": "spotify:track:t1" },
                }],
                "next": null,
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);

    // A materialized source never touches the network.
    let materialized = TrackSource::Materialized(Vec::new());
    assert!(client.resolve_tracks(materialized).await.unwrap().is_empty());

    let deferred = TrackSource::Deferred {
        playlist_id: "p1".to_string(),
    };
    let items = client.resolve_tracks(deferred).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].track.uri, "spotify:track:t1");

    // Exactly one fetch, and only for the deferred source.
    tracks.assert_async().await;
}
