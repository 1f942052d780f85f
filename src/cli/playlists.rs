use tabled::Table;

use crate::{error, types::PlaylistTableRow, warning};

pub async fn list_playlists(search: Option<String>) {
    let client = super::authenticated_client().await;

    let pb = super::spinner("Fetching playlists...");
    let mut playlists = match client.all_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to fetch playlists: {}", e);
        }
    };
    pb.finish_and_clear();

    if let Some(search_term) = search {
        let search_term = search_term.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&search_term));
    }

    if playlists.is_empty() {
        warning!("No playlists found.");
        return;
    }

    let table_rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            id: p.id,
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
