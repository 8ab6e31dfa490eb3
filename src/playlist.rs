use std::{collections::HashSet, future::Future, io::ErrorKind, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::youtube;

/// A single playlist entry. The canonical watch URL is the dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub channel: String,
    pub url: String,
}

/// On-disk document shape: a single `playlist` key holding the track list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PlaylistFile {
    #[serde(default)]
    playlist: Vec<Track>,
}

/// Loads a previously saved playlist.
///
/// A missing file is an empty playlist. An unreadable or malformed file is
/// logged and also treated as empty; loading never fails.
pub async fn load(path: &Path) -> Vec<Track> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("Failed to read playlist {}: {e}", path.display());
            return Vec::new();
        }
    };

    // An empty file deserializes as a `null` document
    match serde_yaml::from_str::<Option<PlaylistFile>>(&raw) {
        Ok(file) => file.map(|f| f.playlist).unwrap_or_default(),
        Err(e) => {
            warn!("Failed to parse playlist {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Saves the full playlist, overwriting any prior content. Entry order is
/// preserved as given. Failures are logged, never propagated.
pub async fn save(path: &Path, tracks: &[Track]) {
    let file = PlaylistFile {
        playlist: tracks.to_vec(),
    };

    let yaml = match serde_yaml::to_string(&file) {
        Ok(yaml) => yaml,
        Err(e) => {
            error!("Failed to serialize playlist: {e}");
            return;
        }
    };

    match tokio::fs::write(path, yaml).await {
        Ok(()) => info!("Playlist saved to {}", path.display()),
        Err(e) => error!("Failed to save playlist {}: {e}", path.display()),
    }
}

/// Processes a batch of input URLs against the playlist at `output`.
///
/// Duplicate and invalid URLs are skipped; new ones are resolved through
/// `fetch` and appended in input order. The file is rewritten only when at
/// least one track was added.
///
/// Deduplication is checked against the URLs loaded at the start of the run
/// only. A URL repeated within the same batch is fetched and appended twice,
/// matching the behavior of the original tool.
pub async fn process_urls<F, Fut>(urls: &[String], output: &Path, fetch: F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Track>,
{
    let existing = load(output).await;
    let existing_urls: HashSet<String> = existing.iter().map(|t| t.url.clone()).collect();

    let mut new_tracks: Vec<Track> = Vec::new();

    info!("Processing {} URLs...", urls.len());

    for (i, url) in urls.iter().enumerate() {
        let url = url.trim();
        if url.is_empty() {
            continue;
        }

        info!("[{}/{}] Processing: {url}", i + 1, urls.len());

        if existing_urls.contains(url) {
            info!("Already in playlist, skipping");
            continue;
        }

        let Some(video_id) = youtube::extract_video_id(url) else {
            warn!("Not a valid YouTube video URL, skipping");
            continue;
        };

        let track = fetch(video_id).await;
        info!("Added: {} ({})", track.title, track.channel);
        new_tracks.push(track);
    }

    if new_tracks.is_empty() {
        info!("No new tracks to add");
        return;
    }

    let added = new_tracks.len();
    let mut playlist = existing;
    playlist.append(&mut new_tracks);

    save(output, &playlist).await;
    info!("Added {added} new tracks, {} total", playlist.len());
}
