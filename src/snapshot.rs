//! # Snapshot Loader
//!
//! Reads a listening-history export from a data directory into a
//! [`RawSnapshot`]. Two layouts are understood:
//!
//! - the combined `spotify_data.json` with `recently_played`, `top_tracks`,
//!   `top_artists`, `saved_tracks` and `followed_artists` at the top level
//! - split files: `top_tracks.json` and `top_artists.json` wrap a
//!   `{"data": {"short_term": [...], ...}}` map, while `saved_tracks.json`,
//!   `recently_played.json` and `followed_artists.json` wrap `{"items": [...]}`
//!
//! The combined file wins when both are present. A missing split file is an
//! empty window, logged at `warn`. Windows are always assembled in the same
//! order (short, medium, long, saved, recent) so normalization is stable.

use crate::error::SnapshotError;
use crate::record::{ArtistWindow, RawArtist, RawSnapshot, RawTrack, TimePeriod, TrackWindow};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const COMBINED_FILE: &str = "spotify_data.json";
pub const TOP_TRACKS_FILE: &str = "top_tracks.json";
pub const TOP_ARTISTS_FILE: &str = "top_artists.json";
pub const SAVED_TRACKS_FILE: &str = "saved_tracks.json";
pub const RECENTLY_PLAYED_FILE: &str = "recently_played.json";
pub const FOLLOWED_ARTISTS_FILE: &str = "followed_artists.json";

const SPLIT_FILES: [&str; 5] = [
    TOP_TRACKS_FILE,
    TOP_ARTISTS_FILE,
    SAVED_TRACKS_FILE,
    RECENTLY_PLAYED_FILE,
    FOLLOWED_ARTISTS_FILE,
];

const TOP_WINDOWS: [TimePeriod; 3] = [TimePeriod::ShortTerm, TimePeriod::MediumTerm, TimePeriod::LongTerm];

#[derive(Debug, Default, Deserialize)]
struct CombinedExport {
    #[serde(default)]
    recently_played: Vec<RawTrack>,
    #[serde(default)]
    top_tracks: BTreeMap<String, Vec<RawTrack>>,
    #[serde(default)]
    top_artists: BTreeMap<String, Vec<RawArtist>>,
    #[serde(default)]
    saved_tracks: Vec<RawTrack>,
    #[serde(default)]
    followed_artists: Vec<RawArtist>,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned + Default")]
struct DataEnvelope<T> {
    #[serde(default)]
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Load whichever layout `dir` holds.
///
/// # Errors
///
/// [`SnapshotError::NotFound`] when the directory holds no snapshot file at
/// all, [`SnapshotError::Io`] or [`SnapshotError::Malformed`] for a file that
/// cannot be read or parsed.
pub fn load_snapshot(dir: &Path) -> Result<RawSnapshot, SnapshotError> {
    let combined = dir.join(COMBINED_FILE);
    if combined.is_file() {
        info!("Loading combined snapshot from {}", combined.display());
        let export: CombinedExport = read_json(&combined)?;
        return Ok(export.into_snapshot());
    }

    if !SPLIT_FILES.iter().any(|name| dir.join(name).is_file()) {
        return Err(SnapshotError::NotFound(dir.to_path_buf()));
    }

    info!("Loading split snapshot files from {}", dir.display());
    let export = CombinedExport {
        top_tracks: read_optional::<DataEnvelope<BTreeMap<String, Vec<RawTrack>>>>(dir, TOP_TRACKS_FILE)?
            .map(|envelope| envelope.data)
            .unwrap_or_default(),
        top_artists: read_optional::<DataEnvelope<BTreeMap<String, Vec<RawArtist>>>>(dir, TOP_ARTISTS_FILE)?
            .map(|envelope| envelope.data)
            .unwrap_or_default(),
        saved_tracks: read_optional::<ItemsEnvelope<RawTrack>>(dir, SAVED_TRACKS_FILE)?
            .map(|envelope| envelope.items)
            .unwrap_or_default(),
        recently_played: read_optional::<ItemsEnvelope<RawTrack>>(dir, RECENTLY_PLAYED_FILE)?
            .map(|envelope| envelope.items)
            .unwrap_or_default(),
        followed_artists: read_optional::<ItemsEnvelope<RawArtist>>(dir, FOLLOWED_ARTISTS_FILE)?
            .map(|envelope| envelope.items)
            .unwrap_or_default(),
    };
    Ok(export.into_snapshot())
}

impl CombinedExport {
    fn into_snapshot(mut self) -> RawSnapshot {
        for label in self.top_tracks.keys().chain(self.top_artists.keys()) {
            if !TOP_WINDOWS.iter().any(|period| period.as_str() == label) {
                warn!("Ignoring unknown top window `{label}`");
            }
        }

        let mut track_windows: Vec<TrackWindow> = TOP_WINDOWS
            .iter()
            .map(|&period| TrackWindow {
                period,
                tracks: self.top_tracks.remove(period.as_str()).unwrap_or_default(),
            })
            .collect();
        track_windows.push(TrackWindow {
            period: TimePeriod::Saved,
            tracks: self.saved_tracks,
        });
        track_windows.push(TrackWindow {
            period: TimePeriod::Recent,
            tracks: self.recently_played,
        });

        let mut artist_windows: Vec<ArtistWindow> = TOP_WINDOWS
            .iter()
            .map(|&period| ArtistWindow {
                label: period.as_str().to_string(),
                artists: self.top_artists.remove(period.as_str()).unwrap_or_default(),
            })
            .collect();
        artist_windows.push(ArtistWindow {
            label: "followed".to_string(),
            artists: self.followed_artists,
        });

        for window in &track_windows {
            debug!("Window {}: {} tracks", window.period, window.tracks.len());
        }
        RawSnapshot {
            track_windows,
            artist_windows,
        }
    }
}

fn read_optional<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>, SnapshotError> {
    let path = dir.join(name);
    if !path.is_file() {
        warn!("{} not found, treating as empty", path.display());
        return Ok(None);
    }
    read_json(&path).map(Some)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SnapshotError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
