//! # Record Normalizer
//!
//! Turns a [`RawSnapshot`] into one deduplicated [`TrackCollection`]:
//!
//! 1. Artists from every artist window are indexed by identity (first
//!    occurrence wins, genre sets are unioned).
//! 2. Tracks from every window are merged by id in first-seen order. Their
//!    period tags are unioned and attributes missing from the first sighting
//!    are filled from later ones.
//! 3. Each track picks up the genres of its primary artist (or of all credited
//!    artists, see [`GenreResolution`]). Unknown artists leave the genre set
//!    empty.
//!
//! ## Field defaults
//!
//! | field        | default           |
//! |--------------|-------------------|
//! | `name`       | `"Unknown Track"` |
//! | artist name  | `"Unknown Artist"`|
//! | `popularity` | `NormalizerConfig::default_popularity` (0) |
//! | `duration_ms`| 0                 |
//! | genres       | empty             |
//!
//! Track entries without an id (local files export `"id": null`) are skipped
//! with a warning and counted in [`Normalized::skipped`]. With
//! [`NormalizerConfig::strict_ids`] set they are a [`ValidationError`]
//! instead. A missing artist identity or a popularity above 100 is always
//! rejected.

use crate::error::{Result, ValidationError};
use crate::record::{ArtistRecord, ArtistWindow, RawArtist, RawSnapshot, RawTrack, TimePeriod, TrackRecord};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const UNKNOWN_TRACK: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Which credited artists contribute genres to a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreResolution {
    #[default]
    PrimaryArtist,
    AllArtists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub genre_resolution: GenreResolution,
    /// Popularity used for tracks that never report one
    pub default_popularity: u8,
    /// Reject id-less track entries instead of skipping them
    pub strict_ids: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            genre_resolution: GenreResolution::PrimaryArtist,
            default_popularity: 0,
            strict_ids: false,
        }
    }
}

/// Whether the snapshot carried any track at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    Empty,
    Populated,
}

/// Deduplicated tracks in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackCollection {
    tracks: Vec<TrackRecord>,
}

impl TrackCollection {
    /// Wrap already-normalized records. Later duplicates of an id are dropped.
    #[must_use]
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let tracks = tracks
            .into_iter()
            .filter(|track| seen.insert(track.id.clone()))
            .collect();
        Self { tracks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackRecord> {
        self.tracks.iter()
    }

    #[must_use]
    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Tracks tagged with `period`, order preserved
    #[must_use]
    pub fn in_period(&self, period: TimePeriod) -> Vec<&TrackRecord> {
        self.tracks.iter().filter(|track| track.in_period(period)).collect()
    }

    /// Owned sub-collection for one period, or a clone of everything
    #[must_use]
    pub fn restrict(&self, period: Option<TimePeriod>) -> TrackCollection {
        match period {
            Some(period) => Self {
                tracks: self.tracks.iter().filter(|t| t.in_period(period)).cloned().collect(),
            },
            None => self.clone(),
        }
    }

    #[must_use]
    pub fn into_tracks(self) -> Vec<TrackRecord> {
        self.tracks
    }
}

impl<'a> IntoIterator for &'a TrackCollection {
    type Item = &'a TrackRecord;
    type IntoIter = std::slice::Iter<'a, TrackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

/// Normalizer output
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub status: InputStatus,
    pub collection: TrackCollection,
    /// Track entries dropped for lacking an id
    pub skipped: usize,
}

/// Artists keyed by id and by name
#[derive(Debug, Clone, Default)]
pub struct ArtistIndex {
    records: Vec<ArtistRecord>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ArtistIndex {
    /// Look an artist up by id first, then by display name
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&ArtistRecord> {
        self.by_id
            .get(identity)
            .or_else(|| self.by_name.get(identity))
            .map(|&slot| &self.records[slot])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&mut self, record: ArtistRecord) {
        let slot = self.records.len();
        self.by_id.entry(record.id.clone()).or_insert(slot);
        self.by_name.entry(record.name.clone()).or_insert(slot);
        self.records.push(record);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    #[must_use]
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Index every artist window.
    ///
    /// # Errors
    ///
    /// Fails on an artist with neither id nor name, or with popularity > 100.
    pub fn index_artists(&self, windows: &[ArtistWindow]) -> Result<ArtistIndex> {
        let mut index = ArtistIndex::default();

        for window in windows {
            for (position, raw) in window.artists.iter().enumerate() {
                let record = artist_record(raw, position + 1)?;
                match index.by_id.get(&record.id).copied() {
                    Some(slot) => {
                        index.records[slot].genres.extend(record.genres);
                    }
                    None => index.insert(record),
                }
            }
        }

        debug!("Indexed {} distinct artists", index.len());
        Ok(index)
    }

    /// Normalize a whole snapshot.
    ///
    /// An all-empty snapshot is not an error: the result carries
    /// [`InputStatus::Empty`] and an empty collection. So does a snapshot whose
    /// every track entry lacks an id.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ValidationError`] found in the raw records.
    /// Id-less tracks only count as one under [`NormalizerConfig::strict_ids`].
    pub fn normalize(&self, snapshot: &RawSnapshot) -> Result<Normalized> {
        let artists = self.index_artists(&snapshot.artist_windows)?;

        let mut tracks: Vec<TrackRecord> = Vec::new();
        let mut popularity_known: Vec<bool> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut raw_count = 0usize;
        let mut skipped = 0usize;

        for window in &snapshot.track_windows {
            for (position, raw) in window.tracks.iter().enumerate() {
                let id = match track_id(raw, window.period, position) {
                    Ok(id) => id,
                    Err(err) if !self.config.strict_ids => {
                        warn!("{err}, skipping it");
                        skipped += 1;
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                raw_count += 1;
                let popularity = checked_popularity(&id, raw.popularity)?;

                match slots.get(&id).copied() {
                    Some(slot) => {
                        let existing = &mut tracks[slot];
                        existing.periods.insert(window.period);
                        if let (false, Some(value)) = (popularity_known[slot], popularity) {
                            existing.popularity = value;
                            popularity_known[slot] = true;
                        }
                        fill_missing(existing, raw);
                    }
                    None => {
                        slots.insert(id.clone(), tracks.len());
                        popularity_known.push(popularity.is_some());
                        tracks.push(self.track_record(id, raw, window.period, popularity));
                    }
                }
            }
        }

        for track in &mut tracks {
            track.genres = self.resolve_genres(track, &artists);
        }

        let status = if raw_count == 0 {
            info!("Snapshot contains no usable tracks in any window ({skipped} skipped)");
            InputStatus::Empty
        } else {
            info!(
                "Normalized {raw_count} raw tracks into {} unique tracks, skipped {skipped} without id",
                tracks.len()
            );
            InputStatus::Populated
        };

        Ok(Normalized {
            status,
            collection: TrackCollection { tracks },
            skipped,
        })
    }

    fn track_record(&self, id: String, raw: &RawTrack, period: TimePeriod, popularity: Option<u8>) -> TrackRecord {
        TrackRecord {
            id,
            name: raw.name.clone().filter(|n| !n.trim().is_empty()).unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
            artist_ids: raw.artists.iter().filter_map(|a| a.identity()).map(str::to_string).collect(),
            artist_name: primary_name(raw).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            popularity: popularity.unwrap_or(self.config.default_popularity),
            duration_ms: raw.duration_ms.unwrap_or(0),
            genres: BTreeSet::new(),
            periods: BTreeSet::from([period]),
            mood: None,
        }
    }

    fn resolve_genres(&self, track: &TrackRecord, artists: &ArtistIndex) -> BTreeSet<String> {
        let lookup = |identity: &str| artists.get(identity).map(|artist| artist.genres.clone());

        match self.config.genre_resolution {
            GenreResolution::PrimaryArtist => track
                .primary_artist_id()
                .and_then(lookup)
                .or_else(|| lookup(track.artist_name.as_str()))
                .unwrap_or_default(),
            GenreResolution::AllArtists => track
                .artist_ids
                .iter()
                .filter_map(|identity| lookup(identity.as_str()))
                .flatten()
                .collect(),
        }
    }
}

fn track_id(raw: &RawTrack, period: TimePeriod, position: usize) -> Result<String> {
    raw.id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::MissingTrackId {
            window: period.to_string(),
            position: position + 1,
        })
}

fn checked_popularity(identity: &str, value: Option<u32>) -> Result<Option<u8>> {
    match value {
        None => Ok(None),
        Some(value) => u8::try_from(value)
            .ok()
            .filter(|&p| p <= 100)
            .map(Some)
            .ok_or_else(|| ValidationError::PopularityOutOfRange {
                identity: identity.to_string(),
                value,
            }),
    }
}

fn primary_name(raw: &RawTrack) -> Option<String> {
    raw.artists.first().and_then(|a| a.display_name()).map(str::to_string)
}

fn fill_missing(existing: &mut TrackRecord, raw: &RawTrack) {
    if existing.name == UNKNOWN_TRACK {
        if let Some(name) = raw.name.as_ref().filter(|n| !n.trim().is_empty()) {
            existing.name = name.clone();
        }
    }
    if existing.artist_ids.is_empty() && !raw.artists.is_empty() {
        existing.artist_ids = raw.artists.iter().filter_map(|a| a.identity()).map(str::to_string).collect();
        if let Some(name) = primary_name(raw) {
            existing.artist_name = name;
        }
    }
    if existing.duration_ms == 0 {
        existing.duration_ms = raw.duration_ms.unwrap_or(0);
    }
}

fn artist_record(raw: &RawArtist, rank: usize) -> Result<ArtistRecord> {
    let clean = |value: &Option<String>| value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    let name = clean(&raw.name);
    let id = clean(&raw.id)
        .or_else(|| name.clone())
        .ok_or(ValidationError::MissingArtistIdentity { position: rank })?;
    let popularity = checked_popularity(&id, raw.popularity)?.unwrap_or(0);

    Ok(ArtistRecord {
        name: name.unwrap_or_else(|| id.clone()),
        id,
        popularity,
        followers: raw.followers.as_ref().map_or(0, |f| f.total()),
        genres: raw.genres.iter().map(|g| g.trim().to_lowercase()).filter(|g| !g.is_empty()).collect(),
        rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawArtistRef, TrackWindow};

    fn raw_track(id: &str, artist: &str, popularity: Option<u32>) -> RawTrack {
        RawTrack {
            id: Some(id.to_string()),
            name: Some(format!("Song {id}")),
            artists: vec![RawArtistRef::Name(artist.to_string())],
            duration_ms: Some(180_000),
            popularity,
        }
    }

    fn raw_artist(name: &str, genres: &[&str]) -> RawArtist {
        RawArtist {
            id: None,
            name: Some(name.to_string()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            popularity: Some(50),
            followers: None,
        }
    }

    fn snapshot(windows: Vec<(TimePeriod, Vec<RawTrack>)>, artists: Vec<RawArtist>) -> RawSnapshot {
        RawSnapshot {
            track_windows: windows
                .into_iter()
                .map(|(period, tracks)| TrackWindow { period, tracks })
                .collect(),
            artist_windows: vec![ArtistWindow { label: "medium_term".to_string(), artists }],
        }
    }

    #[test]
    fn test_duplicates_merge_and_union_periods() {
        let snap = snapshot(
            vec![
                (TimePeriod::ShortTerm, vec![raw_track("a", "X", Some(40)), raw_track("b", "Y", Some(60))]),
                (TimePeriod::LongTerm, vec![raw_track("a", "X", Some(40))]),
                (TimePeriod::Recent, vec![raw_track("a", "X", None)]),
            ],
            vec![],
        );

        let normalized = Normalizer::default().normalize(&snap).unwrap();
        assert_eq!(normalized.status, InputStatus::Populated);
        assert_eq!(normalized.collection.len(), 2);

        let first = &normalized.collection.tracks()[0];
        assert_eq!(first.id, "a");
        assert_eq!(
            first.periods,
            BTreeSet::from([TimePeriod::ShortTerm, TimePeriod::LongTerm, TimePeriod::Recent])
        );
    }

    #[test]
    fn test_later_sighting_fills_missing_popularity() {
        let snap = snapshot(
            vec![
                (TimePeriod::Saved, vec![raw_track("a", "X", None)]),
                (TimePeriod::MediumTerm, vec![raw_track("a", "X", Some(77))]),
            ],
            vec![],
        );
        let normalized = Normalizer::default().normalize(&snap).unwrap();
        assert_eq!(normalized.collection.tracks()[0].popularity, 77);
    }

    #[test]
    fn test_primary_artist_genres_are_attached() {
        let mut collab = raw_track("c", "X", Some(10));
        collab.artists.push(RawArtistRef::Name("Y".to_string()));
        let snap = snapshot(
            vec![(TimePeriod::MediumTerm, vec![collab])],
            vec![raw_artist("X", &["Indie Pop"]), raw_artist("Y", &["jazz"])],
        );

        let primary = Normalizer::default().normalize(&snap).unwrap();
        assert_eq!(primary.collection.tracks()[0].genres, BTreeSet::from(["indie pop".to_string()]));

        let all = Normalizer::new(NormalizerConfig {
            genre_resolution: GenreResolution::AllArtists,
            ..Default::default()
        })
        .normalize(&snap)
        .unwrap();
        assert_eq!(
            all.collection.tracks()[0].genres,
            BTreeSet::from(["indie pop".to_string(), "jazz".to_string()])
        );
    }

    #[test]
    fn test_unknown_artist_keeps_empty_genres() {
        let snap = snapshot(vec![(TimePeriod::ShortTerm, vec![raw_track("a", "Nobody", Some(5))])], vec![]);
        let normalized = Normalizer::default().normalize(&snap).unwrap();
        assert!(normalized.collection.tracks()[0].genres.is_empty());
    }

    #[test]
    fn test_empty_snapshot_reports_empty_status() {
        let snap = snapshot(vec![(TimePeriod::ShortTerm, vec![]), (TimePeriod::LongTerm, vec![])], vec![]);
        let normalized = Normalizer::default().normalize(&snap).unwrap();
        assert_eq!(normalized.status, InputStatus::Empty);
        assert!(normalized.collection.is_empty());
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let bare = RawTrack {
            id: Some("z".to_string()),
            ..Default::default()
        };
        let snap = snapshot(vec![(TimePeriod::Recent, vec![bare])], vec![]);
        let collection = Normalizer::default().normalize(&snap).unwrap().collection;
        let track = &collection.tracks()[0];
        assert_eq!(track.name, UNKNOWN_TRACK);
        assert_eq!(track.artist_name, UNKNOWN_ARTIST);
        assert_eq!(track.popularity, 0);
        assert_eq!(track.duration_ms, 0);
        assert!(track.artist_ids.is_empty());
    }

    #[test]
    fn test_tracks_without_id_are_skipped() {
        let blank_id = RawTrack {
            id: Some("  ".to_string()),
            ..raw_track("x", "X", Some(10))
        };
        let snap = snapshot(
            vec![
                (TimePeriod::ShortTerm, vec![raw_track("t1", "X", Some(40))]),
                (TimePeriod::Recent, vec![raw_track("t1", "X", None), RawTrack::default(), blank_id]),
            ],
            vec![],
        );

        let normalized = Normalizer::default().normalize(&snap).unwrap();
        assert_eq!(normalized.status, InputStatus::Populated);
        assert_eq!(normalized.skipped, 2);
        assert_eq!(normalized.collection.len(), 1);
        assert_eq!(
            normalized.collection.tracks()[0].periods,
            BTreeSet::from([TimePeriod::ShortTerm, TimePeriod::Recent])
        );

        let only_local = snapshot(vec![(TimePeriod::Saved, vec![RawTrack::default()])], vec![]);
        let normalized = Normalizer::default().normalize(&only_local).unwrap();
        assert_eq!(normalized.status, InputStatus::Empty);
        assert_eq!(normalized.skipped, 1);
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let strict = Normalizer::new(NormalizerConfig {
            strict_ids: true,
            ..Default::default()
        });
        let no_id = snapshot(
            vec![(TimePeriod::Recent, vec![raw_track("a", "X", Some(1)), RawTrack::default()])],
            vec![],
        );
        assert!(matches!(
            strict.normalize(&no_id),
            Err(ValidationError::MissingTrackId { position: 2, .. })
        ));

        let too_popular = snapshot(vec![(TimePeriod::ShortTerm, vec![raw_track("a", "X", Some(101))])], vec![]);
        assert!(matches!(
            Normalizer::default().normalize(&too_popular),
            Err(ValidationError::PopularityOutOfRange { value: 101, .. })
        ));

        let anonymous = snapshot(vec![], vec![RawArtist::default()]);
        assert!(matches!(
            Normalizer::default().normalize(&anonymous),
            Err(ValidationError::MissingArtistIdentity { position: 1 })
        ));
    }

    #[test]
    fn test_artist_index_first_rank_wins() {
        let windows = vec![
            ArtistWindow {
                label: "short_term".to_string(),
                artists: vec![raw_artist("A", &["rock"]), raw_artist("B", &[])],
            },
            ArtistWindow {
                label: "long_term".to_string(),
                artists: vec![raw_artist("B", &["blues"])],
            },
        ];
        let index = Normalizer::default().index_artists(&windows).unwrap();
        assert_eq!(index.len(), 2);
        let b = index.get("B").unwrap();
        assert_eq!(b.rank, 2);
        assert!(b.genres.contains("blues"));
    }

    #[test]
    fn test_restrict_keeps_order() {
        let snap = snapshot(
            vec![
                (TimePeriod::ShortTerm, vec![raw_track("a", "X", Some(1)), raw_track("b", "X", Some(2))]),
                (TimePeriod::LongTerm, vec![raw_track("b", "X", Some(2)), raw_track("c", "X", Some(3))]),
            ],
            vec![],
        );
        let collection = Normalizer::default().normalize(&snap).unwrap().collection;
        let long: Vec<_> = collection
            .restrict(Some(TimePeriod::LongTerm))
            .iter()
            .map(|t| t.id.clone())
            .collect();
        assert_eq!(long, vec!["b", "c"]);
        assert_eq!(collection.restrict(None).len(), 3);
    }
}
