//! # Record Types
//!
//! Two layers live here:
//!
//! - **Raw payloads** ([`RawTrack`], [`RawArtist`], [`RawSnapshot`]) mirror what
//!   the listening-history export contains. Every field is optional and the
//!   shapes are loose (artists as plain names or `{id, name}` objects,
//!   followers as a number or `{"total": n}`), because the export differs per
//!   endpoint.
//! - **Normalized records** ([`TrackRecord`], [`ArtistRecord`]) are fully
//!   populated. The normalizer applies the per-field defaults once so the
//!   analyzers never deal with missing attributes.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Source window a track was observed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    /// Top tracks of roughly the last four weeks
    ShortTerm,
    /// Top tracks of roughly the last six months
    MediumTerm,
    /// Top tracks over several years
    LongTerm,
    /// Saved library tracks
    Saved,
    /// Recently played tracks
    Recent,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::ShortTerm,
        TimePeriod::MediumTerm,
        TimePeriod::LongTerm,
        TimePeriod::Saved,
        TimePeriod::Recent,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TimePeriod::ShortTerm => "short_term",
            TimePeriod::MediumTerm => "medium_term",
            TimePeriod::LongTerm => "long_term",
            TimePeriod::Saved => "saved",
            TimePeriod::Recent => "recent",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        TimePeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPeriod(s.to_string()))
    }
}

/// Inferred (energy, valence, danceability), each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodTriple {
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
}

impl MoodTriple {
    /// Used for every track whose genres match nothing in the mood table
    pub const NEUTRAL: MoodTriple = MoodTriple {
        energy: 0.5,
        valence: 0.5,
        danceability: 0.5,
    };

    /// Build a triple, rejecting components outside [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MoodOutOfRange`] naming the first offending
    /// component.
    pub fn new(energy: f64, valence: f64, danceability: f64) -> Result<Self> {
        for (field, value) in [("energy", energy), ("valence", valence), ("danceability", danceability)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::MoodOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(Self { energy, valence, danceability })
    }
}

/// A deduplicated track with everything the analyzers need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    /// Artist identities in credit order; the first one is the primary artist
    pub artist_ids: Vec<String>,
    /// Display name of the primary artist
    pub artist_name: String,
    pub popularity: u8,
    pub duration_ms: u64,
    pub genres: BTreeSet<String>,
    pub periods: BTreeSet<TimePeriod>,
    /// Attached by [`crate::mood::MoodAnalyzer::annotate`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodTriple>,
}

impl TrackRecord {
    #[must_use]
    pub fn in_period(&self, period: TimePeriod) -> bool {
        self.periods.contains(&period)
    }

    #[must_use]
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artist_ids.first().map(String::as_str)
    }

    /// Copy of this record carrying an inferred mood
    #[must_use]
    pub fn with_mood(mut self, mood: MoodTriple) -> Self {
        self.mood = Some(mood);
        self
    }
}

/// Artist metadata, only used to enrich tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub followers: u64,
    pub genres: BTreeSet<String>,
    /// 1-based position within the window the artist was first seen in
    pub rank: usize,
}

/// Artist credit on a raw track: a bare name or an `{id, name}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawArtistRef {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl RawArtistRef {
    /// Stable identity: the id when present, otherwise the name
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self {
            RawArtistRef::Name(name) => non_empty(Some(name)),
            RawArtistRef::Object { id, name } => non_empty(id.as_ref()).or_else(|| non_empty(name.as_ref())),
        }
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            RawArtistRef::Name(name) => non_empty(Some(name)),
            RawArtistRef::Object { id, name } => non_empty(name.as_ref()).or_else(|| non_empty(id.as_ref())),
        }
    }
}

/// Track entry as exported; top-track, saved and recently-played items all
/// deserialize into this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    #[serde(default, alias = "track_id")]
    pub id: Option<String>,
    #[serde(default, alias = "track_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<RawArtistRef>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

/// Follower count as a bare number or the API's `{"total": n}` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Followers {
    Count(u64),
    Object {
        #[serde(default)]
        total: Option<u64>,
    },
}

impl Followers {
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Followers::Count(count) => *count,
            Followers::Object { total } => total.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub followers: Option<Followers>,
}

/// Raw tracks from one source window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackWindow {
    pub period: TimePeriod,
    pub tracks: Vec<RawTrack>,
}

/// Raw artists from one source list (a top-artists window, followed artists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistWindow {
    pub label: String,
    pub artists: Vec<RawArtist>,
}

/// Everything one analysis run reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub track_windows: Vec<TrackWindow>,
    pub artist_windows: Vec<ArtistWindow>,
}

impl RawSnapshot {
    #[must_use]
    pub fn window(&self, period: TimePeriod) -> Option<&TrackWindow> {
        self.track_windows.iter().find(|window| window.period == period)
    }

    /// Number of raw (not deduplicated) tracks in a window, 0 when absent
    #[must_use]
    pub fn window_len(&self, period: TimePeriod) -> usize {
        self.window(period).map_or(0, |window| window.tracks.len())
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}
