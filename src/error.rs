//! Error types for the analysis engine and the snapshot loader.
//!
//! The engine itself only ever rejects malformed records; empty input and
//! degenerate statistics are ordinary states with neutral results. The CLI
//! wraps these in `anyhow` for context.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used at the library boundary
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A raw record that cannot be turned into a [`crate::record::TrackRecord`]
/// or [`crate::record::ArtistRecord`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Track entry without a usable id
    #[error("track #{position} in window `{window}` has no id")]
    MissingTrackId { window: String, position: usize },

    /// Artist entry with neither id nor name
    #[error("artist #{position} has neither id nor name")]
    MissingArtistIdentity { position: usize },

    /// Popularity outside 0..=100
    #[error("popularity {value} of `{identity}` is outside 0..=100")]
    PopularityOutOfRange { identity: String, value: u32 },

    /// Mood component outside [0, 1] or not finite
    #[error("mood value {value} for `{field}` is outside [0, 1]")]
    MoodOutOfRange { field: String, value: f64 },

    /// Personality axis value outside 0..=100
    #[error("axis value {value} at position {position} is outside 0..=100")]
    AxisOutOfRange { position: usize, value: u8 },

    /// Match-score weights that are negative or do not add up to 1
    #[error("axis weights must be non-negative and sum to 1, got sum {sum}")]
    InvalidWeights { sum: f64 },

    /// Unknown time-period label
    #[error("unknown time period `{0}`")]
    UnknownPeriod(String),
}

/// Failure while reading a listening-history snapshot from disk
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not the expected JSON shape
    #[error("malformed snapshot file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Directory holds neither the combined file nor any split file
    #[error("no snapshot files found in {0}")]
    NotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_record() {
        let err = ValidationError::PopularityOutOfRange {
            identity: "track-1".to_string(),
            value: 140,
        };
        let message = err.to_string();
        assert!(message.contains("track-1"));
        assert!(message.contains("140"));
    }

    #[test]
    fn test_snapshot_not_found_message() {
        let err = SnapshotError::NotFound(PathBuf::from("/tmp/nowhere"));
        assert!(err.to_string().contains("/tmp/nowhere"));
    }
}
