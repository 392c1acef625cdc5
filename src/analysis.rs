//! # Analysis Entry Point
//!
//! [`analyze`] runs the whole engine over one snapshot:
//!
//! ```text
//! RawSnapshot -> Normalizer -> mood annotation
//!             -> { diversity, nostalgia, mood, cultural share }   (rayon::join)
//!             -> VectorBuilder -> Analysis
//! ```
//!
//! Diversity and mood see the focus period when one is configured; nostalgia
//! always compares the full set of windows. The result is a pure function of
//! the snapshot and the config, so two runs over the same input compare equal.

use crate::config::EngineConfig;
use crate::diversity::{genre_coverage, DiversityAnalyzer, DiversityProfile};
use crate::error::Result;
use crate::metrics::MetricResult;
use crate::mood::{DiverseArtist, MoodAnalyzer, MoodProfile, MoodType};
use crate::normalize::{InputStatus, Normalizer, TrackCollection};
use crate::nostalgia::{NostalgiaAnalyzer, NostalgiaProfile};
use crate::personality::{ListenerClassification, PersonalityVector, VectorBuilder, VectorInputs};
use crate::record::{RawSnapshot, TimePeriod};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline facts for reports and the match document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub top_genre: Option<String>,
    pub top_artist: Option<String>,
    pub top_genres: Vec<(String, usize)>,
    pub avg_popularity: f64,
    pub total_artists: usize,
    pub unique_tracks: usize,
    pub total_duration_minutes: f64,
    /// Share of analyzed tracks with at least one genre tag
    pub genre_coverage: f64,
    /// Raw track count per source window, before deduplication
    pub window_counts: BTreeMap<TimePeriod, usize>,
    /// Track entries dropped for lacking an id
    pub skipped_tracks: usize,
    pub loyal_artists: Vec<String>,
    pub resurgent_artists: Vec<String>,
    pub emotionally_diverse_artists: Vec<DiverseArtist>,
    pub mood_type: MoodType,
    pub focus_period: Option<TimePeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub status: InputStatus,
    pub diversity: MetricResult,
    pub nostalgia: MetricResult,
    pub mood: MetricResult,
    pub vector: PersonalityVector,
    pub score: f64,
    pub classification: ListenerClassification,
    pub highlights: Highlights,
}

impl Analysis {
    /// Score as shown to users, floored to an integer
    #[must_use]
    pub fn display_score(&self) -> u32 {
        // weighted sums of whole numbers can land a hair below an integer
        (self.score + 1e-9).floor() as u32
    }
}

/// Analyze one snapshot.
///
/// An empty snapshot succeeds with [`InputStatus::Empty`], neutral metrics and
/// [`PersonalityVector::NEUTRAL`].
///
/// # Errors
///
/// Returns the first [`crate::error::ValidationError`] the normalizer finds.
pub fn analyze(snapshot: &RawSnapshot, config: &EngineConfig) -> Result<Analysis> {
    let normalized = Normalizer::new(config.normalizer.clone()).normalize(snapshot)?;
    let window_counts = TimePeriod::ALL
        .into_iter()
        .map(|period| (period, snapshot.window_len(period)))
        .collect();

    let mut analysis = analyze_collection(&normalized.collection, normalized.status, window_counts, config);
    analysis.highlights.skipped_tracks = normalized.skipped;
    info!(
        "Analysis complete: score {:.1}, vector {:?}, {}",
        analysis.score,
        analysis.vector.as_array(),
        analysis.classification.personality_type
    );
    Ok(analysis)
}

/// Analyze an already-normalized collection
#[must_use]
pub fn analyze_collection(
    collection: &TrackCollection,
    status: InputStatus,
    window_counts: BTreeMap<TimePeriod, usize>,
    config: &EngineConfig,
) -> Analysis {
    let diversity_analyzer = DiversityAnalyzer::new(config.diversity.clone());
    let nostalgia_analyzer = NostalgiaAnalyzer::new(config.nostalgia.clone());
    let mood_analyzer = MoodAnalyzer::new(config.mood.clone());
    let builder = VectorBuilder::new(config.personality.clone());

    let scoped = mood_analyzer.annotate(&collection.restrict(config.focus_period));

    let ((diversity, nostalgia), (mood, cultural)) = rayon::join(
        || {
            rayon::join(
                || diversity_analyzer.analyze(&scoped, None),
                || nostalgia_analyzer.analyze(collection),
            )
        },
        || {
            rayon::join(
                || mood_analyzer.analyze(&scoped),
                || builder.cultural_fraction(scoped.iter().flat_map(|track| track.genres.iter())),
            )
        },
    );

    let inputs = VectorInputs::from_profiles(&diversity, &nostalgia, &mood, cultural);
    let vector = builder.build(&inputs);
    let score = builder.score(&vector);
    let classification = builder.classify(&vector, score);
    let highlights = highlights(&diversity, &nostalgia, &mood, &scoped, window_counts, config.focus_period);

    Analysis {
        status,
        diversity: diversity.metrics(),
        nostalgia: nostalgia.metrics(),
        mood: mood.metrics(),
        vector,
        score,
        classification,
        highlights,
    }
}

fn highlights(
    diversity: &DiversityProfile,
    nostalgia: &NostalgiaProfile,
    mood: &MoodProfile,
    scoped: &TrackCollection,
    window_counts: BTreeMap<TimePeriod, usize>,
    focus_period: Option<TimePeriod>,
) -> Highlights {
    Highlights {
        top_genre: diversity.top_genre().map(str::to_string),
        top_artist: diversity.top_artist().map(str::to_string),
        top_genres: diversity.top_genres.clone(),
        avg_popularity: diversity.mean_popularity,
        total_artists: diversity.unique_artists,
        unique_tracks: diversity.track_count,
        total_duration_minutes: diversity.total_duration_ms as f64 / 60_000.0,
        genre_coverage: genre_coverage(scoped),
        window_counts,
        skipped_tracks: 0,
        loyal_artists: nostalgia.loyal_artists.clone(),
        resurgent_artists: nostalgia.resurgent_artists.clone(),
        emotionally_diverse_artists: mood.diverse_artists.clone(),
        mood_type: mood.mood_type,
        focus_period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diversity::KEYS as DIVERSITY_KEYS;
    use crate::mood::KEYS as MOOD_KEYS;
    use crate::nostalgia::KEYS as NOSTALGIA_KEYS;
    use crate::personality::{CompatibilityTier, ListenerTier, PersonalityType};
    use crate::record::{ArtistWindow, RawArtist, RawArtistRef, RawTrack, TrackWindow};

    fn raw_track(id: &str, artist: &str, popularity: u32) -> RawTrack {
        RawTrack {
            id: Some(id.to_string()),
            name: Some(id.to_uppercase()),
            artists: vec![RawArtistRef::Name(artist.to_string())],
            duration_ms: Some(120_000),
            popularity: Some(popularity),
        }
    }

    fn raw_artist(name: &str, genres: &[&str]) -> RawArtist {
        RawArtist {
            name: Some(name.to_string()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            popularity: Some(60),
            ..Default::default()
        }
    }

    fn sample_snapshot() -> RawSnapshot {
        RawSnapshot {
            track_windows: vec![
                TrackWindow {
                    period: TimePeriod::ShortTerm,
                    tracks: vec![raw_track("a", "Arijit", 80), raw_track("b", "Burial", 45), raw_track("c", "Coltrane", 30)],
                },
                TrackWindow {
                    period: TimePeriod::LongTerm,
                    tracks: vec![raw_track("a", "Arijit", 80), raw_track("d", "Daft Punk", 75)],
                },
                TrackWindow {
                    period: TimePeriod::Recent,
                    tracks: vec![raw_track("d", "Daft Punk", 75), raw_track("e", "Enya", 60)],
                },
            ],
            artist_windows: vec![ArtistWindow {
                label: "medium_term".to_string(),
                artists: vec![
                    raw_artist("Arijit", &["filmi", "bollywood"]),
                    raw_artist("Burial", &["dubstep", "ambient"]),
                    raw_artist("Coltrane", &["jazz"]),
                    raw_artist("Daft Punk", &["house", "electronic"]),
                    raw_artist("Enya", &["new age"]),
                ],
            }],
        }
    }

    #[test]
    fn test_empty_snapshot_gives_neutral_analysis() {
        let analysis = analyze(&RawSnapshot::default(), &EngineConfig::default()).unwrap();

        assert_eq!(analysis.status, InputStatus::Empty);
        assert_eq!(analysis.vector, PersonalityVector::NEUTRAL);
        assert!(analysis.diversity.contains_all(DIVERSITY_KEYS));
        assert!(analysis.nostalgia.contains_all(NOSTALGIA_KEYS));
        assert!(analysis.mood.contains_all(MOOD_KEYS));
        assert_eq!(analysis.highlights.top_genre, None);
        assert_eq!(analysis.classification.listener_tier, ListenerTier::NicheSpecialist);
        assert_eq!(analysis.classification.personality_type, PersonalityType::BalancedListener);
        // 50 * (0.12 + 0.15 + 0.15)
        assert!((analysis.score - 21.0).abs() < 1e-9);
        assert_eq!(analysis.classification.compatibility_tier, CompatibilityTier::NichePersonality);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let snapshot = sample_snapshot();
        let config = EngineConfig::default();
        let first = analyze(&snapshot, &config).unwrap();
        let second = analyze(&snapshot, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_snapshot_highlights() {
        let analysis = analyze(&sample_snapshot(), &EngineConfig::default()).unwrap();
        let highlights = &analysis.highlights;

        assert_eq!(analysis.status, InputStatus::Populated);
        assert_eq!(highlights.unique_tracks, 5);
        assert_eq!(highlights.total_artists, 5);
        assert_eq!(highlights.top_genre.as_deref(), Some("bollywood"));
        assert_eq!(highlights.top_artist.as_deref(), Some("Arijit"));
        assert_eq!(highlights.window_counts[&TimePeriod::ShortTerm], 3);
        assert_eq!(highlights.window_counts[&TimePeriod::MediumTerm], 0);
        assert!((highlights.total_duration_minutes - 10.0).abs() < 1e-12);
        assert!((highlights.avg_popularity - 58.0).abs() < 1e-12);
        assert_eq!(highlights.genre_coverage, 1.0);

        // 2 of 8 distinct genres are cultural
        assert_eq!(analysis.vector.as_array()[5], 25);
        assert!(analysis.vector.as_array().iter().all(|&v| v <= 100));
        assert!((0.0..=100.0).contains(&analysis.score));
    }

    #[test]
    fn test_focus_period_restricts_diversity_only() {
        let config = EngineConfig {
            focus_period: Some(TimePeriod::Recent),
            ..Default::default()
        };
        let focused = analyze(&sample_snapshot(), &config).unwrap();
        let full = analyze(&sample_snapshot(), &EngineConfig::default()).unwrap();

        assert_eq!(focused.diversity.get("track_count"), Some(2.0));
        assert_eq!(focused.nostalgia, full.nostalgia);
    }

    #[test]
    fn test_invalid_snapshot_is_rejected() {
        let mut snapshot = sample_snapshot();
        snapshot.track_windows[0].tracks.push(raw_track("z", "Zed", 250));
        assert!(analyze(&snapshot, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_local_file_without_id_does_not_abort() {
        let mut snapshot = sample_snapshot();
        let baseline = analyze(&snapshot, &EngineConfig::default()).unwrap();

        snapshot.track_windows.push(TrackWindow {
            period: TimePeriod::Recent,
            tracks: vec![RawTrack {
                id: None,
                name: Some("Voice Memo".to_string()),
                ..Default::default()
            }],
        });
        let analysis = analyze(&snapshot, &EngineConfig::default()).unwrap();
        assert_eq!(analysis.highlights.skipped_tracks, 1);
        assert_eq!(analysis.vector, baseline.vector);
        assert_eq!(analysis.highlights.unique_tracks, baseline.highlights.unique_tracks);
    }
}
