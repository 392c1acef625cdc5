//! # Diversity Analyzer
//!
//! Measures how spread out a listener's taste is:
//!
//! - **Genre entropy**: Shannon entropy (bits) of the genre frequency table,
//!   where every track contributes one count per genre tag.
//! - **Diversity score**: entropy divided by the maximum entropy for the
//!   observed genre cardinality, `log2(k)`, on a 0-100 scale.
//! - **Artist concentration**: share of artist credits held by the ten most
//!   frequent artists. Ties at the cut-off keep first-seen order.
//! - **Popularity spread**: mean, sample standard deviation and range.
//!
//! Fewer than two tracks, or fewer than two distinct genres, give a diversity
//! score of 0.

use crate::metrics::{mean, ratio, sample_std, shannon_entropy, MetricResult, Tally};
use crate::normalize::TrackCollection;
use crate::record::{TimePeriod, TrackRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keys present in every diversity [`MetricResult`]
pub const KEYS: &[&str] = &[
    "genre_entropy",
    "genre_diversity_score",
    "unique_genres",
    "unique_artists",
    "artist_entropy",
    "artist_concentration",
    "mean_popularity",
    "popularity_std",
    "popularity_range",
    "track_count",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    /// How many leading artists count towards concentration
    pub top_artists: usize,
    /// Mean popularity reported for an empty collection
    pub empty_mean_popularity: f64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            top_artists: 10,
            empty_mean_popularity: 50.0,
        }
    }
}

/// Typed diversity figures; [`DiversityProfile::metrics`] flattens them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityProfile {
    pub genre_entropy: f64,
    pub diversity_score: f64,
    pub unique_genres: usize,
    pub unique_artists: usize,
    pub artist_entropy: f64,
    pub artist_concentration: f64,
    pub mean_popularity: f64,
    pub popularity_std: f64,
    pub popularity_range: f64,
    pub track_count: usize,
    pub top_genres: Vec<(String, usize)>,
    pub top_artists: Vec<(String, usize)>,
    pub total_duration_ms: u64,
}

impl DiversityProfile {
    #[must_use]
    pub fn top_genre(&self) -> Option<&str> {
        self.top_genres.first().map(|(genre, _)| genre.as_str())
    }

    #[must_use]
    pub fn top_artist(&self) -> Option<&str> {
        self.top_artists.first().map(|(artist, _)| artist.as_str())
    }

    #[must_use]
    pub fn metrics(&self) -> MetricResult {
        MetricResult::from_pairs([
            ("genre_entropy", self.genre_entropy),
            ("genre_diversity_score", self.diversity_score),
            ("unique_genres", self.unique_genres as f64),
            ("unique_artists", self.unique_artists as f64),
            ("artist_entropy", self.artist_entropy),
            ("artist_concentration", self.artist_concentration),
            ("mean_popularity", self.mean_popularity),
            ("popularity_std", self.popularity_std),
            ("popularity_range", self.popularity_range),
            ("track_count", self.track_count as f64),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiversityAnalyzer {
    config: DiversityConfig,
}

impl DiversityAnalyzer {
    #[must_use]
    pub const fn new(config: DiversityConfig) -> Self {
        Self { config }
    }

    /// Analyze the whole collection, or only tracks tagged with `period`
    #[must_use]
    pub fn analyze(&self, collection: &TrackCollection, period: Option<TimePeriod>) -> DiversityProfile {
        let records: Vec<&TrackRecord> = match period {
            Some(period) => collection.in_period(period),
            None => collection.iter().collect(),
        };
        self.analyze_records(&records)
    }

    #[must_use]
    pub fn analyze_records(&self, records: &[&TrackRecord]) -> DiversityProfile {
        let genres: Tally<&str> = records
            .iter()
            .flat_map(|track| track.genres.iter().map(String::as_str))
            .collect();
        let artists: Tally<&str> = records
            .iter()
            .flat_map(|track| track.artist_ids.iter().map(String::as_str))
            .collect();

        let genre_entropy = shannon_entropy(genres.counts());
        let diversity_score = normalized_diversity(genre_entropy, genres.distinct(), records.len());

        let popularity: Vec<f64> = records.iter().map(|t| f64::from(t.popularity)).collect();
        let (low, high) = popularity
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));

        let names = display_names(records);
        let profile = DiversityProfile {
            genre_entropy,
            diversity_score,
            unique_genres: genres.distinct(),
            unique_artists: artists.distinct(),
            artist_entropy: shannon_entropy(artists.counts()),
            artist_concentration: artists.top_share(self.config.top_artists),
            mean_popularity: mean(&popularity).unwrap_or(self.config.empty_mean_popularity),
            popularity_std: sample_std(&popularity),
            popularity_range: if popularity.is_empty() { 0.0 } else { high - low },
            track_count: records.len(),
            top_genres: genres
                .ranked()
                .into_iter()
                .take(10)
                .map(|(genre, count)| ((*genre).to_string(), count))
                .collect(),
            top_artists: artists
                .ranked()
                .into_iter()
                .take(10)
                .map(|(id, count)| (names.get(*id).copied().unwrap_or(*id).to_string(), count))
                .collect(),
            total_duration_ms: records.iter().map(|t| t.duration_ms).sum(),
        };

        debug!(
            "Diversity: {:.1}/100 ({} genres, {:.2} bits), top-{} concentration {:.1}%",
            profile.diversity_score,
            profile.unique_genres,
            profile.genre_entropy,
            self.config.top_artists,
            profile.artist_concentration * 100.0
        );
        profile
    }
}

/// `entropy / log2(k)` on a 0-100 scale, 0 for degenerate inputs
#[must_use]
pub fn normalized_diversity(entropy: f64, distinct_genres: usize, track_count: usize) -> f64 {
    if track_count < 2 || distinct_genres < 2 {
        return 0.0;
    }
    let max_entropy = (distinct_genres as f64).log2();
    (entropy / max_entropy * 100.0).clamp(0.0, 100.0)
}

/// Artist identity → display name, taken from the first track crediting the
/// artist as primary
fn display_names<'a>(records: &[&'a TrackRecord]) -> HashMap<&'a str, &'a str> {
    let mut names = HashMap::new();
    for &track in records {
        if let Some(id) = track.primary_artist_id() {
            names.entry(id).or_insert(track.artist_name.as_str());
        }
    }
    names
}

/// Share of the collection's tracks that carry at least one genre
#[must_use]
pub fn genre_coverage(collection: &TrackCollection) -> f64 {
    let tagged = collection.iter().filter(|t| !t.genres.is_empty()).count();
    ratio(tagged, collection.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn track(id: &str, artist: &str, genres: &[&str], popularity: u8) -> TrackRecord {
        TrackRecord {
            id: id.to_string(),
            name: id.to_string(),
            artist_ids: vec![artist.to_string()],
            artist_name: format!("{artist} name"),
            popularity,
            duration_ms: 60_000,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            periods: BTreeSet::from([TimePeriod::MediumTerm]),
            mood: None,
        }
    }

    #[test]
    fn test_single_genre_collection() {
        let collection = TrackCollection::new(vec![
            track("a", "x", &["classical"], 10),
            track("b", "y", &["classical"], 20),
            track("c", "z", &["classical"], 30),
        ]);
        let profile = DiversityAnalyzer::default().analyze(&collection, None);

        assert_eq!(profile.genre_entropy, 0.0);
        assert_eq!(profile.diversity_score, 0.0);
        assert!((profile.mean_popularity - 20.0).abs() < 1e-12);
        assert!((profile.popularity_std - 10.0).abs() < 1e-12);
        assert_eq!(profile.popularity_range, 20.0);
        assert_eq!(profile.top_genre(), Some("classical"));
        assert_eq!(profile.total_duration_ms, 180_000);
    }

    #[test]
    fn test_even_genres_reach_full_score() {
        let collection = TrackCollection::new(vec![
            track("a", "x", &["rock"], 50),
            track("b", "y", &["jazz"], 50),
            track("c", "z", &["folk"], 50),
            track("d", "w", &["metal"], 50),
        ]);
        let profile = DiversityAnalyzer::default().analyze(&collection, None);
        assert!((profile.genre_entropy - 2.0).abs() < 1e-12);
        assert!((profile.diversity_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_track_scores_zero_even_with_many_genres() {
        let collection = TrackCollection::new(vec![track("a", "x", &["rock", "jazz", "folk"], 50)]);
        let profile = DiversityAnalyzer::default().analyze(&collection, None);
        assert_eq!(profile.diversity_score, 0.0);
        assert!(profile.genre_entropy > 0.0);
        assert_eq!(profile.popularity_std, 0.0);
    }

    #[test]
    fn test_empty_collection_is_fully_populated() {
        let profile = DiversityAnalyzer::default().analyze(&TrackCollection::default(), None);
        let metrics = profile.metrics();
        assert!(metrics.contains_all(KEYS));
        assert_eq!(metrics.len(), KEYS.len());
        assert_eq!(profile.mean_popularity, 50.0);
        assert_eq!(profile.artist_concentration, 0.0);
        assert_eq!(profile.popularity_range, 0.0);
        assert_eq!(profile.top_genre(), None);
        assert!(metrics.iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn test_concentration_ties_break_by_first_seen() {
        let records: Vec<TrackRecord> = (0..12)
            .map(|i| track(&format!("t{i}"), &format!("artist{i}"), &["pop"], 50))
            .collect();
        let collection = TrackCollection::new(records);
        let analyzer = DiversityAnalyzer::default();
        let profile = analyzer.analyze(&collection, None);

        assert!((profile.artist_concentration - 10.0 / 12.0).abs() < 1e-12);
        assert_eq!(profile.top_artists.len(), 10);
        assert_eq!(profile.top_artist(), Some("artist0 name"));
        assert_eq!(profile.top_artists[9].0, "artist9 name");
    }

    #[test]
    fn test_period_restriction() {
        let mut recent = track("r", "q", &["edm"], 90);
        recent.periods = BTreeSet::from([TimePeriod::Recent]);
        let collection = TrackCollection::new(vec![track("a", "x", &["rock"], 10), recent]);

        let profile = DiversityAnalyzer::default().analyze(&collection, Some(TimePeriod::Recent));
        assert_eq!(profile.track_count, 1);
        assert_eq!(profile.mean_popularity, 90.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for k in 1..20usize {
            let records: Vec<TrackRecord> = (0..k * 3)
                .map(|i| track(&format!("t{i}"), "a", &[format!("g{}", i % k).as_str()], (i % 101) as u8))
                .collect();
            let profile = DiversityAnalyzer::default().analyze(&TrackCollection::new(records), None);
            assert!((0.0..=100.0).contains(&profile.diversity_score));
            assert!(profile.genre_entropy >= 0.0);
        }
    }

    #[test]
    fn test_genre_coverage() {
        let collection = TrackCollection::new(vec![track("a", "x", &["rock"], 1), track("b", "y", &[], 1)]);
        assert_eq!(genre_coverage(&collection), 0.5);
        assert_eq!(genre_coverage(&TrackCollection::default()), 0.0);
    }
}
