//! # Mood & Emotion Analyzer
//!
//! Infers an (energy, valence, danceability) triple for every track from its
//! genre tags, then profiles the collection's emotional shape.
//!
//! ## Inference
//!
//! Each genre tag is matched against the [`MoodTable`]: an exact entry wins,
//! otherwise the longest entry whose words appear contiguously in the tag
//! (`"desi hip hop"` → `"hip hop"`), ties going to the earlier entry. The
//! track's triple is the mean over its matched tags. A track with no matched
//! tag gets [`MoodTriple::NEUTRAL`].
//!
//! ## Aggregates
//!
//! - mean energy / valence / danceability (neutral 0.5 on empty input)
//! - emotional range: population standard deviation of valence, rescaled so
//!   the largest possible spread (0.5) maps to 100
//! - five-bin valence distribution split at 0.2 / 0.4 / 0.6 / 0.8
//! - Pearson correlation of energy and valence (0 on zero variance)
//! - emotional depth: weighted blend of range, the share of tracks in the two
//!   extreme bins and the share of multi-track artists whose tracks land in
//!   more than one bin

use crate::error::ValidationError;
use crate::metrics::{clamp_unit, mean, pearson, population_std, population_variance, ratio, MetricResult};
use crate::normalize::TrackCollection;
use crate::record::{MoodTriple, TrackRecord};
use lazy_static::lazy_static;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Keys present in every mood [`MetricResult`]
pub const KEYS: &[&str] = &[
    "mean_energy",
    "mean_valence",
    "mean_danceability",
    "emotional_range",
    "very_sad",
    "sad",
    "neutral",
    "happy",
    "very_happy",
    "energy_valence_correlation",
    "extreme_fraction",
    "emotionally_diverse_artists",
    "emotional_depth_score",
];

/// (genre, energy, valence, danceability)
const DEFAULT_MOODS: &[(&str, f64, f64, f64)] = &[
    // high energy
    ("edm", 0.9, 0.7, 0.9),
    ("dance", 0.9, 0.8, 0.9),
    ("electronic", 0.8, 0.6, 0.8),
    ("house", 0.85, 0.7, 0.9),
    ("techno", 0.9, 0.5, 0.85),
    ("trance", 0.85, 0.6, 0.75),
    ("dubstep", 0.95, 0.4, 0.7),
    ("drum and bass", 0.95, 0.5, 0.75),
    ("hip hop", 0.8, 0.6, 0.8),
    ("rap", 0.8, 0.55, 0.8),
    ("trap", 0.85, 0.45, 0.8),
    ("grime", 0.85, 0.45, 0.75),
    ("punk", 0.95, 0.5, 0.7),
    ("hardcore", 0.95, 0.35, 0.55),
    ("metal", 0.95, 0.4, 0.6),
    ("rock", 0.8, 0.5, 0.6),
    ("grunge", 0.85, 0.35, 0.5),
    ("pop", 0.75, 0.75, 0.8),
    ("k-pop", 0.85, 0.8, 0.85),
    ("j-pop", 0.8, 0.75, 0.75),
    ("disco", 0.8, 0.85, 0.9),
    ("funk", 0.75, 0.8, 0.85),
    ("reggaeton", 0.85, 0.75, 0.9),
    ("latin", 0.75, 0.8, 0.85),
    ("salsa", 0.8, 0.85, 0.9),
    ("afrobeats", 0.8, 0.8, 0.9),
    ("bhangra", 0.9, 0.85, 0.9),
    ("punjabi", 0.85, 0.8, 0.85),
    ("party", 0.9, 0.85, 0.9),
    // medium energy
    ("indie", 0.6, 0.5, 0.5),
    ("alternative", 0.65, 0.5, 0.55),
    ("folk", 0.5, 0.6, 0.4),
    ("country", 0.6, 0.65, 0.5),
    ("bluegrass", 0.6, 0.7, 0.5),
    ("blues", 0.5, 0.4, 0.5),
    ("jazz", 0.55, 0.55, 0.6),
    ("soul", 0.55, 0.6, 0.65),
    ("r&b", 0.6, 0.6, 0.7),
    ("gospel", 0.6, 0.8, 0.55),
    ("reggae", 0.55, 0.75, 0.75),
    ("samba", 0.75, 0.85, 0.85),
    ("bossa nova", 0.4, 0.65, 0.6),
    ("new wave", 0.7, 0.6, 0.7),
    ("synthwave", 0.7, 0.55, 0.65),
    ("shoegaze", 0.6, 0.4, 0.35),
    ("dream pop", 0.45, 0.5, 0.45),
    ("post-rock", 0.55, 0.4, 0.3),
    ("emo", 0.75, 0.3, 0.45),
    ("singer-songwriter", 0.4, 0.5, 0.4),
    ("soundtrack", 0.45, 0.5, 0.3),
    ("filmi", 0.65, 0.65, 0.65),
    // low energy / emotional
    ("ambient", 0.2, 0.5, 0.2),
    ("classical", 0.4, 0.6, 0.3),
    ("indian classical", 0.45, 0.6, 0.3),
    ("carnatic", 0.45, 0.6, 0.3),
    ("hindustani", 0.4, 0.6, 0.3),
    ("opera", 0.5, 0.5, 0.2),
    ("piano", 0.3, 0.5, 0.3),
    ("instrumental", 0.35, 0.55, 0.35),
    ("acoustic", 0.4, 0.55, 0.3),
    ("sad", 0.3, 0.2, 0.3),
    ("melancholic", 0.3, 0.15, 0.3),
    ("romantic", 0.45, 0.6, 0.45),
    ("sleep", 0.2, 0.5, 0.2),
    ("chill", 0.35, 0.6, 0.4),
    ("lo-fi", 0.3, 0.6, 0.4),
    // cultural / regional
    ("bollywood", 0.75, 0.7, 0.75),
    ("bhajan", 0.5, 0.7, 0.4),
    ("sufi", 0.55, 0.65, 0.5),
    ("devotional", 0.5, 0.75, 0.4),
    ("worship", 0.5, 0.75, 0.4),
    ("ghazal", 0.4, 0.5, 0.3),
    ("qawwali", 0.7, 0.7, 0.6),
];

lazy_static! {
    static ref DEFAULT_TABLE: MoodTable = MoodTable {
        entries: DEFAULT_MOODS
            .iter()
            .map(|&(genre, energy, valence, danceability)| MoodEntry {
                genre: genre.to_string(),
                mood: MoodTriple { energy, valence, danceability },
            })
            .collect(),
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub genre: String,
    #[serde(flatten)]
    pub mood: MoodTriple,
}

/// Ordered genre → mood lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MoodEntry>", into = "Vec<MoodEntry>")]
pub struct MoodTable {
    entries: Vec<MoodEntry>,
}

impl Default for MoodTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl TryFrom<Vec<MoodEntry>> for MoodTable {
    type Error = ValidationError;

    fn try_from(entries: Vec<MoodEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<MoodTable> for Vec<MoodEntry> {
    fn from(table: MoodTable) -> Self {
        table.entries
    }
}

impl MoodTable {
    /// Build a table from caller-supplied entries, validating every triple.
    ///
    /// # Errors
    ///
    /// Fails on the first entry with a component outside [0, 1].
    pub fn new(entries: Vec<MoodEntry>) -> crate::error::Result<Self> {
        let entries: Vec<MoodEntry> = entries
            .into_iter()
            .map(|entry| MoodEntry {
                genre: entry.genre.trim().to_lowercase(),
                mood: entry.mood,
            })
            .collect();
        for entry in &entries {
            MoodTriple::new(entry.mood.energy, entry.mood.valence, entry.mood.danceability)?;
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry for one genre tag, if any
    #[must_use]
    pub fn lookup(&self, genre: &str) -> Option<MoodTriple> {
        let genre = genre.trim().to_lowercase();
        if let Some(exact) = self.entries.iter().find(|entry| entry.genre == genre) {
            return Some(exact.mood);
        }

        let words: Vec<&str> = genre.split_whitespace().collect();
        let mut best: Option<(&MoodEntry, usize)> = None;
        for entry in &self.entries {
            let key: Vec<&str> = entry.genre.split_whitespace().collect();
            if key.is_empty() || !words.windows(key.len()).any(|window| window == key.as_slice()) {
                continue;
            }
            let length = entry.genre.len();
            if best.map_or(true, |(_, longest)| length > longest) {
                best = Some((entry, length));
            }
        }
        best.map(|(entry, _)| entry.mood)
    }
}

/// Valence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionBin {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl EmotionBin {
    /// Bucket a valence with the four ascending cut points
    #[must_use]
    pub fn from_valence(valence: f64, cuts: &[f64; 4]) -> Self {
        match valence {
            v if v < cuts[0] => EmotionBin::VerySad,
            v if v < cuts[1] => EmotionBin::Sad,
            v if v < cuts[2] => EmotionBin::Neutral,
            v if v < cuts[3] => EmotionBin::Happy,
            _ => EmotionBin::VeryHappy,
        }
    }

    #[must_use]
    pub const fn is_extreme(self) -> bool {
        matches!(self, EmotionBin::VerySad | EmotionBin::VeryHappy)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub very_sad: usize,
    pub sad: usize,
    pub neutral: usize,
    pub happy: usize,
    pub very_happy: usize,
}

impl EmotionDistribution {
    fn add(&mut self, bin: EmotionBin) {
        match bin {
            EmotionBin::VerySad => self.very_sad += 1,
            EmotionBin::Sad => self.sad += 1,
            EmotionBin::Neutral => self.neutral += 1,
            EmotionBin::Happy => self.happy += 1,
            EmotionBin::VeryHappy => self.very_happy += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.very_sad + self.sad + self.neutral + self.happy + self.very_happy
    }

    #[must_use]
    pub const fn extremes(&self) -> usize {
        self.very_sad + self.very_happy
    }
}

/// Overall mood label from mean energy and valence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodType {
    EnergeticUpbeat,
    MellowIntrospective,
    IntenseEmotional,
    CalmHappy,
    BalancedVersatile,
}

impl MoodType {
    #[must_use]
    pub fn classify(energy: f64, valence: f64) -> Self {
        if energy > 0.7 && valence > 0.6 {
            MoodType::EnergeticUpbeat
        } else if energy < 0.4 && valence < 0.5 {
            MoodType::MellowIntrospective
        } else if energy > 0.6 && valence < 0.5 {
            MoodType::IntenseEmotional
        } else if energy < 0.5 && valence > 0.6 {
            MoodType::CalmHappy
        } else {
            MoodType::BalancedVersatile
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            MoodType::EnergeticUpbeat => "High energy, positive vibes. Party-ready playlist!",
            MoodType::MellowIntrospective => "Low energy, contemplative. Perfect for quiet moments.",
            MoodType::IntenseEmotional => "High energy but emotional. Raw and powerful music.",
            MoodType::CalmHappy => "Relaxed but positive. Feel-good, easy listening.",
            MoodType::BalancedVersatile => "Well-balanced mood profile across the spectrum.",
        }
    }
}

impl fmt::Display for MoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MoodType::EnergeticUpbeat => "Energetic & Upbeat",
            MoodType::MellowIntrospective => "Mellow & Introspective",
            MoodType::IntenseEmotional => "Intense & Emotional",
            MoodType::CalmHappy => "Calm & Happy",
            MoodType::BalancedVersatile => "Balanced & Versatile",
        };
        f.write_str(label)
    }
}

/// Weights of the emotional depth blend; they should sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthWeights {
    pub range: f64,
    pub extremes: f64,
    pub diverse_artists: f64,
}

impl Default for DepthWeights {
    fn default() -> Self {
        Self {
            range: 0.5,
            extremes: 0.3,
            diverse_artists: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    pub table: MoodTable,
    /// Ascending valence cut points between the five bins
    pub bin_cuts: [f64; 4],
    pub depth_weights: DepthWeights,
    pub artist_list_len: usize,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            table: MoodTable::default(),
            bin_cuts: [0.2, 0.4, 0.6, 0.8],
            depth_weights: DepthWeights::default(),
            artist_list_len: 10,
        }
    }
}

/// An artist whose tracks cover more than one valence bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiverseArtist {
    pub name: String,
    pub variance: f64,
    pub tracks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodProfile {
    pub mean_energy: f64,
    pub mean_valence: f64,
    pub mean_danceability: f64,
    pub emotional_range: f64,
    pub distribution: EmotionDistribution,
    pub energy_valence_correlation: f64,
    pub extreme_fraction: f64,
    pub diverse_artist_fraction: f64,
    pub emotional_depth: f64,
    pub diverse_artists: Vec<DiverseArtist>,
    pub mood_type: MoodType,
}

impl MoodProfile {
    #[must_use]
    pub fn metrics(&self) -> MetricResult {
        MetricResult::from_pairs([
            ("mean_energy", self.mean_energy),
            ("mean_valence", self.mean_valence),
            ("mean_danceability", self.mean_danceability),
            ("emotional_range", self.emotional_range),
            ("very_sad", self.distribution.very_sad as f64),
            ("sad", self.distribution.sad as f64),
            ("neutral", self.distribution.neutral as f64),
            ("happy", self.distribution.happy as f64),
            ("very_happy", self.distribution.very_happy as f64),
            ("energy_valence_correlation", self.energy_valence_correlation),
            ("extreme_fraction", self.extreme_fraction),
            ("emotionally_diverse_artists", self.diverse_artist_fraction),
            ("emotional_depth_score", self.emotional_depth),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoodAnalyzer {
    config: MoodConfig,
}

impl MoodAnalyzer {
    #[must_use]
    pub const fn new(config: MoodConfig) -> Self {
        Self { config }
    }

    /// Mood of a genre set; deterministic, neutral when nothing matches
    #[must_use]
    pub fn infer(&self, genres: &BTreeSet<String>) -> MoodTriple {
        let matched: Vec<MoodTriple> = genres.iter().filter_map(|genre| self.config.table.lookup(genre)).collect();
        if matched.is_empty() {
            return MoodTriple::NEUTRAL;
        }

        let component = |pick: fn(&MoodTriple) -> f64| {
            let values: Vec<f64> = matched.iter().map(pick).collect();
            clamp_unit(mean(&values).unwrap_or(0.5))
        };
        MoodTriple {
            energy: component(|m| m.energy),
            valence: component(|m| m.valence),
            danceability: component(|m| m.danceability),
        }
    }

    /// Mood already attached to the record, or inferred from its genres
    #[must_use]
    pub fn mood_of(&self, track: &TrackRecord) -> MoodTriple {
        track.mood.unwrap_or_else(|| self.infer(&track.genres))
    }

    /// New collection with every record carrying its inferred mood
    #[must_use]
    pub fn annotate(&self, collection: &TrackCollection) -> TrackCollection {
        let tracks: Vec<TrackRecord> = collection
            .tracks()
            .par_iter()
            .map(|track| {
                let mood = self.mood_of(track);
                track.clone().with_mood(mood)
            })
            .collect();
        TrackCollection::new(tracks)
    }

    #[must_use]
    pub fn analyze(&self, collection: &TrackCollection) -> MoodProfile {
        let moods: Vec<MoodTriple> = collection.iter().map(|track| self.mood_of(track)).collect();
        let energy: Vec<f64> = moods.iter().map(|m| m.energy).collect();
        let valence: Vec<f64> = moods.iter().map(|m| m.valence).collect();
        let dance: Vec<f64> = moods.iter().map(|m| m.danceability).collect();

        let cuts = &self.config.bin_cuts;
        let mut distribution = EmotionDistribution::default();
        for &v in &valence {
            distribution.add(EmotionBin::from_valence(v, cuts));
        }

        let emotional_range = (population_std(&valence) * 200.0).clamp(0.0, 100.0);
        let extreme_fraction = ratio(distribution.extremes(), distribution.total());
        let (diverse_artists, diverse_artist_fraction) = self.diverse_artists(collection, &valence);

        let weights = self.config.depth_weights;
        let emotional_depth = (weights.range * emotional_range
            + weights.extremes * extreme_fraction * 100.0
            + weights.diverse_artists * diverse_artist_fraction * 100.0)
            .clamp(0.0, 100.0);

        let mean_energy = mean(&energy).unwrap_or(MoodTriple::NEUTRAL.energy);
        let mean_valence = mean(&valence).unwrap_or(MoodTriple::NEUTRAL.valence);

        let profile = MoodProfile {
            mean_energy,
            mean_valence,
            mean_danceability: mean(&dance).unwrap_or(MoodTriple::NEUTRAL.danceability),
            emotional_range,
            distribution,
            energy_valence_correlation: pearson(&energy, &valence),
            extreme_fraction,
            diverse_artist_fraction,
            emotional_depth,
            diverse_artists,
            mood_type: MoodType::classify(mean_energy, mean_valence),
        };

        debug!(
            "Mood: energy {:.2}, valence {:.2}, range {:.1}, depth {:.1} ({})",
            profile.mean_energy, profile.mean_valence, profile.emotional_range, profile.emotional_depth, profile.mood_type
        );
        profile
    }

    /// Artists with more than one track, and which of them span several bins.
    ///
    /// `valence` is parallel to the collection's track order.
    fn diverse_artists(&self, collection: &TrackCollection, valence: &[f64]) -> (Vec<DiverseArtist>, f64) {
        let mut order: Vec<&str> = Vec::new();
        let mut per_artist: HashMap<&str, Vec<f64>> = HashMap::new();
        let mut names: HashMap<&str, &str> = HashMap::new();

        for (track, &v) in collection.iter().zip(valence) {
            if let Some(primary) = track.primary_artist_id() {
                names.entry(primary).or_insert(track.artist_name.as_str());
            }
            for artist in &track.artist_ids {
                let values = per_artist.entry(artist.as_str()).or_insert_with(|| {
                    order.push(artist.as_str());
                    Vec::new()
                });
                values.push(v);
            }
        }

        let repeated: Vec<&str> = order.into_iter().filter(|artist| per_artist[artist].len() > 1).collect();
        let cuts = &self.config.bin_cuts;
        let mut diverse: Vec<DiverseArtist> = repeated
            .iter()
            .filter_map(|&artist| {
                let values = &per_artist[artist];
                let bins: BTreeSet<u8> = values.iter().map(|&v| EmotionBin::from_valence(v, cuts) as u8).collect();
                (bins.len() > 1).then(|| DiverseArtist {
                    name: names.get(artist).copied().unwrap_or(artist).to_string(),
                    variance: population_variance(values),
                    tracks: values.len(),
                })
            })
            .collect();

        let fraction = ratio(diverse.len(), repeated.len());
        diverse.sort_by(|a, b| b.variance.partial_cmp(&a.variance).unwrap_or(std::cmp::Ordering::Equal));
        diverse.truncate(self.config.artist_list_len);
        (diverse, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimePeriod;

    fn genres(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|g| g.to_string()).collect()
    }

    fn track(id: &str, artist: &str, tags: &[&str]) -> TrackRecord {
        TrackRecord {
            id: id.to_string(),
            name: id.to_string(),
            artist_ids: vec![artist.to_string()],
            artist_name: artist.to_string(),
            popularity: 50,
            duration_ms: 0,
            genres: genres(tags),
            periods: BTreeSet::from([TimePeriod::ShortTerm]),
            mood: None,
        }
    }

    #[test]
    fn test_default_table_size_and_validity() {
        let table = MoodTable::default();
        assert!(table.len() >= 50);
        for &(_, e, v, d) in DEFAULT_MOODS {
            assert!(MoodTriple::new(e, v, d).is_ok());
        }
    }

    #[test]
    fn test_lookup_prefers_exact_then_longest_phrase() {
        let table = MoodTable::default();
        assert_eq!(table.lookup("k-pop").map(|m| m.energy), Some(0.85));
        assert_eq!(table.lookup("Desi Hip Hop").map(|m| m.valence), Some(0.6));
        assert_eq!(table.lookup("modern indian classical").map(|m| m.energy), Some(0.45));
        assert_eq!(table.lookup("emotional"), None);
        assert_eq!(table.lookup("vaporwave"), None);
    }

    #[test]
    fn test_empty_or_unknown_genres_are_neutral() {
        let analyzer = MoodAnalyzer::default();
        assert_eq!(analyzer.infer(&BTreeSet::new()), MoodTriple::NEUTRAL);
        assert_eq!(analyzer.infer(&genres(&["vaporwave", "zolo"])), MoodTriple::NEUTRAL);
    }

    #[test]
    fn test_inference_averages_matched_tags_only() {
        let analyzer = MoodAnalyzer::default();
        let mood = analyzer.infer(&genres(&["edm", "ambient", "vaporwave"]));
        assert!((mood.energy - 0.55).abs() < 1e-12);
        assert!((mood.valence - 0.6).abs() < 1e-12);
        assert!((mood.danceability - 0.55).abs() < 1e-12);
        assert_eq!(mood, analyzer.infer(&genres(&["edm", "ambient", "vaporwave"])));
    }

    #[test]
    fn test_substitute_table() {
        let table = MoodTable::new(vec![MoodEntry {
            genre: "polka".to_string(),
            mood: MoodTriple { energy: 1.0, valence: 1.0, danceability: 1.0 },
        }])
        .unwrap();
        let analyzer = MoodAnalyzer::new(MoodConfig { table, ..Default::default() });
        assert_eq!(analyzer.infer(&genres(&["polka"])).energy, 1.0);
        assert_eq!(analyzer.infer(&genres(&["edm"])), MoodTriple::NEUTRAL);

        let invalid = MoodTable::new(vec![MoodEntry {
            genre: "x".to_string(),
            mood: MoodTriple { energy: 2.0, valence: 0.0, danceability: 0.0 },
        }]);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_bins_use_fixed_cut_points() {
        let cuts = [0.2, 0.4, 0.6, 0.8];
        assert_eq!(EmotionBin::from_valence(0.0, &cuts), EmotionBin::VerySad);
        assert_eq!(EmotionBin::from_valence(0.2, &cuts), EmotionBin::Sad);
        assert_eq!(EmotionBin::from_valence(0.5, &cuts), EmotionBin::Neutral);
        assert_eq!(EmotionBin::from_valence(0.6, &cuts), EmotionBin::Happy);
        assert_eq!(EmotionBin::from_valence(0.8, &cuts), EmotionBin::VeryHappy);
        assert_eq!(EmotionBin::from_valence(1.0, &cuts), EmotionBin::VeryHappy);
    }

    #[test]
    fn test_empty_collection_profile() {
        let profile = MoodAnalyzer::default().analyze(&TrackCollection::default());
        assert!(profile.metrics().contains_all(KEYS));
        assert_eq!(profile.mean_energy, 0.5);
        assert_eq!(profile.mean_valence, 0.5);
        assert_eq!(profile.emotional_range, 0.0);
        assert_eq!(profile.energy_valence_correlation, 0.0);
        assert_eq!(profile.emotional_depth, 0.0);
        assert_eq!(profile.distribution.total(), 0);
        assert_eq!(profile.mood_type, MoodType::BalancedVersatile);
    }

    #[test]
    fn test_uniform_collection_has_no_spread() {
        let collection = TrackCollection::new(vec![
            track("a", "x", &["classical"]),
            track("b", "y", &["classical"]),
            track("c", "z", &["classical"]),
        ]);
        let profile = MoodAnalyzer::default().analyze(&collection);
        assert_eq!(profile.emotional_range, 0.0);
        assert_eq!(profile.energy_valence_correlation, 0.0);
        assert_eq!(profile.distribution.happy, 3);
        assert_eq!(profile.emotional_depth, 0.0);
    }

    #[test]
    fn test_emotionally_diverse_artist() {
        let collection = TrackCollection::new(vec![
            track("a", "moody", &["sad"]),
            track("b", "moody", &["disco"]),
            track("c", "steady", &["rock"]),
            track("d", "steady", &["rock"]),
            track("e", "solo", &["pop"]),
        ]);
        let profile = MoodAnalyzer::default().analyze(&collection);
        assert_eq!(profile.diverse_artists.len(), 1);
        assert_eq!(profile.diverse_artists[0].name, "moody");
        assert_eq!(profile.diverse_artists[0].tracks, 2);
        assert!((profile.diverse_artist_fraction - 0.5).abs() < 1e-12);
        assert_eq!(profile.distribution.very_sad, 0);
        assert_eq!(profile.distribution.sad, 1);
        assert_eq!(profile.distribution.very_happy, 1);
        assert!(profile.emotional_depth > 0.0 && profile.emotional_depth <= 100.0);
    }

    #[test]
    fn test_annotate_attaches_moods_without_touching_input() {
        let collection = TrackCollection::new(vec![track("a", "x", &["edm"]), track("b", "y", &[])]);
        let annotated = MoodAnalyzer::default().annotate(&collection);

        assert!(collection.iter().all(|t| t.mood.is_none()));
        assert_eq!(annotated.tracks()[0].mood.map(|m| m.energy), Some(0.9));
        assert_eq!(annotated.tracks()[1].mood, Some(MoodTriple::NEUTRAL));
        assert_eq!(
            MoodAnalyzer::default().analyze(&annotated),
            MoodAnalyzer::default().analyze(&collection)
        );
    }

    #[test]
    fn test_mood_type_bands() {
        assert_eq!(MoodType::classify(0.8, 0.7), MoodType::EnergeticUpbeat);
        assert_eq!(MoodType::classify(0.3, 0.3), MoodType::MellowIntrospective);
        assert_eq!(MoodType::classify(0.9, 0.4), MoodType::IntenseEmotional);
        assert_eq!(MoodType::classify(0.4, 0.7), MoodType::CalmHappy);
        assert_eq!(MoodType::classify(0.5, 0.5), MoodType::BalancedVersatile);
        assert_eq!(MoodType::CalmHappy.to_string(), "Calm & Happy");
    }
}
