//! # Personality Vector Builder
//!
//! Folds the three analyzer profiles into a fixed seven-axis vector, a scalar
//! match score and a [`ListenerClassification`].
//!
//! | axis                  | source                                            |
//! |-----------------------|---------------------------------------------------|
//! | `mainstream_vs_indie` | `100 - mean popularity`                           |
//! | `diversity`           | normalized genre diversity                        |
//! | `nostalgia`           | `(consistency + loyalty) / 2 * 100`               |
//! | `energy`              | `mean energy * 100`                               |
//! | `emotional_depth`     | emotional depth score                             |
//! | `cultural_rootedness` | share of distinct genres hitting a keyword `* 100`|
//! | `explorer`            | `(0.5 (1 - concentration) + 0.25 resurgence + 0.25 return rate) * 100` |
//!
//! Every axis is clamped to [0, 100] and rounded. Neutral analyzer output
//! yields [`PersonalityVector::NEUTRAL`].

use crate::diversity::DiversityProfile;
use crate::error::ValidationError;
use crate::metrics::{finite_or_zero, ratio};
use crate::mood::MoodProfile;
use crate::nostalgia::NostalgiaProfile;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Vector axes, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    MainstreamVsIndie,
    Diversity,
    Nostalgia,
    Energy,
    EmotionalDepth,
    CulturalRootedness,
    Explorer,
}

impl Axis {
    pub const ALL: [Axis; 7] = [
        Axis::MainstreamVsIndie,
        Axis::Diversity,
        Axis::Nostalgia,
        Axis::Energy,
        Axis::EmotionalDepth,
        Axis::CulturalRootedness,
        Axis::Explorer,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Axis::MainstreamVsIndie => "mainstream_vs_indie",
            Axis::Diversity => "diversity",
            Axis::Nostalgia => "nostalgia",
            Axis::Energy => "energy",
            Axis::EmotionalDepth => "emotional_depth",
            Axis::CulturalRootedness => "cultural_rootedness",
            Axis::Explorer => "explorer",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Axis::MainstreamVsIndie => "Mainstream vs Indie",
            Axis::Diversity => "Diversity",
            Axis::Nostalgia => "Nostalgia",
            Axis::Energy => "Energy",
            Axis::EmotionalDepth => "Emotional Depth",
            Axis::CulturalRootedness => "Cultural Rootedness",
            Axis::Explorer => "Explorer",
        }
    }
}

/// Seven integers in [0, 100]. Serialized as a plain array; deserializing
/// an axis above 100 fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 7]", into = "[u8; 7]")]
pub struct PersonalityVector([u8; 7]);

impl TryFrom<[u8; 7]> for PersonalityVector {
    type Error = ValidationError;

    fn try_from(values: [u8; 7]) -> Result<Self, Self::Error> {
        match values.iter().position(|&v| v > 100) {
            Some(position) => Err(ValidationError::AxisOutOfRange {
                position,
                value: values[position],
            }),
            None => Ok(Self(values)),
        }
    }
}

impl From<PersonalityVector> for [u8; 7] {
    fn from(vector: PersonalityVector) -> Self {
        vector.0
    }
}

impl PersonalityVector {
    pub const NEUTRAL: PersonalityVector = PersonalityVector([50, 0, 0, 50, 0, 0, 50]);

    /// Values above 100 are clamped
    #[must_use]
    pub fn new(values: [u8; 7]) -> Self {
        Self(values.map(|v| v.min(100)))
    }

    /// Clamp to [0, 100] and round each axis value
    #[must_use]
    pub fn from_scores(scores: [f64; 7]) -> Self {
        Self(scores.map(axis_value))
    }

    #[must_use]
    pub const fn as_array(&self) -> [u8; 7] {
        self.0
    }

    #[must_use]
    pub const fn get(&self, axis: Axis) -> u8 {
        self.0[axis.index()]
    }

    pub fn axes(&self) -> impl Iterator<Item = (Axis, u8)> + '_ {
        Axis::ALL.iter().map(move |&axis| (axis, self.get(axis)))
    }

    /// Highest axis; ties go to the earlier axis
    #[must_use]
    pub fn dominant(&self) -> (Axis, u8) {
        self.axes()
            .fold((Axis::MainstreamVsIndie, 0), |best, current| if current.1 > best.1 { current } else { best })
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            mainstream_vs_indie: self.get(Axis::MainstreamVsIndie),
            diversity: self.get(Axis::Diversity),
            nostalgia: self.get(Axis::Nostalgia),
            energy: self.get(Axis::Energy),
            emotional_depth: self.get(Axis::EmotionalDepth),
            cultural_rootedness: self.get(Axis::CulturalRootedness),
            explorer: self.get(Axis::Explorer),
        }
    }

    #[must_use]
    pub fn euclidean_distance(&self, other: &PersonalityVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| (f64::from(a) - f64::from(b)).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// `100 - min(distance, 100)`
    #[must_use]
    pub fn match_percentage(&self, other: &PersonalityVector) -> f64 {
        100.0 - self.euclidean_distance(other).min(100.0)
    }

    /// 0 when either vector is all zeros
    #[must_use]
    pub fn cosine_similarity(&self, other: &PersonalityVector) -> f64 {
        let dot: f64 = self.0.iter().zip(other.0.iter()).map(|(&a, &b)| f64::from(a) * f64::from(b)).sum();
        let norm = |v: &[u8; 7]| v.iter().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();
        let (na, nb) = (norm(&self.0), norm(&other.0));
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        (dot / (na * nb)).clamp(-1.0, 1.0)
    }
}

impl Default for PersonalityVector {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Named view of a vector, in axis order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub mainstream_vs_indie: u8,
    pub diversity: u8,
    pub nostalgia: u8,
    pub energy: u8,
    pub emotional_depth: u8,
    pub cultural_rootedness: u8,
    pub explorer: u8,
}

fn axis_value(score: f64) -> u8 {
    finite_or_zero(score).clamp(0.0, 100.0).round() as u8
}

/// Per-axis weights of the match score.
///
/// Weights are non-negative and sum to 1, so the score of a valid vector
/// stays in [0, 100]. Deserializing anything else fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedWeights")]
pub struct AxisWeights {
    pub mainstream_vs_indie: f64,
    pub diversity: f64,
    pub nostalgia: f64,
    pub energy: f64,
    pub emotional_depth: f64,
    pub cultural_rootedness: f64,
    pub explorer: f64,
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            mainstream_vs_indie: 0.12,
            diversity: 0.20,
            nostalgia: 0.08,
            energy: 0.15,
            emotional_depth: 0.18,
            cultural_rootedness: 0.12,
            explorer: 0.15,
        }
    }
}

/// Serialized form of [`AxisWeights`]; omitted axes keep their default
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedWeights {
    mainstream_vs_indie: f64,
    diversity: f64,
    nostalgia: f64,
    energy: f64,
    emotional_depth: f64,
    cultural_rootedness: f64,
    explorer: f64,
}

impl Default for UncheckedWeights {
    fn default() -> Self {
        let w = AxisWeights::default();
        Self {
            mainstream_vs_indie: w.mainstream_vs_indie,
            diversity: w.diversity,
            nostalgia: w.nostalgia,
            energy: w.energy,
            emotional_depth: w.emotional_depth,
            cultural_rootedness: w.cultural_rootedness,
            explorer: w.explorer,
        }
    }
}

impl TryFrom<UncheckedWeights> for AxisWeights {
    type Error = ValidationError;

    fn try_from(w: UncheckedWeights) -> Result<Self, Self::Error> {
        Self::new([
            w.mainstream_vs_indie,
            w.diversity,
            w.nostalgia,
            w.energy,
            w.emotional_depth,
            w.cultural_rootedness,
            w.explorer,
        ])
    }
}

impl AxisWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    /// Weights in axis order.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidWeights`] if a weight is negative or not
    /// finite, or the total is not 1.
    pub fn new(weights: [f64; 7]) -> Result<Self, ValidationError> {
        let sum: f64 = weights.iter().sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(ValidationError::InvalidWeights { sum });
        }
        let [mainstream_vs_indie, diversity, nostalgia, energy, emotional_depth, cultural_rootedness, explorer] =
            weights;
        Ok(Self {
            mainstream_vs_indie,
            diversity,
            nostalgia,
            energy,
            emotional_depth,
            cultural_rootedness,
            explorer,
        })
    }

    #[must_use]
    pub const fn as_array(&self) -> [f64; 7] {
        [
            self.mainstream_vs_indie,
            self.diversity,
            self.nostalgia,
            self.energy,
            self.emotional_depth,
            self.cultural_rootedness,
            self.explorer,
        ]
    }
}

/// Three descending lower bounds splitting a 0-100 value into four tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub top: f64,
    pub high: f64,
    pub moderate: f64,
}

impl Bands {
    /// 0 for the top band through 3 for the lowest
    fn rank(&self, value: f64) -> usize {
        if value >= self.top {
            0
        } else if value >= self.high {
            1
        } else if value >= self.moderate {
            2
        } else {
            3
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityConfig {
    pub weights: AxisWeights,
    pub listener_bands: Bands,
    pub compatibility_bands: Bands,
    /// Dominant axes below this give "Balanced Listener"
    pub dominant_floor: u8,
    /// Substrings marking a genre as regional or cultural
    pub cultural_keywords: Vec<String>,
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            weights: AxisWeights::default(),
            listener_bands: Bands {
                top: 75.0,
                high: 60.0,
                moderate: 40.0,
            },
            compatibility_bands: Bands {
                top: 70.0,
                high: 55.0,
                moderate: 40.0,
            },
            dominant_floor: 60,
            cultural_keywords: [
                "bollywood",
                "hindi",
                "bangla",
                "desi",
                "indian",
                "punjabi",
                "tamil",
                "marathi",
                "telugu",
                "filmi",
                "carnatic",
                "hindustani",
                "ghazal",
                "qawwali",
                "sufi",
                "bhajan",
                "latin",
                "reggaeton",
                "flamenco",
                "afro",
                "k-pop",
                "j-pop",
                "arabic",
                "turkish",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

/// Diversity-axis tier, lowest first so `Ord` follows the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerTier {
    NicheSpecialist,
    FocusedEnthusiast,
    EclecticCurator,
    MusicalExplorer,
}

impl ListenerTier {
    #[must_use]
    pub fn from_diversity(value: u8, bands: &Bands) -> Self {
        match bands.rank(f64::from(value)) {
            0 => ListenerTier::MusicalExplorer,
            1 => ListenerTier::EclecticCurator,
            2 => ListenerTier::FocusedEnthusiast,
            _ => ListenerTier::NicheSpecialist,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            ListenerTier::MusicalExplorer => {
                "Extremely diverse taste spanning many genres and artists. Always discovering new sounds."
            }
            ListenerTier::EclecticCurator => "Well-balanced taste with good variety. Enjoys exploring but has favorites.",
            ListenerTier::FocusedEnthusiast => "Clear preferences with moderate exploration. Knows what they like.",
            ListenerTier::NicheSpecialist => "Highly focused on specific genres and artists. Deep expertise in one domain.",
        }
    }
}

impl fmt::Display for ListenerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ListenerTier::MusicalExplorer => "Musical Explorer",
            ListenerTier::EclecticCurator => "Eclectic Curator",
            ListenerTier::FocusedEnthusiast => "Focused Enthusiast",
            ListenerTier::NicheSpecialist => "Niche Specialist",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityType {
    IndieArchaeologist,
    EclecticCollector,
    TimeTraveler,
    VibeCurator,
    EmotionalWanderer,
    CulturalGuardian,
    MusicalNomad,
    BalancedListener,
}

impl PersonalityType {
    /// Label for the vector's dominant axis
    #[must_use]
    pub fn from_vector(vector: &PersonalityVector, floor: u8) -> Self {
        let (axis, value) = vector.dominant();
        if value < floor {
            return PersonalityType::BalancedListener;
        }
        match axis {
            Axis::MainstreamVsIndie => PersonalityType::IndieArchaeologist,
            Axis::Diversity => PersonalityType::EclecticCollector,
            Axis::Nostalgia => PersonalityType::TimeTraveler,
            Axis::Energy => PersonalityType::VibeCurator,
            Axis::EmotionalDepth => PersonalityType::EmotionalWanderer,
            Axis::CulturalRootedness => PersonalityType::CulturalGuardian,
            Axis::Explorer => PersonalityType::MusicalNomad,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            PersonalityType::IndieArchaeologist => {
                "Digs past the charts for hidden gems and obscure artists others have not found yet."
            }
            PersonalityType::EclecticCollector => {
                "Wonderfully unpredictable taste that ignores genre boundaries."
            }
            PersonalityType::TimeTraveler => "Finds comfort in long-standing favorites and keeps coming back to them.",
            PersonalityType::VibeCurator => "High-energy listening that knows how to set the mood.",
            PersonalityType::EmotionalWanderer => {
                "Music as an emotional outlet, moving across a wide range of feelings."
            }
            PersonalityType::CulturalGuardian => "Deep roots in regional music heritage alongside contemporary sounds.",
            PersonalityType::MusicalNomad => "Constantly exploring new artists and revisiting old ones.",
            PersonalityType::BalancedListener => {
                "Well-rounded taste that does not lean too heavily in any direction."
            }
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PersonalityType::IndieArchaeologist => "The Indie Archaeologist",
            PersonalityType::EclecticCollector => "The Eclectic Collector",
            PersonalityType::TimeTraveler => "The Time Traveler",
            PersonalityType::VibeCurator => "The Vibe Curator",
            PersonalityType::EmotionalWanderer => "The Emotional Wanderer",
            PersonalityType::CulturalGuardian => "The Cultural Guardian",
            PersonalityType::MusicalNomad => "The Musical Nomad",
            PersonalityType::BalancedListener => "The Balanced Listener",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    NichePersonality,
    ModerateCompatibility,
    HighCompatibility,
    PremiumTier,
}

impl CompatibilityTier {
    #[must_use]
    pub fn from_score(score: f64, bands: &Bands) -> Self {
        match bands.rank(score) {
            0 => CompatibilityTier::PremiumTier,
            1 => CompatibilityTier::HighCompatibility,
            2 => CompatibilityTier::ModerateCompatibility,
            _ => CompatibilityTier::NichePersonality,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            CompatibilityTier::PremiumTier => "Highly diverse, emotionally rich and adventurous taste.",
            CompatibilityTier::HighCompatibility => "Well-rounded and balanced music personality.",
            CompatibilityTier::ModerateCompatibility => {
                "Defined preferences with room for exploration. Best matched with similar tastes."
            }
            CompatibilityTier::NichePersonality => {
                "Specific and focused taste. Best matched with highly compatible listeners."
            }
        }
    }
}

impl fmt::Display for CompatibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompatibilityTier::PremiumTier => "PREMIUM TIER",
            CompatibilityTier::HighCompatibility => "HIGH COMPATIBILITY",
            CompatibilityTier::ModerateCompatibility => "MODERATE COMPATIBILITY",
            CompatibilityTier::NichePersonality => "NICHE PERSONALITY",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerClassification {
    pub listener_tier: ListenerTier,
    pub personality_type: PersonalityType,
    pub compatibility_tier: CompatibilityTier,
}

/// Scalar inputs of the builder, pulled out of the analyzer profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorInputs {
    pub mean_popularity: f64,
    pub diversity_score: f64,
    pub consistency: f64,
    pub artist_loyalty: f64,
    pub mean_energy: f64,
    pub emotional_depth: f64,
    pub cultural_fraction: f64,
    pub artist_concentration: f64,
    pub resurgence: f64,
    pub return_rate: f64,
}

impl VectorInputs {
    #[must_use]
    pub fn from_profiles(
        diversity: &DiversityProfile,
        nostalgia: &NostalgiaProfile,
        mood: &MoodProfile,
        cultural_fraction: f64,
    ) -> Self {
        Self {
            mean_popularity: diversity.mean_popularity,
            diversity_score: diversity.diversity_score,
            consistency: nostalgia.consistency,
            artist_loyalty: nostalgia.artist_loyalty,
            mean_energy: mood.mean_energy,
            emotional_depth: mood.emotional_depth,
            cultural_fraction,
            artist_concentration: diversity.artist_concentration,
            resurgence: nostalgia.resurgence,
            return_rate: nostalgia.return_rate,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VectorBuilder {
    config: PersonalityConfig,
}

impl VectorBuilder {
    #[must_use]
    pub const fn new(config: PersonalityConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn build(&self, inputs: &VectorInputs) -> PersonalityVector {
        let explorer = 0.5 * (1.0 - inputs.artist_concentration) + 0.25 * inputs.resurgence + 0.25 * inputs.return_rate;
        let vector = PersonalityVector::from_scores([
            100.0 - inputs.mean_popularity,
            inputs.diversity_score,
            (inputs.consistency + inputs.artist_loyalty) / 2.0 * 100.0,
            inputs.mean_energy * 100.0,
            inputs.emotional_depth,
            inputs.cultural_fraction * 100.0,
            explorer * 100.0,
        ]);
        debug!("Personality vector {:?}", vector.as_array());
        vector
    }

    /// Weighted sum of the axes, in [0, 100]
    #[must_use]
    pub fn score(&self, vector: &PersonalityVector) -> f64 {
        let weights = self.config.weights.as_array();
        let sum: f64 = vector
            .as_array()
            .iter()
            .zip(weights.iter())
            .map(|(&value, weight)| f64::from(value) * weight)
            .sum();
        finite_or_zero(sum).clamp(0.0, 100.0)
    }

    #[must_use]
    pub fn classify(&self, vector: &PersonalityVector, score: f64) -> ListenerClassification {
        ListenerClassification {
            listener_tier: ListenerTier::from_diversity(vector.get(Axis::Diversity), &self.config.listener_bands),
            personality_type: PersonalityType::from_vector(vector, self.config.dominant_floor),
            compatibility_tier: CompatibilityTier::from_score(score, &self.config.compatibility_bands),
        }
    }

    /// Share of distinct genres containing any cultural keyword
    #[must_use]
    pub fn cultural_fraction<'a>(&self, genres: impl IntoIterator<Item = &'a String>) -> f64 {
        let distinct: BTreeSet<&str> = genres.into_iter().map(String::as_str).collect();
        let cultural = distinct
            .iter()
            .filter(|genre| {
                self.config
                    .cultural_keywords
                    .iter()
                    .any(|keyword| genre.contains(keyword.as_str()))
            })
            .count();
        ratio(cultural, distinct.len())
    }
}
