//! # Nostalgia Analyzer
//!
//! Compares what a listener played over the long term with what they play now.
//!
//! All four scores are fractions in [0, 1] computed over identity sets, so
//! repeated entries inside one window never count twice:
//!
//! - **consistency**: overlap of long-term and short-term track ids,
//!   `|L ∩ S| / min(|L|, |S|)`. 1.0 whenever one window contains the other,
//!   0.0 for disjoint windows or an empty long-term window.
//! - **return rate**: share of recently played tracks that are long-term
//!   favorites.
//! - **artist loyalty**: share of distinct long-term artists that also show
//!   up short-term, `|L ∩ S| / |L|`. A short window crediting only a few
//!   artists cannot push it toward 1.
//! - **resurgence**: artists present long-term, missing from medium-term and
//!   back in short-term or recent plays, divided by all distinct artists.
//!   Without a medium-term window nothing can be called dropped, so the score
//!   is 0.
//!
//! When the short-term window is empty the medium-term window stands in for it.
//! That substitution is a product heuristic and can be switched off with
//! [`NostalgiaConfig::medium_fallback`].

use crate::metrics::{clamp_unit, ratio, MetricResult};
use crate::normalize::TrackCollection;
use crate::record::{TimePeriod, TrackRecord};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Keys present in every nostalgia [`MetricResult`]
pub const KEYS: &[&str] = &[
    "consistency_score",
    "return_rate",
    "artist_loyalty",
    "resurgence_score",
    "loyal_artist_count",
    "resurgent_artist_count",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NostalgiaConfig {
    /// Use the medium-term window when the short-term window is empty
    pub medium_fallback: bool,
    /// Longest artist name list kept in the profile
    pub artist_list_len: usize,
}

impl Default for NostalgiaConfig {
    fn default() -> Self {
        Self {
            medium_fallback: true,
            artist_list_len: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NostalgiaProfile {
    pub consistency: f64,
    pub return_rate: f64,
    pub artist_loyalty: f64,
    pub resurgence: f64,
    /// Window that played the "short-term" role, `None` when nothing did
    pub short_source: Option<TimePeriod>,
    pub loyal_artists: Vec<String>,
    pub resurgent_artists: Vec<String>,
    loyal_artist_count: usize,
    resurgent_artist_count: usize,
}

impl NostalgiaProfile {
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            consistency: 0.0,
            return_rate: 0.0,
            artist_loyalty: 0.0,
            resurgence: 0.0,
            short_source: None,
            loyal_artists: Vec::new(),
            resurgent_artists: Vec::new(),
            loyal_artist_count: 0,
            resurgent_artist_count: 0,
        }
    }

    #[must_use]
    pub fn metrics(&self) -> MetricResult {
        MetricResult::from_pairs([
            ("consistency_score", self.consistency),
            ("return_rate", self.return_rate),
            ("artist_loyalty", self.artist_loyalty),
            ("resurgence_score", self.resurgence),
            ("loyal_artist_count", self.loyal_artist_count as f64),
            ("resurgent_artist_count", self.resurgent_artist_count as f64),
        ])
    }
}

/// Track and artist identities seen in one window, in first-seen order
#[derive(Debug, Default)]
struct WindowSets<'a> {
    tracks: HashSet<&'a str>,
    artists: Vec<&'a str>,
    artist_set: HashSet<&'a str>,
}

impl<'a> WindowSets<'a> {
    fn collect(records: &[&'a TrackRecord]) -> Self {
        let mut sets = WindowSets::default();
        for &track in records {
            sets.tracks.insert(track.id.as_str());
            for artist in &track.artist_ids {
                if sets.artist_set.insert(artist.as_str()) {
                    sets.artists.push(artist.as_str());
                }
            }
        }
        sets
    }

    fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NostalgiaAnalyzer {
    config: NostalgiaConfig,
}

impl NostalgiaAnalyzer {
    #[must_use]
    pub const fn new(config: NostalgiaConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn analyze(&self, collection: &TrackCollection) -> NostalgiaProfile {
        let window = |period| collection.in_period(period);
        let long_records = window(TimePeriod::LongTerm);
        let medium_records = window(TimePeriod::MediumTerm);
        let short_records = window(TimePeriod::ShortTerm);
        let recent_records = window(TimePeriod::Recent);

        let long = WindowSets::collect(&long_records);
        let medium = WindowSets::collect(&medium_records);
        let short = WindowSets::collect(&short_records);
        let recent = WindowSets::collect(&recent_records);

        let (current, short_source) = if !short.is_empty() {
            (&short, Some(TimePeriod::ShortTerm))
        } else if self.config.medium_fallback && !medium.is_empty() {
            debug!("Short-term window empty, comparing against medium-term");
            (&medium, Some(TimePeriod::MediumTerm))
        } else {
            (&short, None)
        };

        if long.is_empty() && current.is_empty() {
            debug!("No long-term or short-term tracks, nostalgia is neutral");
            return NostalgiaProfile::neutral();
        }

        let names = display_names(collection);
        let name_of = |id: &str| names.get(id).copied().unwrap_or(id).to_string();

        let loyal: Vec<&str> = long
            .artists
            .iter()
            .copied()
            .filter(|artist| current.artist_set.contains(artist))
            .collect();

        let resurgent: Vec<&str> = if medium.is_empty() {
            Vec::new()
        } else {
            long.artists
                .iter()
                .copied()
                .filter(|artist| !medium.artist_set.contains(artist))
                .filter(|artist| short.artist_set.contains(artist) || recent.artist_set.contains(artist))
                .collect()
        };

        let all_artists: HashSet<&str> = [&long, &medium, &short, &recent]
            .iter()
            .flat_map(|sets| sets.artist_set.iter().copied())
            .collect();

        let returning = recent.tracks.iter().filter(|id| long.tracks.contains(*id)).count();

        let profile = NostalgiaProfile {
            consistency: overlap(&long.tracks, &current.tracks),
            return_rate: clamp_unit(ratio(returning, recent.tracks.len())),
            artist_loyalty: clamp_unit(ratio(loyal.len(), long.artists.len())),
            resurgence: clamp_unit(ratio(resurgent.len(), all_artists.len())),
            short_source,
            loyal_artists: loyal.iter().take(self.config.artist_list_len).map(|&id| name_of(id)).collect(),
            resurgent_artists: resurgent.iter().take(self.config.artist_list_len).map(|&id| name_of(id)).collect(),
            loyal_artist_count: loyal.len(),
            resurgent_artist_count: resurgent.len(),
        };

        debug!(
            "Nostalgia: consistency {:.3}, return {:.3}, loyalty {:.3}, resurgence {:.3}",
            profile.consistency, profile.return_rate, profile.artist_loyalty, profile.resurgence
        );
        profile
    }
}

/// `|a ∩ b| / min(|a|, |b|)`, 0 when either side is empty
#[must_use]
pub fn overlap(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let shared = a.intersection(b).count();
    clamp_unit(ratio(shared, a.len().min(b.len())))
}

fn display_names(collection: &TrackCollection) -> HashMap<&str, &str> {
    let mut names = HashMap::new();
    for track in collection {
        if let Some(id) = track.primary_artist_id() {
            names.entry(id).or_insert(track.artist_name.as_str());
        }
    }
    names
}
