//! # Reporting
//!
//! Renders an [`Analysis`] for people and for other programs:
//!
//! - [`MatchDocument`]: the compact JSON used to compare two listeners. Its
//!   keys are stable; downstream matchers read them by name.
//! - [`render_report`]: a plain-text summary with bar charts.
//! - [`render_comparison`]: similarity of two match documents.

use crate::analysis::Analysis;
use crate::metrics::MetricResult;
use crate::personality::{Axis, Dimensions, PersonalityVector};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDocument {
    pub music_personality_score: u32,
    pub personality_type: String,
    pub compatibility_tier: String,
    pub listener_tier: String,
    pub vector: PersonalityVector,
    pub dimensions: Dimensions,
    pub top_genre: String,
    pub top_artist: String,
    pub avg_popularity: f64,
    pub total_artists: usize,
}

impl MatchDocument {
    #[must_use]
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let highlights = &analysis.highlights;
        Self {
            music_personality_score: analysis.display_score(),
            personality_type: analysis.classification.personality_type.to_string(),
            compatibility_tier: analysis.classification.compatibility_tier.to_string(),
            listener_tier: analysis.classification.listener_tier.to_string(),
            vector: analysis.vector,
            dimensions: analysis.vector.dimensions(),
            top_genre: highlights.top_genre.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            top_artist: highlights.top_artist.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            avg_popularity: (highlights.avg_popularity * 100.0).round() / 100.0,
            total_artists: highlights.total_artists,
        }
    }

    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize match document")?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write match document to {}", path.display()))?;
        info!("Match document written to {}", path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a match document.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read match document {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid match document {}", path.display()))
    }
}

/// `width` cells, filled in proportion to `value` out of 100
#[must_use]
pub fn bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * width as f64) as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn metric(result: &MetricResult, key: &str) -> f64 {
    result.get(key).unwrap_or(0.0)
}

#[must_use]
pub fn render_report(analysis: &Analysis) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let h = &analysis.highlights;
    let c = &analysis.classification;

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{rule}\nMUSIC PERSONALITY REPORT\n{rule}");

    let _ = writeln!(out, "\nDATA SUMMARY");
    for (period, count) in &h.window_counts {
        let _ = writeln!(out, "  {:<12} {count}", period.as_str());
    }
    let _ = writeln!(out, "  unique tracks {}  artists {}", h.unique_tracks, h.total_artists);
    let _ = writeln!(out, "  listening time {:.0} min", h.total_duration_minutes);
    if h.skipped_tracks > 0 {
        let _ = writeln!(out, "  skipped {} tracks without id", h.skipped_tracks);
    }
    if let Some(period) = h.focus_period {
        let _ = writeln!(out, "  focused on {period}");
    }

    let _ = writeln!(out, "\nLISTENER TYPE: {}", c.listener_tier);
    let _ = writeln!(out, "  {}", c.listener_tier.description());

    let d = &analysis.diversity;
    let _ = writeln!(out, "\nDIVERSITY");
    let _ = writeln!(
        out,
        "  genre diversity {:>5.1}/100 {}",
        metric(d, "genre_diversity_score"),
        bar(metric(d, "genre_diversity_score"), 30)
    );
    let _ = writeln!(
        out,
        "  {} genres ({:.2} bits), {} artists ({:.2} bits)",
        metric(d, "unique_genres"),
        metric(d, "genre_entropy"),
        metric(d, "unique_artists"),
        metric(d, "artist_entropy")
    );
    let _ = writeln!(out, "  top-10 artist share {:.1}%", metric(d, "artist_concentration") * 100.0);
    let _ = writeln!(
        out,
        "  popularity {:.1} ± {:.1} (range {:.0})",
        metric(d, "mean_popularity"),
        metric(d, "popularity_std"),
        metric(d, "popularity_range")
    );
    if !h.top_genres.is_empty() {
        let genres: Vec<String> = h.top_genres.iter().take(5).map(|(g, n)| format!("{g} ({n})")).collect();
        let _ = writeln!(out, "  top genres: {}", genres.join(", "));
    }

    let n = &analysis.nostalgia;
    let _ = writeln!(out, "\nNOSTALGIA & LOYALTY");
    for (label, key) in [
        ("consistency", "consistency_score"),
        ("return rate", "return_rate"),
        ("artist loyalty", "artist_loyalty"),
        ("resurgence", "resurgence_score"),
    ] {
        let value = metric(n, key) * 100.0;
        let _ = writeln!(out, "  {label:<15} {value:>5.1}% {}", bar(value, 30));
    }
    if !h.loyal_artists.is_empty() {
        let _ = writeln!(out, "  loyal to: {}", h.loyal_artists.join(", "));
    }
    if !h.resurgent_artists.is_empty() {
        let _ = writeln!(out, "  back in rotation: {}", h.resurgent_artists.join(", "));
    }

    let m = &analysis.mood;
    let _ = writeln!(out, "\nEMOTIONAL PROFILE: {}", h.mood_type);
    let _ = writeln!(out, "  {}", h.mood_type.description());
    let _ = writeln!(
        out,
        "  energy {:.2}  valence {:.2}  danceability {:.2}",
        metric(m, "mean_energy"),
        metric(m, "mean_valence"),
        metric(m, "mean_danceability")
    );
    let _ = writeln!(
        out,
        "  range {:.1}/100, depth {:.1}/100, energy/valence r = {:+.2}",
        metric(m, "emotional_range"),
        metric(m, "emotional_depth_score"),
        metric(m, "energy_valence_correlation")
    );
    let _ = writeln!(
        out,
        "  very sad {} | sad {} | neutral {} | happy {} | very happy {}",
        metric(m, "very_sad"),
        metric(m, "sad"),
        metric(m, "neutral"),
        metric(m, "happy"),
        metric(m, "very_happy")
    );
    for artist in h.emotionally_diverse_artists.iter().take(5) {
        let _ = writeln!(
            out,
            "  {} spans moods ({} tracks, variance {:.3})",
            artist.name, artist.tracks, artist.variance
        );
    }

    let _ = writeln!(out, "\nPERSONALITY VECTOR");
    for (axis, value) in analysis.vector.axes() {
        let _ = writeln!(out, "  {:<20} {:>3} {}", axis.label(), value, bar(f64::from(value), 40));
    }

    let _ = writeln!(out, "\n{}", c.personality_type);
    let _ = writeln!(out, "  {}", c.personality_type.description());
    let _ = writeln!(out, "\nMUSIC PERSONALITY SCORE: {}/100", analysis.display_score());
    let _ = writeln!(out, "  {}", bar(analysis.score, 50));
    let _ = writeln!(out, "  {}: {}", c.compatibility_tier, c.compatibility_tier.description());
    let _ = writeln!(out, "{rule}");

    out
}

#[must_use]
pub fn render_comparison(a: &MatchDocument, b: &MatchDocument) -> String {
    let mut out = String::new();
    let (va, vb) = (&a.vector, &b.vector);

    let _ = writeln!(out, "{:<20} {:>5} {:>5}", "", "A", "B");
    for axis in Axis::ALL {
        let _ = writeln!(out, "{:<20} {:>5} {:>5}", axis.label(), va.get(axis), vb.get(axis));
    }
    let _ = writeln!(out, "{:<20} {:>5} {:>5}", "Score", a.music_personality_score, b.music_personality_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "euclidean distance  {:.2}", va.euclidean_distance(vb));
    let _ = writeln!(out, "cosine similarity   {:.3}", va.cosine_similarity(vb));
    let _ = writeln!(out, "match               {:.1}%", va.match_percentage(vb));
    out
}
