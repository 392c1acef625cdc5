//! Music personality profiles from listening history.
//!
//! Core modules:
//! - [`normalize`] - Raw snapshot to deduplicated track collection
//! - [`diversity`] - Genre/artist entropy, concentration, popularity spread
//! - [`nostalgia`] - Long-term vs short-term overlap, loyalty, resurgence
//! - [`mood`] - Genre-inferred energy/valence/danceability and emotional spread
//! - [`personality`] - Seven-axis vector, match score and classification
//! - [`analysis`] - The [`analyze`] entry point tying them together
//!
//! ### Supporting Modules
//!
//! - [`record`] - Raw payload and normalized record types
//! - [`metrics`] - Metric maps and shared statistics helpers
//! - [`config`] - [`EngineConfig`] and its loading
//! - [`snapshot`] - Reading snapshot directories from disk
//! - [`report`] - Match document and text report
//! - [`cli`] / [`completion`] - Command-line definitions
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use std::path::Path;
//! use tuneprint::{analyze, snapshot, EngineConfig};
//!
//! let raw = snapshot::load_snapshot(Path::new("./data"))?;
//! let analysis = analyze(&raw, &EngineConfig::default())?;
//!
//! println!("vector {:?}", analysis.vector.as_array());
//! println!("{} / {}", analysis.classification.personality_type, analysis.classification.compatibility_tier);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Guarantees
//!
//! - Empty input is a status, not an error: every metric key is present and
//!   the vector is [`PersonalityVector::NEUTRAL`].
//! - Zero-spread statistics are 0, never NaN.
//! - Results depend only on the snapshot and the config. Analyzers run in
//!   parallel, but every reduction is sequential and order-stable.
//! - Malformed records (missing ids, popularity above 100) are rejected with a
//!   [`ValidationError`].

pub mod analysis;
pub mod cli;
pub mod completion;
pub mod config;
pub mod diversity;
pub mod error;
pub mod metrics;
pub mod mood;
pub mod normalize;
pub mod nostalgia;
pub mod personality;
pub mod record;
pub mod report;
pub mod snapshot;

pub use analysis::{analyze, Analysis, Highlights};
pub use config::EngineConfig;
pub use error::{SnapshotError, ValidationError};
pub use metrics::MetricResult;
pub use normalize::{InputStatus, TrackCollection};
pub use personality::{ListenerClassification, PersonalityVector};
pub use record::{MoodTriple, RawSnapshot, TimePeriod, TrackRecord};
