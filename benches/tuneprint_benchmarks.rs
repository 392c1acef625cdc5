//! # Tuneprint Performance Benchmarks
//!
//! - **Normalization**: merging windows into one collection
//! - **Analyzers**: diversity, nostalgia and mood over growing collections
//! - **Full pipeline**: `analyze` end to end
//!
//! ```bash
//! cargo bench
//! cargo bench analyzers
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tuneprint::diversity::DiversityAnalyzer;
use tuneprint::mood::MoodAnalyzer;
use tuneprint::normalize::Normalizer;
use tuneprint::nostalgia::NostalgiaAnalyzer;
use tuneprint::record::{ArtistWindow, RawArtist, RawArtistRef, RawSnapshot, RawTrack, TimePeriod, TrackWindow};
use tuneprint::{analyze, EngineConfig};

const GENRES: &[&str] = &[
    "pop", "rock", "indie", "jazz", "bollywood", "edm", "classical", "hip hop", "lo-fi", "qawwali", "metal", "folk",
];

/// Snapshot with `size` tracks spread over every window and `size / 4` artists
fn create_snapshot(size: usize) -> RawSnapshot {
    let artists = (size / 4).max(1);
    let track = |i: usize| RawTrack {
        id: Some(format!("track-{i}")),
        name: Some(format!("Track {i}")),
        artists: vec![RawArtistRef::Name(format!("Artist {}", i % artists))],
        duration_ms: Some(180_000 + (i as u64 % 60) * 1_000),
        popularity: Some((i * 37 % 101) as u32),
    };

    let track_windows = TimePeriod::ALL
        .iter()
        .enumerate()
        .map(|(w, &period)| TrackWindow {
            period,
            tracks: (0..size).filter(|i| (i + w) % 3 != 0).map(track).collect(),
        })
        .collect();

    let artist_windows = vec![ArtistWindow {
        label: "medium_term".to_string(),
        artists: (0..artists)
            .map(|a| RawArtist {
                name: Some(format!("Artist {a}")),
                genres: vec![
                    GENRES[a % GENRES.len()].to_string(),
                    GENRES[(a * 7 + 3) % GENRES.len()].to_string(),
                ],
                popularity: Some(50),
                ..Default::default()
            })
            .collect(),
    }];

    RawSnapshot {
        track_windows,
        artist_windows,
    }
}

fn benchmark_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");
    let normalizer = Normalizer::default();

    for size in [100, 1_000, 5_000] {
        let snapshot = create_snapshot(size);
        group.bench_with_input(BenchmarkId::new("normalize", size), &snapshot, |b, snapshot| {
            b.iter(|| normalizer.normalize(black_box(snapshot)))
        });
    }
    group.finish();
}

fn benchmark_analyzers(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyzers");
    let diversity = DiversityAnalyzer::default();
    let nostalgia = NostalgiaAnalyzer::default();
    let mood = MoodAnalyzer::default();

    for size in [100, 1_000, 5_000] {
        let Ok(normalized) = Normalizer::default().normalize(&create_snapshot(size)) else {
            continue;
        };
        let collection = normalized.collection;

        group.bench_with_input(BenchmarkId::new("diversity", size), &collection, |b, collection| {
            b.iter(|| diversity.analyze(black_box(collection), None))
        });
        group.bench_with_input(BenchmarkId::new("nostalgia", size), &collection, |b, collection| {
            b.iter(|| nostalgia.analyze(black_box(collection)))
        });
        group.bench_with_input(BenchmarkId::new("mood", size), &collection, |b, collection| {
            b.iter(|| mood.analyze(black_box(collection)))
        });
        group.bench_with_input(BenchmarkId::new("mood_annotate", size), &collection, |b, collection| {
            b.iter(|| mood.annotate(black_box(collection)))
        });
    }
    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let config = EngineConfig::default();
    let snapshot = create_snapshot(2_000);
    c.bench_function("analyze_2000_tracks", |b| b.iter(|| analyze(black_box(&snapshot), &config)));
}

criterion_group!(benches, benchmark_normalization, benchmark_analyzers, benchmark_pipeline);
criterion_main!(benches);
