// ABOUTME: Criterion benchmarks for the search and selection hot paths
// ABOUTME: Measures rank fusion, near-duplicate collapsing, trigram scoring, and cache key hashing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the in-process parts of a search request.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_exercise_engine::cache::CacheKey;
use pierre_exercise_engine::fuzzy::trigram_similarity;
use pierre_exercise_engine::models::{
    CandidateResult, DifficultyLevel, ExerciseRecord, MatchSource, SearchRequest,
};
use pierre_exercise_engine::retrieval::dedup::collapse_near_duplicates;
use pierre_exercise_engine::search::RankFusionEngine;

const MOVEMENTS: &[&str] = &[
    "Bench Press",
    "Romanian Deadlift",
    "Overhead Press",
    "Bent Over Row",
    "Hip Thrust",
    "Calf Raise",
    "Lateral Raise",
    "Face Pull",
];

const VARIANTS: &[&str] = &["Dumbbell", "Barbell", "Cable", "Kettlebell", "Single Arm", "Incline"];

fn exercise_name(i: usize) -> String {
    format!(
        "{} {}",
        VARIANTS[i % VARIANTS.len()],
        MOVEMENTS[(i / VARIANTS.len()) % MOVEMENTS.len()]
    )
}

fn candidates(n: usize, offset: usize, source: MatchSource) -> Vec<CandidateResult> {
    (0..n)
        .map(|i| {
            let id = (i * 7 + offset) % (n * 2);
            CandidateResult::new(
                ExerciseRecord {
                    id: format!("ex-{id}"),
                    name: exercise_name(id),
                    body_part: "chest".to_owned(),
                    target_muscle: "pectorals".to_owned(),
                    secondary_muscles: vec![],
                    equipment: None,
                    difficulty: DifficultyLevel::Intermediate,
                    instructions: vec![],
                    gif_url: None,
                    video_url: None,
                    single_dumbbell_friendly: false,
                    single_kettlebell_friendly: false,
                },
                1.0 - i as f64 / n as f64,
                source,
            )
        })
        .collect()
}

fn bench_fusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion");
    let engine = RankFusionEngine::default();

    for size in [10_usize, 50, 200] {
        let fuzzy = candidates(size, 0, MatchSource::Fuzzy);
        let semantic = candidates(size, 3, MatchSource::Semantic);
        group.throughput(Throughput::Elements((size * 2) as u64));
        group.bench_with_input(BenchmarkId::new("rrf", size), &size, |b, &size| {
            b.iter(|| engine.fuse(black_box(&fuzzy), black_box(&semantic), size));
        });
    }

    group.finish();
}

fn bench_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dedup");

    for size in [20_usize, 100, 500] {
        let names: Vec<String> = (0..size).map(exercise_name).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("collapse", size), &names, |b, names| {
            b.iter(|| collapse_near_duplicates(black_box(names.clone()), String::as_str, 0.8));
        });
    }

    group.finish();
}

fn bench_trigram(c: &mut Criterion) {
    let names: Vec<String> = (0..200).map(exercise_name).collect();

    c.bench_function("trigram/score_catalog_200", |b| {
        b.iter(|| {
            names
                .iter()
                .map(|n| trigram_similarity(black_box("dumbell benchpress"), n))
                .fold(0.0_f64, f64::max)
        });
    });
}

fn bench_cache_key(c: &mut Criterion) {
    let request = SearchRequest {
        query: "  Single Arm Dumbbell ROW  ".to_owned(),
        equipment: vec!["Dumbbell".to_owned(), "bench".to_owned()],
        body_parts: vec!["back".to_owned()],
        limit: 20,
        semantic: true,
    };

    c.bench_function("cache_key/for_request", |b| {
        b.iter(|| CacheKey::for_request(black_box(&request)));
    });
}

criterion_group!(
    benches,
    bench_fusion,
    bench_dedup,
    bench_trigram,
    bench_cache_key
);
criterion_main!(benches);
