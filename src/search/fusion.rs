// ABOUTME: Weighted Reciprocal Rank Fusion of fuzzy and semantic result lists
// ABOUTME: Scores normalize to [0, 1] by batch max; single-source batches use rank pseudo-scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::FusionConfig;
use crate::models::{CandidateResult, ExerciseRecord, MatchSource};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// One fused result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedResult {
    /// The exercise
    pub record: ExerciseRecord,
    /// Normalized score in `[0, 1]`
    pub score: f64,
    /// Unnormalized fused score
    #[serde(skip)]
    pub raw_score: f64,
    /// Sources that returned the exercise, fuzzy first
    pub sources: Vec<MatchSource>,
}

#[derive(Debug)]
struct Accumulator<'a> {
    record: &'a ExerciseRecord,
    fuzzy_rank: Option<usize>,
    semantic_rank: Option<usize>,
    raw: f64,
}

impl Accumulator<'_> {
    fn sources(&self) -> Vec<MatchSource> {
        let mut sources = Vec::with_capacity(2);
        if self.fuzzy_rank.is_some() {
            sources.push(MatchSource::Fuzzy);
        }
        if self.semantic_rank.is_some() {
            sources.push(MatchSource::Semantic);
        }
        sources
    }
}

/// First occurrence of each id, in list order
fn first_occurrences(list: &[CandidateResult]) -> Vec<&CandidateResult> {
    let mut seen = HashSet::with_capacity(list.len());
    list.iter().filter(|c| seen.insert(c.id())).collect()
}

/// Merges ranked lists from the fuzzy and semantic sources
#[derive(Debug, Clone, Copy, Default)]
pub struct RankFusionEngine {
    config: FusionConfig,
}

impl RankFusionEngine {
    /// Engine with the given `k` and weights
    #[must_use]
    pub const fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    /// Fuse two best-first lists into at most `min(limit, max(len(fuzzy), len(semantic)))` results
    #[must_use]
    pub fn fuse(
        &self,
        fuzzy: &[CandidateResult],
        semantic: &[CandidateResult],
        limit: usize,
    ) -> Vec<FusedResult> {
        let fuzzy = first_occurrences(fuzzy);
        let semantic = first_occurrences(semantic);
        let cap = limit.min(fuzzy.len().max(semantic.len()));
        if cap == 0 {
            return Vec::new();
        }

        match (fuzzy.is_empty(), semantic.is_empty()) {
            (false, true) => Self::single_source(&fuzzy, MatchSource::Fuzzy, cap),
            (true, false) => Self::single_source(&semantic, MatchSource::Semantic, cap),
            _ => self.reciprocal_rank(&fuzzy, &semantic, cap),
        }
    }

    /// `(n - rank + 1) / n` for each item of the only non-empty list
    fn single_source(list: &[&CandidateResult], source: MatchSource, cap: usize) -> Vec<FusedResult> {
        let n = list.len() as f64;
        list.iter()
            .take(cap)
            .enumerate()
            .map(|(i, c)| {
                let score = (n - i as f64) / n;
                FusedResult {
                    record: c.record.clone(),
                    score,
                    raw_score: score,
                    sources: vec![source],
                }
            })
            .collect()
    }

    fn reciprocal_rank(
        &self,
        fuzzy: &[&CandidateResult],
        semantic: &[&CandidateResult],
        cap: usize,
    ) -> Vec<FusedResult> {
        let k = self.config.k;
        let mut order: Vec<Accumulator<'_>> = Vec::with_capacity(fuzzy.len() + semantic.len());
        let mut position: HashMap<&str, usize> = HashMap::with_capacity(order.capacity());

        for (source, list, weight) in [
            (MatchSource::Fuzzy, fuzzy, self.config.fuzzy_weight),
            (MatchSource::Semantic, semantic, self.config.semantic_weight),
        ] {
            for (i, candidate) in list.iter().enumerate() {
                let rank = i + 1;
                let slot = *position.entry(candidate.id()).or_insert_with(|| {
                    order.push(Accumulator {
                        record: &candidate.record,
                        fuzzy_rank: None,
                        semantic_rank: None,
                        raw: 0.0,
                    });
                    order.len() - 1
                });
                let acc = &mut order[slot];
                acc.raw += weight / (k + rank as f64);
                match source {
                    MatchSource::Fuzzy => acc.fuzzy_rank = Some(rank),
                    MatchSource::Semantic => acc.semantic_rank = Some(rank),
                }
            }
        }

        order.sort_by(|a, b| {
            b.raw
                .total_cmp(&a.raw)
                .then_with(|| rank_order(a.fuzzy_rank, b.fuzzy_rank))
                .then_with(|| rank_order(a.semantic_rank, b.semantic_rank))
                .then_with(|| a.record.name.cmp(&b.record.name))
        });
        order.truncate(cap);

        let max = order.first().map_or(0.0, |a| a.raw);
        order
            .into_iter()
            .map(|acc| FusedResult {
                score: if max > 0.0 { acc.raw / max } else { 0.0 },
                raw_score: acc.raw,
                sources: acc.sources(),
                record: acc.record.clone(),
            })
            .collect()
    }
}

/// Present ranks sort before absent ones, lower first
fn rank_order(a: Option<usize>, b: Option<usize>) -> Ordering {
    a.unwrap_or(usize::MAX).cmp(&b.unwrap_or(usize::MAX))
}
