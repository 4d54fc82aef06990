// ABOUTME: Exercise name normalization and near-duplicate collapsing
// ABOUTME: Token-set equality, subset, or overlap above a threshold marks two names as duplicates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

const GENDER_TOKENS: &[&str] = &["male", "female", "men", "women", "mens", "womens"];

const VERSION_TOKENS: &[&str] = &["ver", "version", "variation", "variant"];

const FILLER_TOKENS: &[&str] = &[
    "a", "an", "the", "with", "on", "and", "of", "to", "using", "exercise", "style",
];

fn is_number(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
}

fn is_noise(token: &str) -> bool {
    GENDER_TOKENS.contains(&token)
        || VERSION_TOKENS.contains(&token)
        || FILLER_TOKENS.contains(&token)
        || is_number(token)
        // "v2", "v10"
        || (token.len() > 1 && token.starts_with('v') && is_number(&token[1..]))
}

fn singular(token: &str) -> String {
    if token.len() > 2 && token.ends_with('s') && !token.ends_with("ss") {
        token[..token.len() - 1].to_owned()
    } else {
        token.to_owned()
    }
}

/// Ordered meaningful tokens of a name
///
/// A lone `v` is a version marker only when a number follows ("v. 2");
/// otherwise it is part of the name ("V-Up").
#[must_use]
pub fn name_tokens(name: &str) -> Vec<String> {
    let lowered = name.to_lowercase();
    let raw: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    raw.iter()
        .enumerate()
        .filter(|&(i, &token)| {
            let version_marker =
                token == "v" && raw.get(i + 1).is_some_and(|next| is_number(next));
            !version_marker && !is_noise(token)
        })
        .map(|(_, &token)| singular(token))
        .collect()
}

/// Canonical form used for containment checks ("Push-Ups (Male) v2" -> "push up")
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name_tokens(name).join(" ")
}

/// Token set of a name
#[must_use]
pub fn token_set(name: &str) -> BTreeSet<String> {
    name_tokens(name).into_iter().collect()
}

/// Whether two token sets describe the same exercise
#[must_use]
pub fn is_near_duplicate(a: &BTreeSet<String>, b: &BTreeSet<String>, threshold: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    if a == b || a.is_subset(b) || b.is_subset(a) {
        return true;
    }
    let overlap = a.intersection(b).count() as f64;
    let smaller = a.len().min(b.len()) as f64;
    overlap / smaller >= threshold
}

/// Whether two names are near duplicates
#[must_use]
pub fn names_near_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    is_near_duplicate(&token_set(a), &token_set(b), threshold)
}

/// Keep the first-seen instance of every near-duplicate group, preserving order
///
/// Idempotent: every kept item was already checked against all earlier kept items.
pub fn collapse_near_duplicates<T, F>(items: Vec<T>, name_of: F, threshold: f64) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut kept_sets: Vec<BTreeSet<String>> = Vec::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        let tokens = token_set(name_of(&item));
        if kept_sets
            .iter()
            .any(|existing| is_near_duplicate(existing, &tokens, threshold))
        {
            continue;
        }
        kept_sets.push(tokens);
        kept.push(item);
    }
    kept
}

/// Whether `name` should be dropped because of an avoid-list entry
#[must_use]
pub fn is_avoided(name: &str, avoid: &[String], threshold: f64) -> bool {
    // Pad so containment only matches whole tokens ("row" must not hit "narrow")
    let normalized = format!(" {} ", normalize_name(name));
    let tokens = token_set(name);
    avoid.iter().any(|entry| {
        let entry_normalized = normalize_name(entry);
        !entry_normalized.is_empty()
            && (normalized.contains(&format!(" {entry_normalized} "))
                || is_near_duplicate(&tokens, &token_set(entry), threshold))
    })
}
