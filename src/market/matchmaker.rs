//! Matchup selection over the seeded asset catalog.
//!
//! Two selectors share the same fairness rules (tier adjacency, range overlap
//! at tier distance one, cooldown and open-pair exclusion, same-gender
//! preference): [`select_candidate_pair`] enumerates single-asset pairs
//! exhaustively, while [`select_candidate_matchup`] generalizes to bundles of
//! configurable side sizes via bounded rejection sampling. The engine drives
//! the bundled selector; the pairwise one is kept as the simple 1v1 path.
//!
//! Both take the RNG as an explicit parameter so tests can seed it.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::market::bundle::{canonical_pair_key, Bundle};
use crate::market::catalog::SeedRow;

/// A side-size shape such as 1v1 or 2v2, order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchupMode {
    left: usize,
    right: usize,
}

impl MatchupMode {
    /// Parses `"<n>v<m>"`, e.g. `1v1` or `2v1`.
    pub fn parse(token: &str) -> Option<MatchupMode> {
        let (left, right) = token.trim().to_ascii_lowercase().split_once('v').map(
            |(l, r)| (l.parse::<usize>().ok(), r.parse::<usize>().ok()),
        )?;
        Some(MatchupMode { left: left?, right: right? })
    }

    fn matches(&self, left: usize, right: usize) -> bool {
        (self.left == left && self.right == right)
            || (self.left == right && self.right == left)
    }
}

/// Tunable selection policy for the bundled selector.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    /// Prefer matchups where both sides share one gender; mixed-gender
    /// matchups are the fallback, not an error.
    pub prefer_same_gender: bool,
    /// Side sizes the sampler may draw, each capped by `max_side_size`.
    pub side_size_options: Vec<usize>,
    pub max_side_size: usize,
    /// When set, only matchups of these shapes are accepted.
    pub modes: Option<Vec<MatchupMode>>,
    /// Rejection-sampling budget per gender pass.
    pub max_attempts: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy {
            prefer_same_gender: true,
            side_size_options: vec![1, 2],
            max_side_size: 2,
            modes: None,
            max_attempts: 1500,
        }
    }
}

/// A selected matchup. Left/right here is arbitrary; the poster flips a coin
/// before publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub left: Bundle,
    pub right: Bundle,
    /// True when the same-gender pass found nothing and the selection came
    /// from the unconstrained fallback pass.
    pub used_fallback_gender: bool,
}

impl Matchup {
    pub fn pair_key(&self) -> String {
        canonical_pair_key(&self.left.key(), &self.right.key())
    }
}

fn tiers_compatible(a: &Bundle, b: &Bundle) -> bool {
    let (ta, tb) = (a.tier_index(), b.tier_index());
    let distance = ta.abs_diff(tb);
    if distance > 1 {
        return false;
    }
    if distance == 1 {
        // Adjacent tiers must still overlap numerically to be a fair ask.
        return a.max_x.min(b.max_x) > a.min_x.max(b.min_x);
    }
    true
}

fn pair_blocked(
    pair_key: &str,
    open_pairs: &HashSet<String>,
    cooldowns: &HashMap<String, DateTime<Utc>>,
) -> bool {
    open_pairs.contains(pair_key) || cooldowns.contains_key(pair_key)
}

/// Enumerates all unordered single-asset pairs and samples one uniformly.
///
/// The simple 1v1 selector: every eligible pair is considered, bucketed into
/// same-gender and mixed-gender, and one is drawn at random from the
/// preferred bucket (or the union as fallback).
pub fn select_candidate_pair<R: Rng>(
    rows: &[SeedRow],
    open_pairs: &HashSet<String>,
    cooldowns: &HashMap<String, DateTime<Utc>>,
    prefer_same_gender: bool,
    rng: &mut R,
) -> Option<Matchup> {
    let mut same_gender: Vec<(usize, usize)> = Vec::new();
    let mut mixed_gender: Vec<(usize, usize)> = Vec::new();

    for i in 0..rows.len() {
        for j in (i + 1)..rows.len() {
            let left = Bundle::from_rows(&[&rows[i]]);
            let right = Bundle::from_rows(&[&rows[j]]);
            if !tiers_compatible(&left, &right) {
                continue;
            }
            let pair_key = canonical_pair_key(&left.key(), &right.key());
            if pair_blocked(&pair_key, open_pairs, cooldowns) {
                continue;
            }
            if rows[i].gender == rows[j].gender {
                same_gender.push((i, j));
            } else {
                mixed_gender.push((i, j));
            }
        }
    }

    let (pool, used_fallback_gender) = if prefer_same_gender && !same_gender.is_empty() {
        (same_gender, false)
    } else {
        let fallback = prefer_same_gender && !mixed_gender.is_empty();
        same_gender.extend(mixed_gender);
        (same_gender, fallback)
    };

    if pool.is_empty() {
        return None;
    }
    let (i, j) = pool[rng.random_range(0..pool.len())];
    Some(Matchup {
        left: Bundle::from_rows(&[&rows[i]]),
        right: Bundle::from_rows(&[&rows[j]]),
        used_fallback_gender,
    })
}

/// Selects a bundled matchup by bounded rejection sampling.
///
/// Runs a strict same-gender pass first when preferred, then an
/// unconstrained pass; returns `None` when every pass exhausts its attempt
/// budget. Callers treat `None` as "skip this cycle", never as an error.
pub fn select_candidate_matchup<R: Rng>(
    rows: &[SeedRow],
    open_pairs: &HashSet<String>,
    cooldowns: &HashMap<String, DateTime<Utc>>,
    policy: &MatchPolicy,
    rng: &mut R,
) -> Option<Matchup> {
    let sizes: Vec<usize> = policy
        .side_size_options
        .iter()
        .copied()
        .filter(|&s| s >= 1 && s <= policy.max_side_size)
        .collect();
    if sizes.is_empty() || rows.len() < 2 {
        return None;
    }

    let passes: &[bool] = if policy.prefer_same_gender { &[true, false] } else { &[false] };
    for &strict_gender in passes {
        if let Some((left, right)) =
            sample_pass(rows, open_pairs, cooldowns, policy, &sizes, strict_gender, rng)
        {
            return Some(Matchup {
                left,
                right,
                used_fallback_gender: policy.prefer_same_gender && !strict_gender,
            });
        }
    }
    None
}

fn sample_pass<R: Rng>(
    rows: &[SeedRow],
    open_pairs: &HashSet<String>,
    cooldowns: &HashMap<String, DateTime<Utc>>,
    policy: &MatchPolicy,
    sizes: &[usize],
    strict_gender: bool,
    rng: &mut R,
) -> Option<(Bundle, Bundle)> {
    for _ in 0..policy.max_attempts {
        let left_size = sizes[rng.random_range(0..sizes.len())];
        let right_size = sizes[rng.random_range(0..sizes.len())];

        if let Some(modes) = &policy.modes {
            if !modes.iter().any(|m| m.matches(left_size, right_size)) {
                continue;
            }
        }
        if rows.len() < left_size + right_size {
            continue;
        }

        let picks =
            rand::seq::index::sample(rng, rows.len(), left_size + right_size).into_vec();
        let left_rows: Vec<&SeedRow> = picks[..left_size].iter().map(|&i| &rows[i]).collect();
        let right_rows: Vec<&SeedRow> = picks[left_size..].iter().map(|&i| &rows[i]).collect();

        let left = Bundle::from_rows(&left_rows);
        let right = Bundle::from_rows(&right_rows);

        if left.key() == right.key() {
            continue;
        }
        if strict_gender {
            match (left.gender, right.gender) {
                (Some(a), Some(b)) if a == b => {}
                _ => continue,
            }
        }
        if !tiers_compatible(&left, &right) {
            continue;
        }
        let pair_key = canonical_pair_key(&left.key(), &right.key());
        if pair_blocked(&pair_key, open_pairs, cooldowns) {
            continue;
        }

        return Some((left, right));
    }
    None
}
