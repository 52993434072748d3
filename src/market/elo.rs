//! Elo rating updates from poll vote tallies.
//!
//! Ratings follow standard logistic Elo with a vote-volume-scaled K factor:
//! low-turnout polls move ratings less, and the scaling caps at twice the
//! base K. Multi-asset sides use a log-sum-exp "team strength" so a single
//! strong member dominates a weak teammate instead of averaging out, and the
//! team's delta is distributed back proportionally to each member's share of
//! the team's quantal weight.

/// Rating every asset starts at.
pub const BASE_ELO: f64 = 1500.0;

const BASE_K: f64 = 24.0;

/// Poll outcome, decided purely by raw vote counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    Left,
    Right,
    Tie,
    /// Closing failed; the run is terminal and never affects ratings.
    Error,
}

impl PollResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollResult::Left => "left",
            PollResult::Right => "right",
            PollResult::Tie => "tie",
            PollResult::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<PollResult> {
        match s {
            "left" => Some(PollResult::Left),
            "right" => Some(PollResult::Right),
            "tie" => Some(PollResult::Tie),
            "error" => Some(PollResult::Error),
            _ => None,
        }
    }
}

fn result_from_votes(votes_left: u32, votes_right: u32) -> PollResult {
    if votes_left > votes_right {
        PollResult::Left
    } else if votes_right > votes_left {
        PollResult::Right
    } else {
        PollResult::Tie
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn quantal_weight(rating: f64) -> f64 {
    10f64.powf(rating / 400.0)
}

/// Scalar Elo outcome for a 1v1 poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EloOutcome {
    pub left: f64,
    pub right: f64,
    pub result: PollResult,
    /// False when the poll fell below the vote floor; ratings are passed
    /// through unchanged in that case.
    pub affects_score: bool,
}

/// Unrounded rating deltas for a tallied poll that met the vote floor.
fn elo_deltas(left: f64, right: f64, votes_left: u32, votes_right: u32) -> (f64, f64) {
    let total = f64::from(votes_left) + f64::from(votes_right);
    let expected_left = 1.0 / (1.0 + 10f64.powf((right - left) / 400.0));
    let actual_left = f64::from(votes_left) / total;
    let k = BASE_K * (total / 5.0).sqrt().min(2.0);

    let delta_left = k * (actual_left - expected_left);
    let delta_right = k * ((1.0 - actual_left) - (1.0 - expected_left));
    (delta_left, delta_right)
}

/// Applies a vote tally to two ratings.
///
/// Below `max(1, min_votes)` total votes the ratings are returned unchanged
/// with `affects_score = false`; the result is still reported from the raw
/// counts. Updated ratings are rounded to 4 decimal places.
pub fn apply_elo_from_votes(
    left: f64,
    right: f64,
    votes_left: u32,
    votes_right: u32,
    min_votes: u32,
) -> EloOutcome {
    let result = result_from_votes(votes_left, votes_right);
    let total = u64::from(votes_left) + u64::from(votes_right);
    if total < u64::from(min_votes.max(1)) {
        return EloOutcome { left, right, result, affects_score: false };
    }

    let (delta_left, delta_right) = elo_deltas(left, right, votes_left, votes_right);
    EloOutcome {
        left: round4(left + delta_left),
        right: round4(right + delta_right),
        result,
        affects_score: true,
    }
}

/// Bundle-aware Elo outcome; member ratings are in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleEloOutcome {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub result: PollResult,
    pub affects_score: bool,
}

/// Log-sum-exp aggregate of a side's member ratings.
fn team_rating(ratings: &[f64]) -> f64 {
    let sum: f64 = ratings.iter().copied().map(quantal_weight).sum();
    400.0 * sum.log10()
}

/// Distributes a team's rating delta to its members proportionally to each
/// member's share of the team's pre-update quantal weight.
fn distribute(ratings: &[f64], team_delta: f64) -> Vec<f64> {
    let total_weight: f64 = ratings.iter().copied().map(quantal_weight).sum();
    ratings
        .iter()
        .map(|&r| round4(r + team_delta * quantal_weight(r) / total_weight))
        .collect()
}

/// Generalizes [`apply_elo_from_votes`] to multi-member sides.
pub fn apply_elo_from_votes_bundles(
    left: &[f64],
    right: &[f64],
    votes_left: u32,
    votes_right: u32,
    min_votes: u32,
) -> BundleEloOutcome {
    let left_team = team_rating(left);
    let right_team = team_rating(right);
    let scalar = apply_elo_from_votes(left_team, right_team, votes_left, votes_right, min_votes);

    if !scalar.affects_score {
        return BundleEloOutcome {
            left: left.to_vec(),
            right: right.to_vec(),
            result: scalar.result,
            affects_score: false,
        };
    }

    BundleEloOutcome {
        left: distribute(left, scalar.left - left_team),
        right: distribute(right, scalar.right - right_team),
        result: scalar.result,
        affects_score: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_vote_floor_passes_through() {
        let outcome = apply_elo_from_votes(1500.0, 1480.0, 2, 1, 5);
        assert!(!outcome.affects_score);
        assert_eq!(outcome.left, 1500.0);
        assert_eq!(outcome.right, 1480.0);
        assert_eq!(outcome.result, PollResult::Left);
    }

    #[test]
    fn zero_votes_never_affect_even_with_zero_floor() {
        let outcome = apply_elo_from_votes(1500.0, 1500.0, 0, 0, 0);
        assert!(!outcome.affects_score);
        assert_eq!(outcome.result, PollResult::Tie);
    }

    #[test]
    fn winner_gains_and_loser_drops() {
        let outcome = apply_elo_from_votes(1500.0, 1500.0, 8, 3, 5);
        assert!(outcome.affects_score);
        assert_eq!(outcome.result, PollResult::Left);
        assert!(outcome.left > 1500.0);
        assert!(outcome.right < 1500.0);
        // Symmetric update: what one side gains the other loses.
        assert!((outcome.left - 1500.0 + (outcome.right - 1500.0)).abs() < 1e-9);
    }

    #[test]
    fn equal_votes_tie_and_pull_toward_each_other() {
        let outcome = apply_elo_from_votes(1600.0, 1400.0, 5, 5, 5);
        assert!(outcome.affects_score);
        assert_eq!(outcome.result, PollResult::Tie);
        // The favorite underperformed its expectation and bleeds rating.
        assert!(outcome.left < 1600.0);
        assert!(outcome.right > 1400.0);
    }

    #[test]
    fn k_factor_scales_with_turnout_and_caps() {
        // 5 total votes: K = 24. 20 total: K = 48, the cap. 80 total: still 48.
        let small = apply_elo_from_votes(1500.0, 1500.0, 5, 0, 1);
        let capped = apply_elo_from_votes(1500.0, 1500.0, 20, 0, 1);
        let beyond = apply_elo_from_votes(1500.0, 1500.0, 80, 0, 1);
        assert!((small.left - 1512.0).abs() < 1e-9);
        assert!((capped.left - 1524.0).abs() < 1e-9);
        assert!((beyond.left - 1524.0).abs() < 1e-9);
    }

    #[test]
    fn ratings_are_rounded_to_4_decimals() {
        let outcome = apply_elo_from_votes(1500.0, 1487.0, 7, 4, 5);
        let scaled = outcome.left * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }

    #[test]
    fn team_rating_is_dominated_by_strong_member() {
        let solo = team_rating(&[1600.0]);
        let with_weak_partner = team_rating(&[1600.0, 1200.0]);
        // Adding a much weaker member barely moves the aggregate.
        assert!(with_weak_partner > solo);
        assert!(with_weak_partner - solo < 45.0);
    }

    #[test]
    fn bundle_update_distributes_by_quantal_weight() {
        let outcome = apply_elo_from_votes_bundles(&[1500.0, 1520.0], &[1510.0], 12, 5, 5);
        assert!(outcome.affects_score);
        assert_eq!(outcome.result, PollResult::Left);
        assert!(outcome.left[0] > 1500.0);
        assert!(outcome.left[1] > 1520.0);
        assert!(outcome.right[0] < 1510.0);
        // The higher-rated member carries the larger share of the gain.
        let gain_low = outcome.left[0] - 1500.0;
        let gain_high = outcome.left[1] - 1520.0;
        assert!(gain_high > gain_low);
    }

    #[test]
    fn bundle_below_floor_passes_through() {
        let outcome = apply_elo_from_votes_bundles(&[1500.0, 1520.0], &[1510.0], 2, 1, 5);
        assert!(!outcome.affects_score);
        assert_eq!(outcome.left, vec![1500.0, 1520.0]);
        assert_eq!(outcome.right, vec![1510.0]);
    }

    #[test]
    fn single_member_bundle_matches_scalar_update() {
        let bundle = apply_elo_from_votes_bundles(&[1500.0], &[1480.0], 9, 6, 5);
        let scalar = apply_elo_from_votes(1500.0, 1480.0, 9, 6, 5);
        assert!((bundle.left[0] - scalar.left).abs() < 1e-9);
        assert!((bundle.right[0] - scalar.right).abs() < 1e-9);
    }

    #[test]
    fn result_string_round_trips() {
        for result in [PollResult::Left, PollResult::Right, PollResult::Tie, PollResult::Error]
        {
            assert_eq!(PollResult::parse(result.as_str()), Some(result));
        }
        assert_eq!(PollResult::parse("sideways"), None);
    }
}
