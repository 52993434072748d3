//! Parsing of operator-entered wealth tokens and seed ranges.
//!
//! Seed values are quoted in the community's wealth unit "x". Operators write
//! shorthand like `950kx` (950,000x) or `1.3mx` (1,300,000x), and ranges like
//! `950kx-1.3mx`. A side of a range may omit its unit and inherit the other
//! side's (`1.2-1.6mx` means 1,200,000x to 1,600,000x).

use thiserror::Error;

/// Errors produced while parsing rate tokens and seed ranges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateParseError {
    #[error("empty rate token")]
    Empty,

    /// The token had no unit suffix and no sibling token to inherit one from.
    #[error("rate token '{0}' is missing a unit (x, kx or mx)")]
    NeedsUnit(String),

    #[error("invalid rate amount '{0}'")]
    InvalidAmount(String),

    #[error("rate amount '{0}' must not be negative")]
    NegativeAmount(String),

    #[error("seed range '{0}' must be a value or a min-max pair")]
    TooManyParts(String),

    #[error("seed range minimum {min}x exceeds maximum {max}x")]
    InvertedRange { min: f64, max: f64 },
}

/// One band of the fixed wealth tier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    pub id: &'static str,
    pub label: &'static str,
    /// Inclusive lower bound in x.
    pub min_x: f64,
    /// Exclusive upper bound in x; `None` for the open-ended top band.
    pub max_x: Option<f64>,
}

/// The fixed tier table, ordered low to high. Matchups only pair assets whose
/// tiers are at most one band apart, so the table order is load-bearing:
/// `tier_for_mid` scans it front to back.
pub const TIERS: [Tier; 11] = [
    Tier { id: "t1", label: "1k-5k", min_x: 1_000.0, max_x: Some(5_000.0) },
    Tier { id: "t2", label: "5k-10k", min_x: 5_000.0, max_x: Some(10_000.0) },
    Tier { id: "t3", label: "10k-25k", min_x: 10_000.0, max_x: Some(25_000.0) },
    Tier { id: "t4", label: "25k-50k", min_x: 25_000.0, max_x: Some(50_000.0) },
    Tier { id: "t5", label: "50k-100k", min_x: 50_000.0, max_x: Some(100_000.0) },
    Tier { id: "t6", label: "100k-250k", min_x: 100_000.0, max_x: Some(250_000.0) },
    Tier { id: "t7", label: "250k-500k", min_x: 250_000.0, max_x: Some(500_000.0) },
    Tier { id: "t8", label: "500k-1m", min_x: 500_000.0, max_x: Some(1_000_000.0) },
    Tier { id: "t9", label: "1m-2m", min_x: 1_000_000.0, max_x: Some(2_000_000.0) },
    Tier { id: "t10", label: "2m-3m", min_x: 2_000_000.0, max_x: Some(3_000_000.0) },
    Tier { id: "t11", label: "3m+", min_x: 3_000_000.0, max_x: None },
];

/// Returns the index and band for a mid value.
///
/// Scans the table in order and returns the first band whose upper bound is
/// above the value. Values below the first band's lower bound therefore land
/// in the first band, and anything at or above 3m lands in the open top band;
/// the scan cannot fail.
pub fn tier_for_mid(mid_x: f64) -> (usize, &'static Tier) {
    for (index, tier) in TIERS.iter().enumerate() {
        match tier.max_x {
            Some(max) if mid_x < max => return (index, tier),
            Some(_) => continue,
            None => return (index, tier),
        }
    }
    // The last band has no upper bound, so the loop always returns.
    unreachable!("tier table has an open-ended top band")
}

/// A validated min-max seed range in x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedRange {
    pub min_x: f64,
    pub max_x: f64,
}

impl SeedRange {
    pub fn mid_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn tier_index(&self) -> usize {
        tier_for_mid(self.mid_x()).0
    }

    pub fn tier(&self) -> &'static Tier {
        tier_for_mid(self.mid_x()).1
    }
}

/// Amount and optional unit multiplier split out of a single token.
fn parse_token_parts(token: &str) -> Result<(f64, Option<f64>), RateParseError> {
    let trimmed = token.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return Err(RateParseError::Empty);
    }

    let (digits, multiplier) = if let Some(rest) = trimmed.strip_suffix("kx") {
        (rest, Some(1_000.0))
    } else if let Some(rest) = trimmed.strip_suffix("mx") {
        (rest, Some(1_000_000.0))
    } else if let Some(rest) = trimmed.strip_suffix('k') {
        (rest, Some(1_000.0))
    } else if let Some(rest) = trimmed.strip_suffix('m') {
        (rest, Some(1_000_000.0))
    } else if let Some(rest) = trimmed.strip_suffix('x') {
        (rest, Some(1.0))
    } else {
        (trimmed.as_str(), None)
    };

    let amount: f64 = digits
        .trim()
        .parse()
        .map_err(|_| RateParseError::InvalidAmount(token.trim().to_string()))?;
    if !amount.is_finite() {
        return Err(RateParseError::InvalidAmount(token.trim().to_string()));
    }
    if amount < 0.0 {
        return Err(RateParseError::NegativeAmount(token.trim().to_string()));
    }

    Ok((amount, multiplier))
}

/// Parses a single wealth token like `950kx`, `1.3m` or `4000x` into a value
/// in x.
///
/// If the token carries no unit, `fallback_multiplier` is applied; without a
/// fallback the caller gets [`RateParseError::NeedsUnit`] and must resolve the
/// unit from a sibling token.
pub fn parse_rate_token(
    token: &str,
    fallback_multiplier: Option<f64>,
) -> Result<f64, RateParseError> {
    let (amount, multiplier) = parse_token_parts(token)?;
    match multiplier.or(fallback_multiplier) {
        Some(multiplier) => Ok(amount * multiplier),
        None => Err(RateParseError::NeedsUnit(token.trim().to_string())),
    }
}

/// Parses a seed range string into a [`SeedRange`].
///
/// A single token is a point range (`min == max`). Two tokens separated by `-`
/// form a min-max pair; if exactly one side omits its unit it inherits the
/// other side's, and if both omit units both are taken as raw x.
pub fn parse_seed_range(raw: &str) -> Result<SeedRange, RateParseError> {
    let parts: Vec<&str> = raw.split('-').map(str::trim).collect();

    let (min_x, max_x) = match parts.as_slice() {
        [single] => {
            let value = parse_rate_token(single, Some(1.0))?;
            (value, value)
        }
        [low, high] => {
            let low_parts = parse_token_parts(low)?;
            let high_parts = parse_token_parts(high)?;
            let (low_mult, high_mult) = match (low_parts.1, high_parts.1) {
                (Some(l), Some(h)) => (l, h),
                (Some(l), None) => (l, l),
                (None, Some(h)) => (h, h),
                (None, None) => (1.0, 1.0),
            };
            (low_parts.0 * low_mult, high_parts.0 * high_mult)
        }
        _ => return Err(RateParseError::TooManyParts(raw.trim().to_string())),
    };

    if min_x > max_x {
        return Err(RateParseError::InvertedRange { min: min_x, max: max_x });
    }

    Ok(SeedRange { min_x, max_x })
}
