//! Bundles (one side of a matchup) and canonical pair keys.

use crate::market::catalog::SeedRow;
use crate::market::rate::tier_for_mid;
use crate::market::universe::Gender;

/// One side of a matchup: one or more assets offered together.
///
/// The range fields are elementwise sums over the member ranges, modeling the
/// combined wealth commitment of taking the whole side. Tier is derived from
/// the combined mid value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    /// Member asset keys, deduplicated and canonically sorted.
    pub keys: Vec<String>,
    pub min_x: f64,
    pub max_x: f64,
    /// Uniform member gender, or `None` when members mix genders (no gender
    /// preference applies to such a bundle).
    pub gender: Option<Gender>,
}

impl Bundle {
    pub fn from_rows(rows: &[&SeedRow]) -> Bundle {
        let mut members: Vec<&SeedRow> = rows.to_vec();
        members.sort_by(|a, b| a.asset_key.cmp(&b.asset_key));
        members.dedup_by(|a, b| a.asset_key == b.asset_key);

        let keys = members.iter().map(|r| r.asset_key.clone()).collect();
        let min_x = members.iter().map(|r| r.range.min_x).sum();
        let max_x = members.iter().map(|r| r.range.max_x).sum();

        let mut genders = members.iter().map(|r| r.gender);
        let gender = genders.next().and_then(|first| {
            genders.all(|g| g == first).then_some(first)
        });

        Bundle { keys, min_x, max_x, gender }
    }

    pub fn mid_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }

    pub fn tier_index(&self) -> usize {
        tier_for_mid(self.mid_x()).0
    }

    /// The bundle's identity: member keys joined with `+`.
    pub fn key(&self) -> String {
        self.keys.join("+")
    }

    /// Human-facing label used as the poll answer text, e.g.
    /// `Abra (M) + Eevee (F)`.
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(|key| match key.split_once('|') {
                Some((name, gender)) => format!("{} ({})", name, gender),
                None => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// Order-independent identifier for a left/right matchup: the two bundle keys
/// sorted lexicographically and joined with `||`.
pub fn canonical_pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}||{}", a, b)
    } else {
        format!("{}||{}", b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::rate::parse_seed_range;

    fn row(key: &str, gender: Gender, range: &str) -> SeedRow {
        SeedRow {
            asset_key: key.to_string(),
            gender,
            range: parse_seed_range(range).unwrap(),
        }
    }

    #[test]
    fn sums_member_ranges() {
        let a = row("Abra|M", Gender::Male, "100kx-200kx");
        let b = row("Eevee|M", Gender::Male, "50kx-100kx");
        let bundle = Bundle::from_rows(&[&a, &b]);
        assert_eq!(bundle.min_x, 150_000.0);
        assert_eq!(bundle.max_x, 300_000.0);
        assert_eq!(bundle.mid_x(), 225_000.0);
    }

    #[test]
    fn sorts_and_dedups_keys() {
        let a = row("Eevee|M", Gender::Male, "50kx");
        let b = row("Abra|M", Gender::Male, "100kx");
        let bundle = Bundle::from_rows(&[&a, &b, &b]);
        assert_eq!(bundle.key(), "Abra|M+Eevee|M");
        // The duplicate contributes to the sums once.
        assert_eq!(bundle.min_x, 150_000.0);
    }

    #[test]
    fn gender_is_uniform_or_absent() {
        let m = row("Abra|M", Gender::Male, "50kx");
        let f = row("Eevee|F", Gender::Female, "50kx");
        assert_eq!(Bundle::from_rows(&[&m]).gender, Some(Gender::Male));
        assert_eq!(Bundle::from_rows(&[&m, &f]).gender, None);
    }

    #[test]
    fn labels_members() {
        let a = row("Abra|M", Gender::Male, "100kx");
        let b = row("Eevee|F", Gender::Female, "50kx");
        assert_eq!(Bundle::from_rows(&[&a, &b]).label(), "Abra (M) + Eevee (F)");
    }

    #[test]
    fn pair_key_is_symmetric() {
        let ab = canonical_pair_key("Abra|M", "Eevee|F");
        let ba = canonical_pair_key("Eevee|F", "Abra|M");
        assert_eq!(ab, ba);
        assert_eq!(ab, "Abra|M||Eevee|F");
    }
}
