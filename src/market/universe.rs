//! The asset universe: every species+gender pair the community trades.
//!
//! Built from two read-only feeds: the golden gender roster CSV (which species
//! exist in which genders) and the evolution map JSON (which species is the
//! base stage of each line). Only base-stage assets are eligible for seeding;
//! evolved forms trade at prices implied by their base plus training cost, so
//! polling them directly would double-count.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::util::parse::split_csv_line;

/// Gender marker carried by every asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    /// Gender not tracked by the roster.
    Unknown,
    Genderless,
}

impl Gender {
    pub fn parse(token: &str) -> Option<Gender> {
        match token.trim().to_ascii_uppercase().as_str() {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "?" => Some(Gender::Unknown),
            "G" => Some(Gender::Genderless),
            _ => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "?",
            Gender::Genderless => "G",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// The evolution map feed: lowercased species name to its canonical base form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvolutionMap {
    pub base_by_name: HashMap<String, String>,
}

impl EvolutionMap {
    /// Resolves the base species for a name, defaulting to the name itself
    /// when the line is unknown.
    pub fn base_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.base_by_name
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(name)
    }
}

/// One tradeable species+gender pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Bare species display name, golden prefix stripped.
    pub name: String,
    pub gender: Gender,
    /// Canonical base species of this asset's evolution line.
    pub base_name: String,
    /// Whether this asset is its line's base stage.
    pub is_base: bool,
}

impl Asset {
    /// The `Name|Gender` key this asset is stored and referenced under.
    pub fn key(&self) -> String {
        format!("{}|{}", self.name, self.gender)
    }
}

/// Roster rows name golden variants explicitly; assets are keyed on the bare
/// species so seed files and commands never have to spell the prefix.
const GOLDEN_PREFIX: &str = "Golden ";

fn normalize_species_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix(GOLDEN_PREFIX).unwrap_or(trimmed);
    bare.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The full asset catalog plus the base-stage subset eligible for seeding.
///
/// Built once per source-file change and treated as an immutable snapshot;
/// see [`crate::market::catalog::CatalogCache`].
#[derive(Debug, Clone, Default)]
pub struct AssetUniverse {
    /// Every parsed asset, keyed by `Name|Gender`.
    pub all: HashMap<String, Asset>,
    /// The base-stage subset, keyed by `Name|Gender`.
    pub eligible: HashMap<String, Asset>,
    /// Lowercased key to canonical key, for case-insensitive lookup.
    index: HashMap<String, String>,
}

impl AssetUniverse {
    /// Builds the universe from the gender roster CSV and the evolution map.
    ///
    /// Roster rows are `name,genders` with `/`-delimited gender letters
    /// (e.g. `Abra,M/F`). Rows with no valid gender token are skipped.
    pub fn build(gender_csv: &str, evolution: &EvolutionMap) -> Self {
        let mut universe = AssetUniverse::default();

        for (line_no, line) in gender_csv.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields = split_csv_line(trimmed);
            if fields.len() < 2 {
                continue;
            }
            if line_no == 0 && fields[0].eq_ignore_ascii_case("name") {
                continue;
            }

            let name = normalize_species_name(&fields[0]);
            if name.is_empty() {
                continue;
            }
            let genders: Vec<Gender> =
                fields[1].split('/').filter_map(Gender::parse).collect();

            for gender in genders {
                let base_name = evolution.base_for(&name).to_string();
                let asset = Asset {
                    is_base: base_name.eq_ignore_ascii_case(&name),
                    name: name.clone(),
                    gender,
                    base_name,
                };
                universe.insert(asset);
            }
        }

        universe
    }

    fn insert(&mut self, asset: Asset) {
        let key = asset.key();
        self.index.insert(key.to_ascii_lowercase(), key.clone());
        if asset.is_base {
            self.eligible.insert(key.clone(), asset.clone());
        }
        self.all.insert(key, asset);
    }

    /// Case-insensitive lookup by species name and gender.
    pub fn find(&self, name: &str, gender: Gender) -> Option<&Asset> {
        let probe = format!("{}|{}", normalize_species_name(name), gender).to_ascii_lowercase();
        let key = self.index.get(&probe)?;
        self.all.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evolution() -> EvolutionMap {
        let mut base_by_name = HashMap::new();
        base_by_name.insert("kadabra".to_string(), "Abra".to_string());
        base_by_name.insert("abra".to_string(), "Abra".to_string());
        base_by_name.insert("pikachu".to_string(), "Pichu".to_string());
        EvolutionMap { base_by_name }
    }

    const ROSTER: &str = "name,genders\n\
                          Golden Abra,M/F\n\
                          Golden Kadabra,M/F\n\
                          Golden Pikachu,F\n\
                          Golden Magnemite,G\n\
                          Golden Mystery,Q\n";

    #[test]
    fn builds_assets_per_gender() {
        let universe = AssetUniverse::build(ROSTER, &evolution());
        assert!(universe.all.contains_key("Abra|M"));
        assert!(universe.all.contains_key("Abra|F"));
        assert!(universe.all.contains_key("Magnemite|G"));
        // No valid gender token: row skipped entirely.
        assert!(!universe.all.keys().any(|k| k.starts_with("Mystery")));
    }

    #[test]
    fn strips_golden_prefix() {
        let universe = AssetUniverse::build(ROSTER, &evolution());
        assert!(universe.all.contains_key("Abra|M"));
        assert!(!universe.all.contains_key("Golden Abra|M"));
    }

    #[test]
    fn resolves_base_stage_eligibility() {
        let universe = AssetUniverse::build(ROSTER, &evolution());

        let abra = universe.all.get("Abra|M").unwrap();
        assert!(abra.is_base);
        assert!(universe.eligible.contains_key("Abra|M"));

        let kadabra = universe.all.get("Kadabra|M").unwrap();
        assert!(!kadabra.is_base);
        assert_eq!(kadabra.base_name, "Abra");
        assert!(!universe.eligible.contains_key("Kadabra|M"));

        // Pikachu's base is Pichu, which the roster doesn't even carry.
        let pikachu = universe.all.get("Pikachu|F").unwrap();
        assert!(!pikachu.is_base);

        // Species absent from the evolution map default to being their own base.
        let magnemite = universe.all.get("Magnemite|G").unwrap();
        assert!(magnemite.is_base);
    }

    #[test]
    fn finds_case_insensitively() {
        let universe = AssetUniverse::build(ROSTER, &evolution());
        let found = universe.find("abra", Gender::Male).unwrap();
        assert_eq!(found.key(), "Abra|M");
        assert!(universe.find("golden abra", Gender::Male).is_some());
        assert!(universe.find("abra", Gender::Genderless).is_none());
    }
}
