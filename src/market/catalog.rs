//! Seed catalog loading, validation and change-driven reloading.
//!
//! The operator maintains a seed CSV assigning a wealth range to each
//! base-stage asset. The catalog is validated as a whole: any bad row marks
//! the snapshot invalid and blocks poll posting until the file is fixed.
//! Errors are collected as human-readable strings rather than thrown, so the
//! command surface can show the operator exactly what to repair.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::market::rate::{parse_seed_range, SeedRange};
use crate::market::universe::{AssetUniverse, EvolutionMap, Gender};
use crate::util::parse::split_csv_line;

/// One validated seed row: an eligible asset and its wealth range.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRow {
    /// Canonical `Name|Gender` key.
    pub asset_key: String,
    pub gender: Gender,
    pub range: SeedRange,
}

/// The parsed seed catalog: validated rows plus collected validation errors.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    /// Rows sorted by asset key.
    pub rows: Vec<SeedRow>,
    /// Human-readable validation errors; non-empty means the catalog is
    /// unusable as a whole.
    pub errors: Vec<String>,
}

impl SeedCatalog {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn from_error(message: String) -> Self {
        SeedCatalog { rows: Vec::new(), errors: vec![message] }
    }
}

/// Parses and validates the seed CSV against the asset universe.
///
/// Per row: the asset key must be well-formed `Name|Gender`, unique within
/// the file, known to the universe, and base-stage; the range must parse.
/// A blank range skips the row silently (partial seed files are expected
/// while the operator fills prices in). A file yielding no rows and no
/// errors still gets one synthetic error so it can never pass as valid.
pub fn parse_seed_csv(text: &str, universe: &AssetUniverse) -> SeedCatalog {
    let mut catalog = SeedCatalog::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = split_csv_line(trimmed);
        if line_no == 0 && fields[0].eq_ignore_ascii_case("asset_key") {
            continue;
        }

        let row_no = line_no + 1;
        if fields.len() != 2 {
            catalog
                .errors
                .push(format!("row {}: expected 2 columns, found {}", row_no, fields.len()));
            continue;
        }

        let raw_key = &fields[0];
        let raw_range = &fields[1];

        let Some((name, gender)) = parse_asset_key(raw_key) else {
            catalog.errors.push(format!(
                "row {}: asset key '{}' is not in Name|Gender form",
                row_no, raw_key
            ));
            continue;
        };

        let normalized = format!("{}|{}", name, gender).to_ascii_lowercase();
        if !seen.insert(normalized) {
            catalog
                .errors
                .push(format!("row {}: duplicate asset key '{}'", row_no, raw_key));
            continue;
        }

        let Some(asset) = universe.find(&name, gender) else {
            catalog
                .errors
                .push(format!("row {}: unknown asset '{}'", row_no, raw_key));
            continue;
        };

        if !asset.is_base {
            catalog.errors.push(format!(
                "row {}: evolved asset not allowed: '{}' (seed its base '{}' instead)",
                row_no, raw_key, asset.base_name
            ));
            continue;
        }

        if raw_range.is_empty() {
            // Not yet priced; skipped without complaint.
            continue;
        }

        match parse_seed_range(raw_range) {
            Ok(range) => catalog.rows.push(SeedRow {
                asset_key: asset.key(),
                gender: asset.gender,
                range,
            }),
            Err(e) => catalog
                .errors
                .push(format!("row {}: bad seed range '{}': {}", row_no, raw_range, e)),
        }
    }

    if catalog.rows.is_empty() && catalog.errors.is_empty() {
        catalog.errors.push("no seed rows".to_string());
    }

    catalog.rows.sort_by(|a, b| a.asset_key.cmp(&b.asset_key));
    catalog
}

fn parse_asset_key(raw: &str) -> Option<(String, Gender)> {
    let (name, gender) = raw.split_once('|')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), Gender::parse(gender)?))
}

/// Paths of the three source files a catalog snapshot is built from.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    pub roster_path: PathBuf,
    pub evolution_path: PathBuf,
    pub seed_path: PathBuf,
}

/// mtime+size stamp for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

/// Composite signature over all three source files. Snapshots are rebuilt
/// only when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceSignature([FileStamp; 3]);

async fn stamp(path: &PathBuf) -> std::io::Result<FileStamp> {
    let meta = tokio::fs::metadata(path).await?;
    Ok(FileStamp { modified: meta.modified()?, len: meta.len() })
}

/// One immutable load of the catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    pub catalog: SeedCatalog,
    pub universe: AssetUniverse,
    pub loaded_at: DateTime<Utc>,
    signature: Option<SourceSignature>,
}

/// Versioned snapshot cache over the three source files.
///
/// `snapshot()` re-reads the files only when their composite mtime+size
/// signature changes; concurrent readers keep the previous `Arc` until the
/// replacement is swapped in wholesale, so there is no partial-state window.
pub struct CatalogCache {
    sources: Option<CatalogSources>,
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogCache {
    pub fn new(sources: CatalogSources) -> Self {
        CatalogCache { sources: Some(sources), current: RwLock::new(None) }
    }

    /// A cache pinned to one pre-built catalog; used by tests and tooling
    /// that have no backing files.
    pub fn fixed(catalog: SeedCatalog, universe: AssetUniverse) -> Self {
        let snapshot = CatalogSnapshot {
            catalog,
            universe,
            loaded_at: Utc::now(),
            signature: None,
        };
        CatalogCache {
            sources: None,
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    /// Returns the current snapshot, reloading first if the source files
    /// changed. A load failure produces an all-invalid snapshot carrying the
    /// failure as its single error, so callers always get a snapshot.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let Some(sources) = &self.sources else {
            let guard = self.current.read().await;
            return guard.as_ref().expect("fixed cache always holds a snapshot").clone();
        };

        let signature = read_signature(sources).await;

        {
            let guard = self.current.read().await;
            if let Some(current) = guard.as_ref() {
                if signature.is_some() && current.signature == signature {
                    return current.clone();
                }
            }
        }

        let snapshot = Arc::new(load_snapshot(sources, signature).await);
        let mut guard = self.current.write().await;
        *guard = Some(snapshot.clone());
        snapshot
    }
}

async fn read_signature(sources: &CatalogSources) -> Option<SourceSignature> {
    let seed = stamp(&sources.seed_path).await.ok()?;
    let roster = stamp(&sources.roster_path).await.ok()?;
    let evolution = stamp(&sources.evolution_path).await.ok()?;
    Some(SourceSignature([seed, roster, evolution]))
}

async fn load_snapshot(
    sources: &CatalogSources,
    signature: Option<SourceSignature>,
) -> CatalogSnapshot {
    let loaded_at = Utc::now();
    match read_sources(sources).await {
        Ok((catalog, universe)) => CatalogSnapshot { catalog, universe, loaded_at, signature },
        Err(e) => CatalogSnapshot {
            catalog: SeedCatalog::from_error(format!("failed to load seed catalog: {}", e)),
            universe: AssetUniverse::default(),
            loaded_at,
            signature,
        },
    }
}

async fn read_sources(
    sources: &CatalogSources,
) -> Result<(SeedCatalog, AssetUniverse), crate::error::AppError> {
    let roster = tokio::fs::read_to_string(&sources.roster_path).await?;
    let evolution_text = tokio::fs::read_to_string(&sources.evolution_path).await?;
    let seed_text = tokio::fs::read_to_string(&sources.seed_path).await?;

    let evolution: EvolutionMap = serde_json::from_str(&evolution_text)?;
    let universe = AssetUniverse::build(&roster, &evolution);
    let catalog = parse_seed_csv(&seed_text, &universe);
    Ok((catalog, universe))
}
