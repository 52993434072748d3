use std::path::PathBuf;

use crate::error::{AppError, ConfigError};
use crate::market::catalog::CatalogSources;

/// Names of the market data files inside `MARKET_DATA_DIR`.
const GENDER_ROSTER_FILE: &str = "golden_genders.csv";
const EVOLUTION_MAP_FILE: &str = "evolution_map.json";
const SEED_FILE: &str = "market_seeds.csv";

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,
    /// Directory holding the gender roster, evolution map and seed CSV.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            data_dir: std::env::var("MARKET_DATA_DIR")
                .map_err(|_| ConfigError::MissingEnvVar("MARKET_DATA_DIR".to_string()))?
                .into(),
        })
    }

    pub fn catalog_sources(&self) -> CatalogSources {
        CatalogSources {
            roster_path: self.data_dir.join(GENDER_ROSTER_FILE),
            evolution_path: self.data_dir.join(EVOLUTION_MAP_FILE),
            seed_path: self.data_dir.join(SEED_FILE),
        }
    }
}
