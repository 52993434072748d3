//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation. Factories hand out
//! unique identifiers via an atomic counter so tests never collide.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let settings = factory::create_settings(&db, "42").await?;
//! let run = factory::create_poll_run(&db, "42").await?;
//!
//! // Builder pattern for custom values
//! let score = factory::asset_score::AssetScoreFactory::new(&db, "Abra|M")
//!     .elo(1550.0)
//!     .wins(3)
//!     .build()
//!     .await?;
//! ```

pub mod asset_score;
pub mod guild_settings;
pub mod helpers;
pub mod pair_cooldown;
pub mod poll_run;

// Re-export commonly used factory functions for concise usage
pub use asset_score::create_score;
pub use guild_settings::create_settings;
pub use pair_cooldown::create_cooldown;
pub use poll_run::create_poll_run;
