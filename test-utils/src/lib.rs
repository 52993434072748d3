//! Marketboard Test Utils
//!
//! Shared testing utilities for the marketboard application. This crate
//! offers a builder for creating test contexts backed by in-memory SQLite
//! databases, plus factories for inserting entities with sensible defaults.
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::GuildSettings;
//!
//! #[tokio::test]
//! async fn test_settings() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(GuildSettings)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
