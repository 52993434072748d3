use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()`, or all marketpoll tables at once
/// with `with_marketpoll_tables()`, then call `build()` to create the
/// configured context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{GuildSettings, PollRun};
///
/// let test = TestBuilder::new()
///     .with_table(GuildSettings)
///     .with_table(PollRun)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements to execute during database setup, generated
    /// from entity models and executed in insertion order.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity
    /// using SQLite syntax. Chain multiple calls to add multiple tables.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds every marketpoll table. The tables carry no foreign keys between
    /// them, so ordering is not significant.
    pub fn with_marketpoll_tables(self) -> Self {
        self.with_table(GuildSettings)
            .with_table(PollRun)
            .with_table(PairCooldown)
            .with_table(AssetScore)
            .with_table(SchedulerLog)
    }

    /// Builds the configured test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with database connection and tables created
    /// - `Err(TestError::Database)` - Failed to connect or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new();
        context.with_tables(self.tables).await?;
        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
