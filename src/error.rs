//! Application error types.

use thiserror::Error;

/// Top-level application error type.
///
/// Aggregates the error types that can occur across the bot. Most variants
/// use `#[from]` for automatic conversion; unexpected conditions that have no
/// structured source use `InternalError` with a descriptive message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity, boxed due to its size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error(transparent)]
    IoErr(#[from] std::io::Error),

    #[error(transparent)]
    JsonErr(#[from] serde_json::Error),

    /// A referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected condition indicating a bug or a malformed platform payload.
    #[error("{0}")]
    InternalError(String),
}

/// Boxes serenity errors to keep the enum small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// Check the documentation or `.env.example` file for required
    /// configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}
