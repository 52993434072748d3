//! Per-guild market poll settings.

/// Default cadence between automatic polls: twice a day.
pub const DEFAULT_CADENCE_MINUTES: i32 = 720;
/// Default poll duration: two hours.
pub const DEFAULT_POLL_MINUTES: i32 = 120;
/// Default pair re-offer cooldown.
pub const DEFAULT_PAIR_COOLDOWN_DAYS: i32 = 5;
/// Default minimum total votes for a poll to affect ratings.
pub const DEFAULT_MIN_VOTES: i32 = 5;

/// Market poll configuration for one guild.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildSettings {
    pub guild_id: String,
    pub enabled: bool,
    pub channel_id: Option<String>,
    pub cadence_minutes: i32,
    pub poll_minutes: i32,
    pub pair_cooldown_days: i32,
    pub min_votes: i32,
}

impl GuildSettings {
    pub fn from_entity(entity: entity::guild_settings::Model) -> Self {
        Self {
            guild_id: entity.guild_id,
            enabled: entity.enabled,
            channel_id: entity.channel_id,
            cadence_minutes: entity.cadence_minutes,
            poll_minutes: entity.poll_minutes,
            pair_cooldown_days: entity.pair_cooldown_days,
            min_votes: entity.min_votes,
        }
    }

    /// The configured channel as a numeric Discord ID, if set and parseable.
    pub fn channel_u64(&self) -> Option<u64> {
        self.channel_id.as_deref().and_then(|id| id.parse().ok())
    }
}

/// Patch for updating guild settings; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateGuildSettingsParam {
    pub enabled: Option<bool>,
    pub channel_id: Option<String>,
    pub cadence_minutes: Option<i32>,
    pub poll_minutes: Option<i32>,
    pub pair_cooldown_days: Option<i32>,
    pub min_votes: Option<i32>,
}
