//! The `!marketpoll` operator command surface.
//!
//! Thin layer over the repositories and the poll engine: parses prefix
//! commands, enforces the Manage Server gate on mutating subcommands, and
//! renders plain text replies. The engine itself never produces user-facing
//! text.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Context, Message};

use crate::data::asset_score::AssetScoreRepository;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::data::poll_run::PollRunRepository;
use crate::error::AppError;
use crate::market::elo::PollResult;
use crate::market::rate::TIERS;
use crate::model::guild_settings::UpdateGuildSettingsParam;
use crate::poll::engine::{MarketPollEngine, PostOutcome};

const COMMAND_ALIASES: [&str; 3] = ["marketpoll", "market", "mp"];

const HELP_TEXT: &str = "\
**Market poll commands**
`!marketpoll status` - settings, catalog state and open polls
`!marketpoll leaderboard` - top rated assets
`!marketpoll history [Name|G]` - recent closed polls
`!marketpoll tiers` - wealth tier table (admin)
`!marketpoll config show` - current configuration (admin)
`!marketpoll config channel <#channel>` (admin)
`!marketpoll config enabled <on|off>` (admin)
`!marketpoll config cadence <minutes>` (admin)
`!marketpoll config duration <minutes>` (admin)
`!marketpoll config cooldown <days>` (admin)
`!marketpoll config minvotes <count>` (admin)
`!marketpoll poll now` - post a poll immediately (admin)
Aliases: `!market`, `!mp`";

/// Handles message creation; dispatches `!marketpoll` commands.
pub async fn handle_message(
    db: &DatabaseConnection,
    engine: &Arc<MarketPollEngine>,
    ctx: Context,
    message: Message,
) {
    if message.author.bot {
        return;
    }
    // Only guild channels; the bot has no DM surface.
    let Some(guild_id) = message.guild_id else {
        return;
    };
    let Some(args) = parse_command(&message.content) else {
        return;
    };

    let guild_key = guild_id.get().to_string();
    let reply = match run_command(db, engine, &ctx, &message, &guild_key, &args).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("marketpoll command failed in guild {}: {}", guild_key, e);
            "Something went wrong handling that command.".to_string()
        }
    };

    if let Err(e) = message.channel_id.say(&ctx.http, reply).await {
        tracing::error!("Failed to reply in channel {}: {}", message.channel_id, e);
    }
}

/// Splits a message into command arguments if it is a `!marketpoll` command
/// (or one of its aliases). The subcommand tokens keep their original case so
/// asset keys survive intact.
fn parse_command(content: &str) -> Option<Vec<String>> {
    let rest = content.trim().strip_prefix('!')?;
    let mut tokens = rest.split_whitespace();
    let command = tokens.next()?.to_ascii_lowercase();
    if !COMMAND_ALIASES.contains(&command.as_str()) {
        return None;
    }
    Some(tokens.map(str::to_string).collect())
}

async fn run_command(
    db: &DatabaseConnection,
    engine: &Arc<MarketPollEngine>,
    ctx: &Context,
    message: &Message,
    guild_id: &str,
    args: &[String],
) -> Result<String, AppError> {
    let sub = args.first().map(|s| s.to_ascii_lowercase());
    match sub.as_deref() {
        None | Some("help") => Ok(HELP_TEXT.to_string()),
        Some("status") => status_text(db, engine, guild_id).await,
        Some("leaderboard") => leaderboard_text(db).await,
        Some("history") => history_text(db, args.get(1).map(String::as_str)).await,
        Some("tiers") => {
            if !is_admin(ctx, message).await {
                return Ok("You need the Manage Server permission for that.".to_string());
            }
            Ok(tiers_text())
        }
        Some("config") => {
            if !is_admin(ctx, message).await {
                return Ok("You need the Manage Server permission for that.".to_string());
            }
            config_command(db, guild_id, &args[1..]).await
        }
        Some("poll") => {
            if !is_admin(ctx, message).await {
                return Ok("You need the Manage Server permission for that.".to_string());
            }
            if args.get(1).map(|s| s.to_ascii_lowercase()).as_deref() != Some("now") {
                return Ok("Usage: `!marketpoll poll now`".to_string());
            }
            match engine.post_poll_for_guild(guild_id).await? {
                PostOutcome::Posted { pair_key, .. } => {
                    Ok(format!("Posted a poll for `{}`.", pair_key))
                }
                PostOutcome::Skipped(reason) => {
                    Ok(format!("No poll posted: {}", reason.as_str()))
                }
            }
        }
        Some(other) => Ok(format!(
            "Unknown subcommand `{}`. Try `!marketpoll help`.",
            other
        )),
    }
}

/// Checks the Manage Server permission for the message author.
async fn is_admin(ctx: &Context, message: &Message) -> bool {
    let Ok(member) = message.member(ctx).await else {
        return false;
    };
    let permissions = {
        let Some(guild) = message.guild(&ctx.cache) else {
            return false;
        };
        guild.member_permissions(&member)
    };
    permissions.manage_guild()
}

async fn status_text(
    db: &DatabaseConnection,
    engine: &Arc<MarketPollEngine>,
    guild_id: &str,
) -> Result<String, AppError> {
    let settings = GuildSettingsRepository::new(db).get_or_default(guild_id).await?;
    let open_polls = PollRunRepository::new(db).count_open(guild_id).await?;
    let snapshot = engine.catalog_snapshot().await;

    let catalog_line = if snapshot.catalog.is_valid() {
        format!("{} seeded assets", snapshot.catalog.rows.len())
    } else {
        format!(
            "INVALID - {} error(s), first: {}",
            snapshot.catalog.errors.len(),
            snapshot.catalog.errors[0]
        )
    };

    Ok(format!(
        "Market polls: {}\nChannel: {}\nCadence: {} min | Poll duration: {} min | Pair cooldown: {} d | Min votes: {}\nOpen polls: {}\nCatalog: {}",
        if settings.enabled { "enabled" } else { "disabled" },
        settings
            .channel_id
            .map(|id| format!("<#{}>", id))
            .unwrap_or_else(|| "not set".to_string()),
        settings.cadence_minutes,
        settings.poll_minutes,
        settings.pair_cooldown_days,
        settings.min_votes,
        open_polls,
        catalog_line,
    ))
}

async fn leaderboard_text(db: &DatabaseConnection) -> Result<String, AppError> {
    let top = AssetScoreRepository::new(db).leaderboard(10).await?;
    if top.is_empty() {
        return Ok("No rated assets yet.".to_string());
    }

    let mut lines = vec!["**Asset leaderboard**".to_string()];
    for (rank, score) in top.iter().enumerate() {
        lines.push(format!(
            "{}. `{}` - {:.1} ({}W/{}L/{}T, {} polls)",
            rank + 1,
            score.asset_key,
            score.elo,
            score.wins,
            score.losses,
            score.ties,
            score.polls_count,
        ));
    }
    Ok(lines.join("\n"))
}

async fn history_text(
    db: &DatabaseConnection,
    asset_key: Option<&str>,
) -> Result<String, AppError> {
    let runs = PollRunRepository::new(db).list_history(asset_key, 10).await?;
    if runs.is_empty() {
        return Ok("No closed polls yet.".to_string());
    }

    let mut lines = vec![match asset_key {
        Some(key) => format!("**Recent polls for `{}`**", key),
        None => "**Recent polls**".to_string(),
    }];
    for run in runs {
        let outcome = match run.result {
            Some(PollResult::Left) => format!(
                "left won {}:{}",
                run.votes_left.unwrap_or(0),
                run.votes_right.unwrap_or(0)
            ),
            Some(PollResult::Right) => format!(
                "right won {}:{}",
                run.votes_right.unwrap_or(0),
                run.votes_left.unwrap_or(0)
            ),
            Some(PollResult::Tie) => format!("tie at {}", run.votes_left.unwrap_or(0)),
            Some(PollResult::Error) => "errored".to_string(),
            None => "open".to_string(),
        };
        lines.push(format!(
            "`{}` vs `{}` - {}{}",
            run.left_keys.join("+"),
            run.right_keys.join("+"),
            outcome,
            if run.affects_score { "" } else { " (unrated)" },
        ));
    }
    Ok(lines.join("\n"))
}

fn tiers_text() -> String {
    let mut lines = vec!["**Wealth tiers**".to_string()];
    for tier in TIERS {
        lines.push(format!("`{}`: {}", tier.id, tier.label));
    }
    lines.push("Matchups pair assets at most one tier apart.".to_string());
    lines.join("\n")
}

async fn config_command(
    db: &DatabaseConnection,
    guild_id: &str,
    args: &[String],
) -> Result<String, AppError> {
    let repo = GuildSettingsRepository::new(db);
    let setting = args.first().map(|s| s.to_ascii_lowercase());
    let value = args.get(1).map(String::as_str);

    let param = match (setting.as_deref(), value) {
        (None | Some("show"), _) => {
            let settings = repo.get_or_default(guild_id).await?;
            return Ok(format!(
                "enabled: {} | channel: {} | cadence: {} min | duration: {} min | cooldown: {} d | minvotes: {}",
                settings.enabled,
                settings.channel_id.as_deref().unwrap_or("not set"),
                settings.cadence_minutes,
                settings.poll_minutes,
                settings.pair_cooldown_days,
                settings.min_votes,
            ));
        }
        (Some("channel"), Some(raw)) => match parse_channel_target(raw) {
            Some(channel_id) => UpdateGuildSettingsParam {
                channel_id: Some(channel_id.to_string()),
                ..Default::default()
            },
            None => return Ok("That doesn't look like a channel.".to_string()),
        },
        (Some("enabled"), Some(raw)) => match parse_toggle(raw) {
            Some(enabled) => UpdateGuildSettingsParam { enabled: Some(enabled), ..Default::default() },
            None => return Ok("Use `on` or `off`.".to_string()),
        },
        (Some("cadence"), Some(raw)) => match parse_positive(raw) {
            Some(minutes) => UpdateGuildSettingsParam {
                cadence_minutes: Some(minutes),
                ..Default::default()
            },
            None => return Ok("Cadence must be a positive number of minutes.".to_string()),
        },
        (Some("duration"), Some(raw)) => match parse_positive(raw) {
            Some(minutes) => UpdateGuildSettingsParam {
                poll_minutes: Some(minutes),
                ..Default::default()
            },
            None => return Ok("Duration must be a positive number of minutes.".to_string()),
        },
        (Some("cooldown"), Some(raw)) => match parse_positive(raw) {
            Some(days) => UpdateGuildSettingsParam {
                pair_cooldown_days: Some(days),
                ..Default::default()
            },
            None => return Ok("Cooldown must be a positive number of days.".to_string()),
        },
        (Some("minvotes"), Some(raw)) => match parse_positive(raw) {
            Some(count) => UpdateGuildSettingsParam { min_votes: Some(count), ..Default::default() },
            None => return Ok("Minimum votes must be a positive number.".to_string()),
        },
        _ => {
            return Ok(
                "Usage: `!marketpoll config <show|channel|enabled|cadence|duration|cooldown|minvotes> [value]`"
                    .to_string(),
            )
        }
    };

    repo.update(guild_id, param).await?;
    Ok("Settings updated.".to_string())
}

/// Accepts a channel mention (`<#123>`) or a bare channel ID.
fn parse_channel_target(token: &str) -> Option<u64> {
    let token = token.trim();
    let id = token
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(token);
    id.parse().ok()
}

fn parse_toggle(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_positive(token: &str) -> Option<i32> {
    token.parse::<i32>().ok().filter(|&n| n > 0)
}
