//! The market poll engine: posting, closing and rating poll runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::DatabaseConnection;

use crate::bot::platform::PollPlatform;
use crate::data::asset_score::AssetScoreRepository;
use crate::data::guild_settings::GuildSettingsRepository;
use crate::data::pair_cooldown::PairCooldownRepository;
use crate::data::poll_run::PollRunRepository;
use crate::data::scheduler_log::SchedulerLogRepository;
use crate::error::AppError;
use crate::market::bundle::canonical_pair_key;
use crate::market::catalog::{CatalogCache, CatalogSnapshot};
use crate::market::elo::{apply_elo_from_votes_bundles, PollResult};
use crate::market::matchmaker::{select_candidate_matchup, MatchPolicy};
use crate::model::asset_score::AssetScore;
use crate::model::guild_settings::GuildSettings;
use crate::model::pair_cooldown::UpsertCooldownParam;
use crate::model::poll_run::{ClosePollRunParam, CreatePollRunParam, PollRun};
use crate::model::scheduler_log::{CreateSchedulerLogParam, SchedulerStatus};

/// Due runs processed per tick; anything beyond waits for the next one.
const CLOSE_BATCH_SIZE: u64 = 25;

/// Discord caps poll duration at this many hours.
const MAX_POLL_HOURS: u8 = 24;

const POLL_QUESTION: &str = "Which side would you rather trade for?";

/// Why a posting attempt did not produce a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NoChannel,
    CatalogInvalid,
    CatalogEmpty,
    NoEligiblePair,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::NoChannel => "no_channel",
            SkipReason::CatalogInvalid => "catalog_invalid",
            SkipReason::CatalogEmpty => "catalog_empty",
            SkipReason::NoEligiblePair => "no_eligible_pair",
        }
    }
}

/// Structured outcome of a posting attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Posted { pair_key: String, message_id: u64 },
    Skipped(SkipReason),
}

/// Owns everything the poll lifecycle needs: the database handle, the
/// platform seam, the catalog snapshot cache and a seedable RNG. Constructed
/// once at startup and shared between the scheduler and the command surface.
pub struct MarketPollEngine {
    db: DatabaseConnection,
    platform: Arc<dyn PollPlatform>,
    catalog: CatalogCache,
    match_policy: MatchPolicy,
    rng: Mutex<StdRng>,
    tick_in_flight: AtomicBool,
}

impl MarketPollEngine {
    pub fn new(
        db: DatabaseConnection,
        platform: Arc<dyn PollPlatform>,
        catalog: CatalogCache,
    ) -> Self {
        Self::with_rng(db, platform, catalog, StdRng::from_os_rng())
    }

    /// Engine with a caller-supplied RNG, for deterministic tests.
    pub fn with_rng(
        db: DatabaseConnection,
        platform: Arc<dyn PollPlatform>,
        catalog: CatalogCache,
        rng: StdRng,
    ) -> Self {
        Self {
            db,
            platform,
            catalog,
            match_policy: MatchPolicy::default(),
            rng: Mutex::new(rng),
            tick_in_flight: AtomicBool::new(false),
        }
    }

    /// Current catalog snapshot, reloading if the source files changed.
    pub async fn catalog_snapshot(&self) -> Arc<CatalogSnapshot> {
        self.catalog.snapshot().await
    }

    /// Attempts to post one poll for a guild.
    ///
    /// Returns a structured outcome; `Skipped` covers every expected
    /// no-poll condition, `Err` only infrastructure failures.
    pub async fn post_poll_for_guild(&self, guild_id: &str) -> Result<PostOutcome, AppError> {
        let settings = GuildSettingsRepository::new(&self.db)
            .get_or_default(guild_id)
            .await?;
        if !settings.enabled {
            return Ok(PostOutcome::Skipped(SkipReason::Disabled));
        }
        let Some(channel_id) = settings.channel_u64() else {
            return Ok(PostOutcome::Skipped(SkipReason::NoChannel));
        };

        let snapshot = self.catalog.snapshot().await;
        if !snapshot.catalog.is_valid() {
            return Ok(PostOutcome::Skipped(SkipReason::CatalogInvalid));
        }
        if snapshot.catalog.rows.is_empty() {
            return Ok(PostOutcome::Skipped(SkipReason::CatalogEmpty));
        }

        let open_pairs = PollRunRepository::new(&self.db).open_pair_keys(guild_id).await?;
        let now = Utc::now();
        let cooldowns = PairCooldownRepository::new(&self.db).cooldown_map(now).await?;

        // Matchmaking and the left/right coin flip happen under the RNG lock;
        // everything that awaits stays outside it.
        let (left, right, used_fallback_gender) = {
            let mut rng = self.rng.lock().expect("rng lock poisoned");
            let Some(matchup) = select_candidate_matchup(
                &snapshot.catalog.rows,
                &open_pairs,
                &cooldowns,
                &self.match_policy,
                &mut *rng,
            ) else {
                return Ok(PostOutcome::Skipped(SkipReason::NoEligiblePair));
            };
            // Random side assignment avoids a systematic left bias in the
            // published polls.
            if rng.random_bool(0.5) {
                (matchup.right, matchup.left, matchup.used_fallback_gender)
            } else {
                (matchup.left, matchup.right, matchup.used_fallback_gender)
            }
        };

        // Canonical key from the final assignment; symmetric either way.
        let pair_key = canonical_pair_key(&left.key(), &right.key());
        if used_fallback_gender {
            tracing::debug!("matchup {} fell back to mixed genders", pair_key);
        }

        let answers = vec![left.label(), right.label()];
        let message_id = self
            .platform
            .send_poll(
                channel_id,
                POLL_QUESTION,
                &answers,
                poll_duration_hours(settings.poll_minutes),
            )
            .await?;

        let started_at = now;
        let ends_at = started_at + Duration::minutes(i64::from(settings.poll_minutes));
        PollRunRepository::new(&self.db)
            .create(CreatePollRunParam {
                guild_id: guild_id.to_string(),
                channel_id: channel_id.to_string(),
                message_id: message_id.to_string(),
                pair_key: pair_key.clone(),
                left_keys: left.keys.clone(),
                right_keys: right.keys.clone(),
                started_at,
                ends_at,
            })
            .await?;

        // Best-effort notice; the poll itself is already up.
        let notice = format!("Voting closes in {} minutes.", settings.poll_minutes);
        if let Err(e) = self.platform.send_notice(channel_id, &notice).await {
            tracing::warn!("Failed to post closing notice for {}: {}", pair_key, e);
        }

        tracing::info!("Posted market poll {} in guild {}", pair_key, guild_id);
        Ok(PostOutcome::Posted { pair_key, message_id })
    }

    /// Closes every run due at `now`, isolating failures per run. Returns
    /// how many runs were processed.
    pub async fn close_due_runs(&self, now: DateTime<Utc>) -> usize {
        let run_repo = PollRunRepository::new(&self.db);
        let due = match run_repo.list_due(now, CLOSE_BATCH_SIZE).await {
            Ok(due) => due,
            Err(e) => {
                tracing::error!("Failed to list due poll runs: {}", e);
                return 0;
            }
        };

        let mut processed = 0;
        for run in due {
            processed += 1;
            if let Err(e) = self.close_run(&run, now).await {
                tracing::error!("Failed to close poll run {} ({}): {}", run.id, run.pair_key, e);
                // Converge to the error terminal state so the run can never
                // stay open and lock its pair out of matchmaking forever.
                if let Err(e) = run_repo.mark_error(run.id, now).await {
                    tracing::error!("Failed to mark poll run {} errored: {}", run.id, e);
                }
            }
        }
        processed
    }

    /// Closes one run: tally, rate, cool down, persist. Any error here sends
    /// the run to the error terminal state in `close_due_runs`.
    async fn close_run(&self, run: &PollRun, now: DateTime<Utc>) -> Result<(), AppError> {
        let channel_id = parse_id(&run.channel_id)?;
        let message_id = parse_id(&run.message_id)?;

        // Expired polls end on their own; a failure here is not fatal.
        if let Err(e) = self.platform.end_poll(channel_id, message_id).await {
            tracing::debug!("end_poll for run {} failed (ignored): {}", run.id, e);
        }

        let counts = self.platform.fetch_poll_counts(channel_id, message_id).await?;
        if counts.len() < 2 {
            return Err(AppError::InternalError(format!(
                "poll for run {} has {} answer(s), expected 2",
                run.id,
                counts.len()
            )));
        }
        let votes_left = counts[0];
        let votes_right = counts[1];

        let settings = GuildSettingsRepository::new(&self.db)
            .get_or_default(&run.guild_id)
            .await?;

        let all_keys: Vec<String> =
            run.left_keys.iter().chain(run.right_keys.iter()).cloned().collect();
        let mut known = AssetScoreRepository::new(&self.db).get_for_assets(&all_keys).await?;
        let left_scores: Vec<AssetScore> = run
            .left_keys
            .iter()
            .map(|key| known.remove(key).unwrap_or_else(|| AssetScore::default_for(key)))
            .collect();
        let right_scores: Vec<AssetScore> = run
            .right_keys
            .iter()
            .map(|key| known.remove(key).unwrap_or_else(|| AssetScore::default_for(key)))
            .collect();

        let outcome = apply_elo_from_votes_bundles(
            &left_scores.iter().map(|s| s.elo).collect::<Vec<_>>(),
            &right_scores.iter().map(|s| s.elo).collect::<Vec<_>>(),
            clamp_votes(votes_left),
            clamp_votes(votes_right),
            settings.min_votes.max(0) as u32,
        );

        if outcome.affects_score {
            let mut updates = Vec::with_capacity(all_keys.len());
            updates.extend(folded_scores(
                left_scores,
                &outcome.left,
                outcome.result,
                true,
                votes_left,
                votes_right,
                now,
            ));
            updates.extend(folded_scores(
                right_scores,
                &outcome.right,
                outcome.result,
                false,
                votes_right,
                votes_left,
                now,
            ));
            AssetScoreRepository::new(&self.db).upsert_many(&updates).await?;
        }

        PairCooldownRepository::new(&self.db)
            .upsert(UpsertCooldownParam {
                pair_key: run.pair_key.clone(),
                last_polled_at: now,
                next_eligible_at: now
                    + Duration::days(i64::from(settings.pair_cooldown_days)),
            })
            .await?;

        PollRunRepository::new(&self.db)
            .close(ClosePollRunParam {
                id: run.id,
                closed_at: now,
                votes_left: votes_left.min(i32::MAX as u64) as i32,
                votes_right: votes_right.min(i32::MAX as u64) as i32,
                result: outcome.result,
                affects_score: outcome.affects_score,
            })
            .await?;

        tracing::info!(
            "Closed poll run {} ({}): {} {}:{}{}",
            run.id,
            run.pair_key,
            outcome.result.as_str(),
            votes_left,
            votes_right,
            if outcome.affects_score { "" } else { " (below vote floor)" },
        );
        Ok(())
    }

    /// One scheduler tick: close due runs, then post for every enabled guild
    /// whose cadence has elapsed. Guarded against overlapping invocations;
    /// an overlapping tick is dropped, not queued.
    pub async fn tick(&self) {
        if self.tick_in_flight.swap(true, Ordering::SeqCst) {
            tracing::warn!("Previous market poll tick still running, dropping this one");
            return;
        }

        if let Err(e) = self.run_tick().await {
            tracing::error!("Market poll tick failed: {}", e);
        }

        self.tick_in_flight.store(false, Ordering::SeqCst);
    }

    async fn run_tick(&self) -> Result<(), AppError> {
        let now = Utc::now();
        self.close_due_runs(now).await;

        let enabled = GuildSettingsRepository::new(&self.db).list_enabled().await?;
        for settings in enabled {
            // Failures are isolated per guild; one bad guild must not starve
            // the rest of the tick.
            if let Err(e) = self.post_for_guild_if_due(&settings, now).await {
                tracing::error!(
                    "Scheduled posting failed for guild {}: {}",
                    settings.guild_id,
                    e
                );
            }
        }
        Ok(())
    }

    async fn post_for_guild_if_due(
        &self,
        settings: &GuildSettings,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let log_repo = SchedulerLogRepository::new(&self.db);
        let due = match log_repo.last_run_at(&settings.guild_id).await? {
            Some(last) => now - last >= Duration::minutes(i64::from(settings.cadence_minutes)),
            None => true,
        };
        if !due {
            return Ok(());
        }

        let (status, reason, pair_key, message_id) =
            match self.post_poll_for_guild(&settings.guild_id).await {
                Ok(PostOutcome::Posted { pair_key, message_id }) => (
                    SchedulerStatus::Posted,
                    None,
                    Some(pair_key),
                    Some(message_id.to_string()),
                ),
                Ok(PostOutcome::Skipped(reason)) => (
                    SchedulerStatus::Skipped,
                    Some(reason.as_str().to_string()),
                    None,
                    None,
                ),
                Err(e) => (SchedulerStatus::Error, Some(e.to_string()), None, None),
            };

        tracing::info!(
            "Scheduler outcome for guild {}: {}{}",
            settings.guild_id,
            status.as_str(),
            reason.as_deref().map(|r| format!(":{}", r)).unwrap_or_default(),
        );

        log_repo
            .create(CreateSchedulerLogParam {
                guild_id: settings.guild_id.clone(),
                run_at: now,
                status,
                reason,
                pair_key,
                message_id,
            })
            .await
            .map_err(AppError::from)
    }
}

/// Rounds the configured minute duration up to whole hours and clamps to
/// Discord's accepted range. The internal close schedule keeps minute
/// granularity; only the platform payload is coarsened.
fn poll_duration_hours(poll_minutes: i32) -> u8 {
    let hours = (i64::from(poll_minutes.max(1)) + 59) / 60;
    hours.clamp(1, i64::from(MAX_POLL_HOURS)) as u8
}

fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::InternalError(format!("malformed snowflake '{}'", raw)))
}

fn clamp_votes(votes: u64) -> u32 {
    votes.min(u64::from(u32::MAX)) as u32
}

/// Folds the Elo outcome and tallies back into a side's score records.
fn folded_scores(
    before: Vec<AssetScore>,
    new_elos: &[f64],
    result: PollResult,
    is_left: bool,
    votes_for: u64,
    votes_against: u64,
    now: DateTime<Utc>,
) -> Vec<AssetScore> {
    let won = matches!(
        (result, is_left),
        (PollResult::Left, true) | (PollResult::Right, false)
    );
    let lost = matches!(
        (result, is_left),
        (PollResult::Left, false) | (PollResult::Right, true)
    );

    before
        .into_iter()
        .zip(new_elos)
        .map(|(mut score, &elo)| {
            score.elo = elo;
            score.wins += i32::from(won);
            score.losses += i32::from(lost);
            score.ties += i32::from(result == PollResult::Tie);
            score.polls_count += 1;
            score.votes_for += votes_for.min(i32::MAX as u64) as i32;
            score.votes_against += votes_against.min(i32::MAX as u64) as i32;
            score.last_poll_at = Some(now);
            score
        })
        .collect()
}

#[cfg(test)]
mod test;
