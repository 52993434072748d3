use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sea_orm::DatabaseConnection;
use serenity::async_trait;
use test_utils::builder::TestBuilder;
use test_utils::factory;

use super::*;
use crate::bot::platform::PollPlatform;
use crate::market::catalog::{parse_seed_csv, CatalogCache, SeedCatalog};
use crate::market::universe::{AssetUniverse, EvolutionMap};

struct SentPoll {
    channel_id: u64,
    answers: Vec<String>,
    duration_hours: u8,
}

/// In-memory platform double: records what was sent, serves preset vote
/// counts, optionally fails the tally fetch.
struct FakePlatform {
    counts: Vec<u64>,
    fail_fetch: bool,
    sent: Mutex<Vec<SentPoll>>,
    notices: Mutex<Vec<String>>,
    ended: Mutex<Vec<u64>>,
    next_message_id: AtomicU64,
}

impl FakePlatform {
    fn with_counts(counts: Vec<u64>) -> Arc<Self> {
        Arc::new(Self {
            counts,
            fail_fetch: false,
            sent: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            ended: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(5000),
        })
    }

    fn failing_fetch() -> Arc<Self> {
        Arc::new(Self {
            counts: Vec::new(),
            fail_fetch: true,
            sent: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            ended: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(5000),
        })
    }
}

#[async_trait]
impl PollPlatform for FakePlatform {
    async fn send_poll(
        &self,
        channel_id: u64,
        _question: &str,
        answers: &[String],
        duration_hours: u8,
    ) -> Result<u64, AppError> {
        self.sent.lock().unwrap().push(SentPoll {
            channel_id,
            answers: answers.to_vec(),
            duration_hours,
        });
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn send_notice(&self, _channel_id: u64, text: &str) -> Result<(), AppError> {
        self.notices.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn end_poll(&self, _channel_id: u64, message_id: u64) -> Result<(), AppError> {
        self.ended.lock().unwrap().push(message_id);
        Ok(())
    }

    async fn fetch_poll_counts(
        &self,
        _channel_id: u64,
        _message_id: u64,
    ) -> Result<Vec<u64>, AppError> {
        if self.fail_fetch {
            return Err(AppError::InternalError("fetch failed".to_string()));
        }
        Ok(self.counts.clone())
    }
}

/// Two base, same-gender assets in adjacent tiers with overlapping ranges:
/// the only matchup the matchmaker can produce.
fn two_asset_catalog() -> (SeedCatalog, AssetUniverse) {
    let universe = AssetUniverse::build(
        "name,genders\nGolden Abra,M\nGolden Eevee,M\n",
        &EvolutionMap::default(),
    );
    let catalog = parse_seed_csv("Abra|M,800kx-1mx\nEevee|M,950kx-1.15mx\n", &universe);
    assert!(catalog.is_valid());
    (catalog, universe)
}

fn engine_for(
    db: &DatabaseConnection,
    platform: Arc<dyn PollPlatform>,
    catalog: SeedCatalog,
    universe: AssetUniverse,
) -> MarketPollEngine {
    MarketPollEngine::with_rng(
        db.clone(),
        platform,
        CatalogCache::fixed(catalog, universe),
        StdRng::seed_from_u64(7),
    )
}

const PAIR_KEY: &str = "Abra|M||Eevee|M";

#[tokio::test]
async fn full_poll_lifecycle() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_settings(db, "42").await.unwrap();

    let platform = FakePlatform::with_counts(vec![8, 3]);
    let (catalog, universe) = two_asset_catalog();
    let engine = engine_for(db, platform.clone(), catalog, universe);

    // Post: the only eligible pair is selected.
    let outcome = engine.post_poll_for_guild("42").await.unwrap();
    let PostOutcome::Posted { pair_key, message_id } = outcome else {
        panic!("expected a posted poll, got {:?}", outcome);
    };
    assert_eq!(pair_key, PAIR_KEY);

    {
        let sent = platform.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].answers.len(), 2);
        // 120 configured minutes round up to 2 platform hours.
        assert_eq!(sent[0].duration_hours, 2);
    }
    assert_eq!(platform.notices.lock().unwrap().len(), 1);

    let run_repo = PollRunRepository::new(db);
    let far_future = Utc::now() + Duration::minutes(121);
    let due = run_repo.list_due(far_future, 25).await.unwrap();
    assert_eq!(due.len(), 1);
    let run = &due[0];
    assert_eq!(run.message_id, message_id.to_string());
    assert_eq!(run.ends_at - run.started_at, Duration::minutes(120));

    // The open pair blocks a second poll for the same matchup.
    let second = engine.post_poll_for_guild("42").await.unwrap();
    assert_eq!(second, PostOutcome::Skipped(SkipReason::NoEligiblePair));

    // Close after the run becomes due.
    let close_time = run.ends_at + Duration::seconds(30);
    assert_eq!(engine.close_due_runs(close_time).await, 1);
    assert_eq!(platform.ended.lock().unwrap().len(), 1);

    let history = run_repo.list_history(None, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    let closed = &history[0];
    assert_eq!(closed.result, Some(PollResult::Left));
    assert!(closed.affects_score);
    assert_eq!(closed.votes_left, Some(8));
    assert_eq!(closed.votes_right, Some(3));

    // The winning side gained rating, the losing side dropped.
    let scores = AssetScoreRepository::new(db)
        .get_for_assets(&[closed.left_keys[0].clone(), closed.right_keys[0].clone()])
        .await
        .unwrap();
    let winner = &scores[&closed.left_keys[0]];
    let loser = &scores[&closed.right_keys[0]];
    assert!(winner.elo > 1500.0);
    assert!(loser.elo < 1500.0);
    assert_eq!(winner.wins, 1);
    assert_eq!(winner.votes_for, 8);
    assert_eq!(winner.votes_against, 3);
    assert_eq!(loser.losses, 1);

    // Cooldown row created at close time + configured days.
    let cooldowns = PairCooldownRepository::new(db)
        .cooldown_map(close_time)
        .await
        .unwrap();
    assert_eq!(cooldowns.get(PAIR_KEY).copied(), Some(close_time + Duration::days(5)));

    // The pair stays unselectable until the cooldown expires.
    let third = engine.post_poll_for_guild("42").await.unwrap();
    assert_eq!(third, PostOutcome::Skipped(SkipReason::NoEligiblePair));
}

#[tokio::test]
async fn below_vote_floor_closes_without_rating() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_settings(db, "42").await.unwrap();

    let platform = FakePlatform::with_counts(vec![2, 1]);
    let (catalog, universe) = two_asset_catalog();
    let engine = engine_for(db, platform, catalog, universe);

    engine.post_poll_for_guild("42").await.unwrap();
    let close_time = Utc::now() + Duration::minutes(121);
    assert_eq!(engine.close_due_runs(close_time).await, 1);

    let history = PollRunRepository::new(db).list_history(None, 10).await.unwrap();
    assert_eq!(history[0].result, Some(PollResult::Left));
    assert!(!history[0].affects_score);

    // No score rows were written.
    let scores = AssetScoreRepository::new(db)
        .get_for_assets(&["Abra|M".to_string(), "Eevee|M".to_string()])
        .await
        .unwrap();
    assert!(scores.is_empty());

    // The pairing still cools down; an unrated poll was still a poll.
    let cooldowns = PairCooldownRepository::new(db).cooldown_map(close_time).await.unwrap();
    assert!(cooldowns.contains_key(PAIR_KEY));
}

#[tokio::test]
async fn tally_failure_converges_to_error_state() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_settings(db, "42").await.unwrap();

    let platform = FakePlatform::failing_fetch();
    let (catalog, universe) = two_asset_catalog();
    let engine = engine_for(db, platform, catalog, universe);

    engine.post_poll_for_guild("42").await.unwrap();
    let close_time = Utc::now() + Duration::minutes(121);
    assert_eq!(engine.close_due_runs(close_time).await, 1);

    let history = PollRunRepository::new(db).list_history(None, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].result, Some(PollResult::Error));
    assert!(!history[0].affects_score);

    // A closed run is never retried, even though its close errored.
    assert_eq!(engine.close_due_runs(close_time).await, 0);

    // Errored runs leave no cooldown and release the open-pair lock, so the
    // pair is immediately selectable again.
    assert!(PairCooldownRepository::new(db)
        .cooldown_map(close_time)
        .await
        .unwrap()
        .is_empty());
    let outcome = engine.post_poll_for_guild("42").await.unwrap();
    assert!(matches!(outcome, PostOutcome::Posted { .. }));
}

#[tokio::test]
async fn posting_gates_on_settings_and_catalog() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (catalog, universe) = two_asset_catalog();
    let platform = FakePlatform::with_counts(vec![0, 0]);
    let engine = engine_for(db, platform, catalog, universe);

    // Unconfigured guild: defaults are disabled.
    let outcome = engine.post_poll_for_guild("42").await.unwrap();
    assert_eq!(outcome, PostOutcome::Skipped(SkipReason::Disabled));

    // Enabled but no channel.
    factory::guild_settings::GuildSettingsFactory::new(db, "43")
        .channel_id(None)
        .build()
        .await
        .unwrap();
    let outcome = engine.post_poll_for_guild("43").await.unwrap();
    assert_eq!(outcome, PostOutcome::Skipped(SkipReason::NoChannel));
}

#[tokio::test]
async fn invalid_catalog_blocks_posting() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_settings(db, "42").await.unwrap();

    let universe = AssetUniverse::build(
        "name,genders\nGolden Abra,M\n",
        &EvolutionMap::default(),
    );
    let catalog = parse_seed_csv("Mewtwo|M,1mx\n", &universe);
    assert!(!catalog.is_valid());

    let platform = FakePlatform::with_counts(vec![0, 0]);
    let engine = engine_for(db, platform.clone(), catalog, universe);

    let outcome = engine.post_poll_for_guild("42").await.unwrap();
    assert_eq!(outcome, PostOutcome::Skipped(SkipReason::CatalogInvalid));
    assert!(platform.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scheduler_tick_logs_outcome_and_respects_cadence() {
    let test = TestBuilder::new().with_marketpoll_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    factory::create_settings(db, "42").await.unwrap();

    let platform = FakePlatform::with_counts(vec![8, 3]);
    let (catalog, universe) = two_asset_catalog();
    let engine = engine_for(db, platform.clone(), catalog, universe);

    // First tick: no prior scheduler run, so the guild is due immediately.
    engine.tick().await;
    assert_eq!(platform.sent.lock().unwrap().len(), 1);
    let last = SchedulerLogRepository::new(db).last_run_at("42").await.unwrap();
    assert!(last.is_some());

    // Second tick inside the cadence window: nothing new is posted.
    engine.tick().await;
    assert_eq!(platform.sent.lock().unwrap().len(), 1);
}

#[test]
fn poll_duration_rounds_up_and_clamps() {
    assert_eq!(poll_duration_hours(120), 2);
    assert_eq!(poll_duration_hours(90), 2);
    assert_eq!(poll_duration_hours(59), 1);
    assert_eq!(poll_duration_hours(60), 1);
    assert_eq!(poll_duration_hours(0), 1);
    assert_eq!(poll_duration_hours(10_000), 24);
}
