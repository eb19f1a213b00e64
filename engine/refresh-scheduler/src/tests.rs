//! Scheduler tests against scripted adapters

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feed_cache::{CacheKey, CacheStore};
use feed_core::{
    AdapterError, Clock, DataType, FetchOutcome, LeagueScope, ManualClock, Match, MatchStatus,
    NormalizedRecord, ScoreLine, SourceAdapter, SourceId, TeamSide,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::{FetchStatus, IntervalPolicy, RefreshJob, RefreshScheduler, SchedulerError};

type Responder =
    Box<dyn Fn(DataType, LeagueScope) -> Result<FetchOutcome, AdapterError> + Send + Sync>;

/// Adapter whose answers, latency and blocking are controlled by the test
struct ScriptedAdapter {
    source: SourceId,
    respond: Responder,
    gate: Option<Arc<Semaphore>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl ScriptedAdapter {
    fn new(
        source: SourceId,
        respond: impl Fn(DataType, LeagueScope) -> Result<FetchOutcome, AdapterError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            source,
            respond: Box::new(respond),
            gate: None,
            delay: None,
            calls: AtomicUsize::new(0),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
        }
    }

    /// Every fetch waits for a permit on `gate` before answering
    fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(
        &self,
        data_type: DataType,
        scope: LeagueScope,
    ) -> Result<FetchOutcome, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(running, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(data_type, scope)
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn side(id: i64, name: &str) -> TeamSide {
    TeamSide {
        team_id: Some(id),
        name: name.to_string(),
        short_name: String::new(),
        crest_url: String::new(),
    }
}

fn sample_match(source: SourceId, league: LeagueScope, match_id: i64) -> NormalizedRecord {
    NormalizedRecord::Match(Match {
        source,
        match_id,
        league,
        home: side(1, "Home FC"),
        away: side(2, "Away FC"),
        score: ScoreLine::default(),
        status: MatchStatus::Scheduled,
        minute: None,
        kickoff: t0(),
        venue: String::new(),
        round: String::new(),
        referee: String::new(),
    })
}

fn one_match_per_scope(
    source: SourceId,
) -> impl Fn(DataType, LeagueScope) -> Result<FetchOutcome, AdapterError> + Send + Sync + 'static {
    move |_, scope| Ok(FetchOutcome::Records(vec![sample_match(source, scope, 100)]))
}

fn job(
    name: &str,
    source: SourceId,
    data_types: Vec<DataType>,
    scopes: Vec<LeagueScope>,
) -> RefreshJob {
    RefreshJob {
        name: name.to_string(),
        source,
        policy: IntervalPolicy::Fixed(Duration::from_secs(1800)),
        data_types,
        scopes,
        fetch_timeout: Duration::from_secs(5),
        max_concurrent_fetches: 4,
    }
}

struct Harness {
    cache: Arc<CacheStore>,
    clock: Arc<ManualClock>,
    scheduler: Arc<RefreshScheduler>,
}

fn harness(adapter: Arc<ScriptedAdapter>, jobs: Vec<RefreshJob>) -> Harness {
    harness_with_grace(adapter, jobs, Duration::from_secs(1))
}

fn harness_with_grace(
    adapter: Arc<ScriptedAdapter>,
    jobs: Vec<RefreshJob>,
    grace: Duration,
) -> Harness {
    let cache = Arc::new(CacheStore::new());
    let clock = Arc::new(ManualClock::new(t0()));
    let scheduler = RefreshScheduler::new(
        Arc::clone(&cache),
        Arc::clone(&clock) as Arc<dyn Clock>,
        vec![adapter as Arc<dyn SourceAdapter>],
        jobs,
        grace,
    )
    .unwrap();
    Harness { cache, clock, scheduler: Arc::new(scheduler) }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[tokio::test]
    async fn test_tick_writes_every_key() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Sofascore,
            one_match_per_scope(SourceId::Sofascore),
        ));
        let h = harness(
            Arc::clone(&adapter),
            vec![job(
                "sofascore-leagues",
                SourceId::Sofascore,
                vec![DataType::Fixtures],
                vec![LeagueScope::ConferenceLeague, LeagueScope::Afc],
            )],
        );

        let report = h.scheduler.refresh_now("sofascore-leagues").await.unwrap();
        assert!(!report.skipped);
        assert_eq!(report.updated(), 2);
        assert_eq!(report.failed(), 0);
        assert_eq!(adapter.calls(), 2);

        let key = CacheKey::new(SourceId::Sofascore, DataType::Fixtures, LeagueScope::Afc);
        let entry = h.cache.get(&key).unwrap();
        assert_eq!(entry.records(), &[sample_match(SourceId::Sofascore, LeagueScope::Afc, 100)]);
        assert_eq!(entry.last_success_at, Some(t0()));
    }

    #[tokio::test]
    async fn test_keys_are_registered_before_first_tick() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Fixturedownload,
            one_match_per_scope(SourceId::Fixturedownload),
        ));
        let h = harness(
            adapter,
            vec![job(
                "fixturedownload",
                SourceId::Fixturedownload,
                vec![DataType::Fixtures],
                vec![LeagueScope::Isl, LeagueScope::Ifl],
            )],
        );

        let health = h.cache.health(t0());
        assert_eq!(health.len(), 2);
        assert!(health.iter().all(|entry| entry.stale && entry.last_success_at.is_none()));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_payload() {
        let failing = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&failing);
        let adapter = Arc::new(ScriptedAdapter::new(SourceId::Sofascore, move |_, scope| {
            if flag.load(Ordering::SeqCst) {
                Err(AdapterError::Status { status: 503, url: "http://feed/".to_string() })
            } else {
                Ok(FetchOutcome::Records(vec![sample_match(SourceId::Sofascore, scope, 7)]))
            }
        }));
        let h = harness(
            adapter,
            vec![job(
                "sofascore-leagues",
                SourceId::Sofascore,
                vec![DataType::Fixtures],
                vec![LeagueScope::Afc],
            )],
        );
        let key = CacheKey::new(SourceId::Sofascore, DataType::Fixtures, LeagueScope::Afc);

        h.scheduler.refresh_now("sofascore-leagues").await.unwrap();
        failing.store(true, Ordering::SeqCst);
        h.clock.advance(chrono::Duration::minutes(30));
        let report = h.scheduler.refresh_now("sofascore-leagues").await.unwrap();

        assert_eq!(report.failed(), 1);
        let entry = h.cache.get(&key).unwrap();
        assert_eq!(entry.records().len(), 1);
        assert_eq!(entry.last_success_at, Some(t0()));
        assert_eq!(entry.last_attempt_at, Some(t0() + chrono::Duration::minutes(30)));
        assert!(entry.last_error.as_deref().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_payload_only_allowed_for_live() {
        let adapter = Arc::new(ScriptedAdapter::new(SourceId::Sofascore, |_, _| {
            Ok(FetchOutcome::Records(Vec::new()))
        }));
        let h = harness(
            adapter,
            vec![
                job(
                    "standings",
                    SourceId::Sofascore,
                    vec![DataType::Standings],
                    vec![LeagueScope::Afc],
                ),
                job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc]),
            ],
        );

        let standings = h.scheduler.refresh_now("standings").await.unwrap();
        assert_eq!(standings.failed(), 1);
        let key = CacheKey::new(SourceId::Sofascore, DataType::Standings, LeagueScope::Afc);
        assert!(h.cache.get(&key).is_none());

        let live = h.scheduler.refresh_now("live").await.unwrap();
        assert_eq!(live.updated(), 1);
        let key = CacheKey::new(SourceId::Sofascore, DataType::Live, LeagueScope::Afc);
        assert!(h.cache.get(&key).unwrap().records().is_empty());
    }

    #[tokio::test]
    async fn test_no_data_is_a_successful_empty_refresh() {
        let adapter = Arc::new(ScriptedAdapter::new(SourceId::Fixturedownload, |_, _| {
            Ok(FetchOutcome::NoData)
        }));
        let h = harness(
            adapter,
            vec![job(
                "fixturedownload",
                SourceId::Fixturedownload,
                vec![DataType::Fixtures],
                vec![LeagueScope::Ifl],
            )],
        );

        let report = h.scheduler.refresh_now("fixturedownload").await.unwrap();
        let key = CacheKey::new(SourceId::Fixturedownload, DataType::Fixtures, LeagueScope::Ifl);
        assert_eq!(report.status_of(&key), Some(&FetchStatus::Updated { records: 0 }));
        let entry = h.cache.get(&key).unwrap();
        assert!(entry.records().is_empty());
        assert!(entry.last_error.is_none());
    }

    #[tokio::test]
    async fn test_records_from_another_source_are_rejected() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Sofascore,
            one_match_per_scope(SourceId::FootballData),
        ));
        let h = harness(
            adapter,
            vec![job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc])],
        );

        let report = h.scheduler.refresh_now("live").await.unwrap();
        assert_eq!(report.failed(), 1);
        let key = CacheKey::new(SourceId::Sofascore, DataType::Live, LeagueScope::Afc);
        assert!(h.cache.get(&key).is_none());
    }

    #[tokio::test]
    async fn test_records_for_another_league_are_rejected() {
        let adapter = Arc::new(ScriptedAdapter::new(SourceId::Sofascore, |_, _| {
            Ok(FetchOutcome::Records(vec![sample_match(
                SourceId::Sofascore,
                LeagueScope::ConferenceLeague,
                1,
            )]))
        }));
        let h = harness(
            adapter,
            vec![job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc])],
        );

        let report = h.scheduler.refresh_now("live").await.unwrap();
        match &report.outcomes[0].status {
            FetchStatus::Failed { error } => assert!(error.contains("afc")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        let adapter = Arc::new(
            ScriptedAdapter::new(SourceId::Sofascore, one_match_per_scope(SourceId::Sofascore))
                .delayed(Duration::from_secs(30)),
        );
        let mut slow =
            job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc]);
        slow.fetch_timeout = Duration::from_secs(10);
        let h = harness(adapter, vec![slow]);

        let report = h.scheduler.refresh_now("live").await.unwrap();
        match &report.outcomes[0].status {
            FetchStatus::Failed { error } => assert!(error.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(h.scheduler.key_registry().active_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrency_limit_is_respected() {
        let adapter = Arc::new(
            ScriptedAdapter::new(
                SourceId::FootballData,
                one_match_per_scope(SourceId::FootballData),
            )
            .delayed(Duration::from_millis(10)),
        );
        let mut fd = job(
            "football-data",
            SourceId::FootballData,
            vec![DataType::Fixtures],
            LeagueScope::with_fixtures_from(SourceId::FootballData),
        );
        fd.max_concurrent_fetches = 1;
        let h = harness(Arc::clone(&adapter), vec![fd]);

        let report = h.scheduler.refresh_now("football-data").await.unwrap();
        assert_eq!(report.updated(), 8);
        assert_eq!(adapter.max_running.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let adapter =
            Arc::new(ScriptedAdapter::new(SourceId::Sofascore, |_, _| Ok(FetchOutcome::NoData)));
        let h = harness(adapter, Vec::new());
        assert!(matches!(
            h.scheduler.refresh_now("nope").await,
            Err(SchedulerError::UnknownJob(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_missing_adapter_is_rejected() {
        let adapter: Arc<dyn SourceAdapter> =
            Arc::new(ScriptedAdapter::new(SourceId::Sofascore, |_, _| Ok(FetchOutcome::NoData)));
        let result = RefreshScheduler::new(
            Arc::new(CacheStore::new()),
            Arc::new(ManualClock::new(t0())),
            vec![adapter],
            vec![job(
                "fd",
                SourceId::FootballData,
                vec![DataType::Fixtures],
                vec![LeagueScope::PremierLeague],
            )],
            Duration::from_secs(1),
        );
        assert!(matches!(
            result,
            Err(SchedulerError::MissingAdapter { source_id: SourceId::FootballData, .. })
        ));
    }
}

#[cfg(test)]
mod overlap_tests {
    use super::*;

    #[tokio::test]
    async fn test_overlapping_tick_is_skipped() {
        let gate = Arc::new(Semaphore::new(0));
        let adapter = Arc::new(
            ScriptedAdapter::new(SourceId::Sofascore, one_match_per_scope(SourceId::Sofascore))
                .gated(Arc::clone(&gate)),
        );
        let h = harness(
            Arc::clone(&adapter),
            vec![job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc])],
        );

        let scheduler = Arc::clone(&h.scheduler);
        let first = tokio::spawn(async move { scheduler.refresh_now("live").await });
        wait_until(|| adapter.calls() == 1).await;

        let second = h.scheduler.refresh_now("live").await.unwrap();
        assert!(second.skipped);
        assert!(second.outcomes.is_empty());
        assert_eq!(adapter.calls(), 1);

        gate.add_permits(1);
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.updated(), 1);
    }

    #[tokio::test]
    async fn test_key_already_in_flight_is_skipped() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Sofascore,
            one_match_per_scope(SourceId::Sofascore),
        ));
        let h = harness(
            Arc::clone(&adapter),
            vec![job(
                "live",
                SourceId::Sofascore,
                vec![DataType::Live],
                vec![LeagueScope::Afc, LeagueScope::ConferenceLeague],
            )],
        );

        let held = CacheKey::new(SourceId::Sofascore, DataType::Live, LeagueScope::Afc);
        let guard = h.scheduler.key_registry().try_acquire(held).unwrap();

        let report = h.scheduler.refresh_now("live").await.unwrap();
        assert_eq!(report.status_of(&held), Some(&FetchStatus::SkippedInFlight));
        assert_eq!(report.updated(), 1);
        assert_eq!(adapter.calls(), 1);
        assert!(h.cache.get(&held).is_none());

        drop(guard);
        let report = h.scheduler.refresh_now("live").await.unwrap();
        assert_eq!(report.updated(), 2);
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_tick_runs_on_start() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Sofascore,
            one_match_per_scope(SourceId::Sofascore),
        ));
        let h = harness(
            Arc::clone(&adapter),
            vec![job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc])],
        );

        h.scheduler.start().unwrap();
        assert!(h.scheduler.is_running());
        wait_until(|| adapter.calls() == 1).await;
        let key = CacheKey::new(SourceId::Sofascore, DataType::Live, LeagueScope::Afc);
        wait_until(|| h.cache.get(&key).is_some()).await;

        h.scheduler.shutdown().await;
        assert!(!h.scheduler.is_running());
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let adapter =
            Arc::new(ScriptedAdapter::new(SourceId::Sofascore, |_, _| Ok(FetchOutcome::NoData)));
        let h = harness(adapter, Vec::new());
        h.scheduler.start().unwrap();
        assert!(matches!(h.scheduler.start(), Err(SchedulerError::AlreadyRunning)));
        h.scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_repeats_on_its_interval() {
        let adapter = Arc::new(ScriptedAdapter::new(
            SourceId::Sofascore,
            one_match_per_scope(SourceId::Sofascore),
        ));
        let mut live =
            job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc]);
        live.policy = IntervalPolicy::Fixed(Duration::from_secs(1));
        let h = harness(Arc::clone(&adapter), vec![live]);

        let started = tokio::time::Instant::now();
        h.scheduler.start().unwrap();
        wait_until(|| adapter.calls() >= 3).await;
        // Ticks at 0, 1 and 2 seconds
        assert!(started.elapsed() >= Duration::from_secs(2));
        h.scheduler.shutdown().await;

        let after_shutdown = adapter.calls();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(adapter.calls(), after_shutdown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_abandons_stuck_fetch_after_grace() {
        let gate = Arc::new(Semaphore::new(0));
        let adapter = Arc::new(
            ScriptedAdapter::new(SourceId::Sofascore, one_match_per_scope(SourceId::Sofascore))
                .gated(gate),
        );
        let mut stuck =
            job("live", SourceId::Sofascore, vec![DataType::Live], vec![LeagueScope::Afc]);
        stuck.fetch_timeout = Duration::from_secs(3600);
        let grace = Duration::from_secs(10);
        let h = harness_with_grace(Arc::clone(&adapter), vec![stuck], grace);

        h.scheduler.start().unwrap();
        wait_until(|| adapter.calls() == 1).await;

        let started = tokio::time::Instant::now();
        h.scheduler.shutdown().await;
        assert!(started.elapsed() >= grace);
        assert!(started.elapsed() < grace * 2);

        let key = CacheKey::new(SourceId::Sofascore, DataType::Live, LeagueScope::Afc);
        assert!(h.cache.get(&key).is_none());
        let registry = Arc::clone(h.scheduler.key_registry());
        wait_until(|| registry.active_count() == 0).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_jobs_share_one_grace_period() {
        let gate = Arc::new(Semaphore::new(0));
        let adapter = Arc::new(
            ScriptedAdapter::new(SourceId::Sofascore, one_match_per_scope(SourceId::Sofascore))
                .gated(gate),
        );
        let scopes = [
            LeagueScope::PremierLeague,
            LeagueScope::LaLiga,
            LeagueScope::SerieA,
            LeagueScope::Afc,
        ];
        let jobs: Vec<RefreshJob> = scopes
            .iter()
            .map(|scope| {
                let name = format!("live-{scope}");
                let mut stuck =
                    job(&name, SourceId::Sofascore, vec![DataType::Live], vec![*scope]);
                stuck.fetch_timeout = Duration::from_secs(3600);
                stuck
            })
            .collect();
        let grace = Duration::from_secs(10);
        let h = harness_with_grace(Arc::clone(&adapter), jobs, grace);

        h.scheduler.start().unwrap();
        wait_until(|| adapter.calls() == scopes.len()).await;

        let started = tokio::time::Instant::now();
        h.scheduler.shutdown().await;
        assert!(started.elapsed() >= grace);
        assert!(started.elapsed() < grace * 2, "shutdown took {:?}", started.elapsed());

        let registry = Arc::clone(h.scheduler.key_registry());
        wait_until(|| registry.active_count() == 0).await;
        assert!(h.cache.health(t0()).iter().all(|entry| entry.last_attempt_at.is_none()));
    }
}
