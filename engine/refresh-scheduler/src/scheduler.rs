use feed_cache::{CacheKey, CacheStore, CacheUpdate};
use feed_core::{
    verify_provenance, verify_scope, AdapterError, Clock, FetchOutcome, SourceAdapter, SourceId,
};
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, timeout_at, Instant};
use tracing::{debug, error, info, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::inflight::InFlightRegistry;
use crate::job::RefreshJob;
use crate::report::{FetchStatus, KeyOutcome, TickReport};

/// A job bound to the adapter that serves its source
struct ScheduledJob {
    job: Arc<RefreshJob>,
    adapter: Arc<dyn SourceAdapter>,
}

/// State shared between the scheduler handle and its job tasks
struct SchedulerInner {
    cache: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    jobs: Vec<ScheduledJob>,
    in_flight: Arc<InFlightRegistry<CacheKey>>,
    running_ticks: Arc<InFlightRegistry<String>>,
}

/// Drives every refresh job on its own cadence until shutdown
pub struct RefreshScheduler {
    inner: Arc<SchedulerInner>,
    shutdown_tx: watch::Sender<bool>,
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
    started: AtomicBool,
    shutdown_grace: Duration,
}

impl RefreshScheduler {
    /// Bind jobs to adapters and register every job key with the cache
    pub fn new(
        cache: Arc<CacheStore>,
        clock: Arc<dyn Clock>,
        adapters: Vec<Arc<dyn SourceAdapter>>,
        jobs: Vec<RefreshJob>,
        shutdown_grace: Duration,
    ) -> SchedulerResult<Self> {
        let by_source: HashMap<SourceId, Arc<dyn SourceAdapter>> =
            adapters.into_iter().map(|adapter| (adapter.source(), adapter)).collect();

        let mut scheduled = Vec::with_capacity(jobs.len());
        for job in jobs {
            let adapter = by_source.get(&job.source).cloned().ok_or_else(|| {
                SchedulerError::MissingAdapter { job: job.name.clone(), source_id: job.source }
            })?;
            for key in job.keys() {
                cache.register(key, job.ttl());
            }
            scheduled.push(ScheduledJob { job: Arc::new(job), adapter });
        }

        let (shutdown_tx, _) = watch::channel(false);
        Ok(Self {
            inner: Arc::new(SchedulerInner {
                cache,
                clock,
                jobs: scheduled,
                in_flight: Arc::new(InFlightRegistry::new()),
                running_ticks: Arc::new(InFlightRegistry::new()),
            }),
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
            shutdown_grace,
        })
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.inner.jobs.iter().map(|scheduled| scheduled.job.name.as_str()).collect()
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst) && !*self.shutdown_tx.borrow()
    }

    /// Spawn one task per job. Each runs a tick immediately, then sleeps for
    /// its policy interval between ticks.
    pub fn start(&self) -> SchedulerResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }
        info!("Starting refresh scheduler with {} jobs", self.inner.jobs.len());

        let mut handles = self.handles.lock();
        for index in 0..self.inner.jobs.len() {
            let inner = Arc::clone(&self.inner);
            let shutdown_rx = self.shutdown_tx.subscribe();
            let name = self.inner.jobs[index].job.name.clone();
            let handle = tokio::spawn(async move {
                run_job_loop(inner, index, shutdown_rx).await;
            });
            handles.push((name, handle));
        }
        Ok(())
    }

    /// Run one tick of `job_name` now, outside its schedule.
    ///
    /// Honors the same overlap rules as scheduled ticks.
    pub async fn refresh_now(&self, job_name: &str) -> SchedulerResult<TickReport> {
        let scheduled = self
            .inner
            .jobs
            .iter()
            .find(|scheduled| scheduled.job.name == job_name)
            .ok_or_else(|| SchedulerError::UnknownJob(job_name.to_string()))?;
        Ok(self.inner.run_tick(scheduled).await)
    }

    /// Signal every job to stop and wait for in-flight ticks.
    ///
    /// All jobs share one grace period; ticks still running when it ends are
    /// aborted. An aborted fetch is dropped before it reaches the cache, so
    /// nothing partial is written.
    pub async fn shutdown(&self) {
        info!("Stopping refresh scheduler...");
        let _ = self.shutdown_tx.send(true);

        let deadline = Instant::now() + self.shutdown_grace;
        let handles: Vec<(String, JoinHandle<()>)> = self.handles.lock().drain(..).collect();
        for (name, mut handle) in handles {
            match timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => debug!("Refresh job {} stopped", name),
                Ok(Err(e)) => error!("Refresh job {} task failed: {}", name, e),
                Err(_) => {
                    warn!(
                        "Refresh job {} did not stop within {:?}, abandoning in-flight fetches",
                        name, self.shutdown_grace
                    );
                    handle.abort();
                }
            }
        }
        info!("Refresh scheduler stopped");
    }

    #[cfg(test)]
    pub(crate) fn key_registry(&self) -> &Arc<InFlightRegistry<CacheKey>> {
        &self.inner.in_flight
    }
}

async fn run_job_loop(
    inner: Arc<SchedulerInner>,
    index: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let scheduled = &inner.jobs[index];
    let job = Arc::clone(&scheduled.job);
    info!("Starting refresh job {} ({} keys)", job.name, job.keys().len());

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        inner.run_tick(scheduled).await;

        let next = job.policy.interval_at(inner.clock.now());
        debug!("Next {} tick in {:?}", job.name, next);
        tokio::select! {
            _ = sleep(next) => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!("Refresh job {} stopped", job.name);
}

impl SchedulerInner {
    async fn run_tick(&self, scheduled: &ScheduledJob) -> TickReport {
        let job = &scheduled.job;
        let started_at = self.clock.now();

        let Some(_tick) = self.running_ticks.try_acquire(job.name.clone()) else {
            warn!("Previous {} tick still running, skipping", job.name);
            return TickReport::skipped(&job.name, started_at);
        };

        let permits = Semaphore::new(job.max_concurrent_fetches.max(1));
        let fetches = job
            .keys()
            .into_iter()
            .map(|key| self.refresh_key(&scheduled.adapter, key, job.fetch_timeout, &permits));
        let outcomes = join_all(fetches).await;

        let report = TickReport {
            job: job.name.clone(),
            started_at,
            finished_at: self.clock.now(),
            skipped: false,
            outcomes,
        };
        info!(
            "Tick {} complete: {} updated, {} failed, {} skipped",
            job.name,
            report.updated(),
            report.failed(),
            report.skipped_in_flight()
        );
        report
    }

    async fn refresh_key(
        &self,
        adapter: &Arc<dyn SourceAdapter>,
        key: CacheKey,
        fetch_timeout: Duration,
        permits: &Semaphore,
    ) -> KeyOutcome {
        let Some(_guard) = self.in_flight.try_acquire(key) else {
            warn!("Fetch for {} already in flight, skipping", key);
            return KeyOutcome { key, status: FetchStatus::SkippedInFlight };
        };
        let Ok(_permit) = permits.acquire().await else {
            return KeyOutcome { key, status: FetchStatus::SkippedInFlight };
        };

        let result = match timeout(fetch_timeout, adapter.fetch(key.data_type, key.league)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout(fetch_timeout)),
        };

        let update = classify(key, adapter.source(), result);
        let status = match &update {
            CacheUpdate::Success(records) => FetchStatus::Updated { records: records.len() },
            CacheUpdate::Failure(error) => {
                warn!("Refresh of {} failed: {}", key, error);
                FetchStatus::Failed { error: error.clone() }
            }
        };
        self.cache.put(key, update, self.clock.now());
        KeyOutcome { key, status }
    }
}

/// Turn an adapter result into the cache update for `key`
fn classify(
    key: CacheKey,
    source: SourceId,
    result: Result<FetchOutcome, AdapterError>,
) -> CacheUpdate {
    let checked = result.and_then(|outcome| match outcome {
        FetchOutcome::NoData => Ok(Vec::new()),
        FetchOutcome::Records(records) if records.is_empty() => {
            if key.data_type.empty_is_expected() {
                Ok(records)
            } else {
                Err(AdapterError::UnexpectedEmpty { source_id: source, data_type: key.data_type })
            }
        }
        FetchOutcome::Records(records) => {
            verify_provenance(source, &records)?;
            verify_scope(key.league, &records)?;
            Ok(records)
        }
    });

    match checked {
        Ok(records) => CacheUpdate::Success(records),
        Err(e) => CacheUpdate::Failure(e.to_string()),
    }
}
