//! Service state and component wiring

use anyhow::{Context, Result};
use feed_adapters::HttpFeedAdapter;
use feed_cache::CacheStore;
use feed_core::{Clock, SourceAdapter, SystemClock};
use parking_lot::Mutex;
use refresh_scheduler::{default_jobs, RefreshScheduler};
use score_query::{HealthReport, HealthStatus, ScoreQuery};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::ServiceConfig;

/// Every component of a running feed engine.
///
/// The cache is built here and handed to both the scheduler (the only writer)
/// and the query layer.
pub struct Goal2GolService {
    config: ServiceConfig,
    cache: Arc<CacheStore>,
    scheduler: RefreshScheduler,
    query: ScoreQuery,
    health_tx: watch::Sender<bool>,
    health_task: Mutex<Option<JoinHandle<()>>>,
}

impl Goal2GolService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ServiceConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        info!("Initializing service components...");
        let cache = Arc::new(CacheStore::new());

        info!("Initializing feed adapters...");
        let adapters: Vec<Arc<dyn SourceAdapter>> = HttpFeedAdapter::all_from_config(&config.feeds)
            .context("Failed to create feed adapters")?
            .into_iter()
            .map(|adapter| Arc::new(adapter) as Arc<dyn SourceAdapter>)
            .collect();

        info!("Initializing RefreshScheduler...");
        let jobs = default_jobs(&config.scheduler).context("Failed to build refresh jobs")?;
        let scheduler = RefreshScheduler::new(
            Arc::clone(&cache),
            Arc::clone(&clock),
            adapters,
            jobs,
            config.scheduler.shutdown_grace(),
        )
        .context("Failed to create RefreshScheduler")?;
        info!("Refresh jobs: {}", scheduler.job_names().join(", "));

        let query = ScoreQuery::new(Arc::clone(&cache), clock);
        let (health_tx, _) = watch::channel(false);

        Ok(Self { config, cache, scheduler, query, health_tx, health_task: Mutex::new(None) })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn query(&self) -> &ScoreQuery {
        &self.query
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Start the refresh jobs and the periodic freshness report
    pub fn start(&self) -> Result<()> {
        self.scheduler.start().context("Failed to start RefreshScheduler")?;

        let query = self.query.clone();
        let interval = self.config.service.health_report_interval();
        let shutdown_rx = self.health_tx.subscribe();
        let handle = tokio::spawn(async move {
            run_health_reporter(query, interval, shutdown_rx).await;
        });
        *self.health_task.lock() = Some(handle);

        info!("Goal2Gol service started");
        Ok(())
    }

    /// Stop the scheduler, then the health reporter
    pub async fn shutdown(&self) {
        info!("Shutting down Goal2Gol service...");
        self.scheduler.shutdown().await;

        let _ = self.health_tx.send(true);
        let handle = self.health_task.lock().take();
        if let Some(mut handle) = handle {
            let limit = self.config.service.shutdown_timeout();
            match timeout(limit, &mut handle).await {
                Ok(Ok(())) => debug!("Health reporter stopped"),
                Ok(Err(e)) => error!("Health reporter task failed: {}", e),
                Err(_) => {
                    warn!("Health reporter did not stop within {:?}", limit);
                    handle.abort();
                }
            }
        }

        log_health(&self.query.health());
        info!("Goal2Gol service shutdown complete");
    }
}

async fn run_health_reporter(
    query: ScoreQuery,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = sleep(interval) => log_health(&query.health()),
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
}

/// Key counts from one health report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthSummary {
    pub total: usize,
    pub fresh: usize,
    pub stale: usize,
    /// Last attempt failed
    pub failing: usize,
    pub never_succeeded: usize,
}

pub fn summarize(report: &HealthReport) -> HealthSummary {
    report.keys.iter().fold(
        HealthSummary { total: report.keys.len(), ..Default::default() },
        |mut summary, key| {
            if key.stale {
                summary.stale += 1;
            } else {
                summary.fresh += 1;
            }
            if key.last_error.is_some() {
                summary.failing += 1;
            }
            if key.last_success_at.is_none() {
                summary.never_succeeded += 1;
            }
            summary
        },
    )
}

fn log_health(report: &HealthReport) {
    let summary = summarize(report);
    let status = match report.status {
        HealthStatus::Healthy => "healthy",
        HealthStatus::WarmingUp => "warming_up",
    };
    info!(
        status,
        live_ready = report.live_ready,
        fixtures_ready = report.fixtures_ready,
        indian_ready = report.indian_ready,
        "Cache freshness: {} keys, {} fresh, {} stale, {} failing",
        summary.total,
        summary.fresh,
        summary.stale,
        summary.failing
    );
    for key in report.keys.iter().filter(|key| key.stale) {
        match &key.last_error {
            Some(last_error) => warn!("Stale key {}: {}", key.key, last_error),
            None => debug!("Stale key {} (age {:?}s)", key.key, key.age_secs),
        }
    }
}
