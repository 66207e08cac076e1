//! Assistant context: owns the configuration snapshot, cache store and
//! job scheduler, and binds job callbacks to the sync and notify paths.

use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{AlmanacInfo, CacheStore, HolidayInfo, NewsItem};
use crate::config::{self, Config};
use crate::error::ConfigError;
use crate::notify::Notifier;
use crate::scheduler::{compile, Job, JobKind, JobScheduler, TriggerSpec};
use crate::sources::SourceSet;
use crate::sync::{run_sync_pass, SyncReport};

/// Delay before the initial sync after startup.
const INITIAL_SYNC_DELAY: Duration = Duration::from_secs(1);

/// The running assistant: one instance per process, handed all of its
/// collaborators explicitly.
#[derive(Clone)]
pub struct Assistant {
    config: Arc<RwLock<Config>>,
    config_path: Option<PathBuf>,
    cache: Arc<CacheStore>,
    scheduler: Arc<JobScheduler>,
    sources: Arc<SourceSet>,
    notifier: Arc<dyn Notifier>,
}

impl Assistant {
    pub fn new(
        cfg: Config,
        config_path: Option<PathBuf>,
        cache: CacheStore,
        sources: SourceSet,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(cfg)),
            config_path,
            cache: Arc::new(cache),
            scheduler: Arc::new(JobScheduler::new()),
            sources: Arc::new(sources),
            notifier,
        }
    }

    pub fn scheduler(&self) -> &JobScheduler {
        &self.scheduler
    }

    pub async fn config_snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Install the compiled schedule and begin executing it, then kick off
    /// an initial sync shortly after startup.
    pub async fn start(&self) -> Result<()> {
        let cfg = self.config.read().await.clone();
        let jobs = self.build_jobs(&cfg)?;
        self.scheduler.replace_jobs(jobs).await;
        self.scheduler.start().await;

        let app = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(INITIAL_SYNC_DELAY).await;
            app.sync_now().await;
        });
        Ok(())
    }

    /// Halt future firings; an in-flight sync pass finishes first.
    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    /// Persist a new configuration and atomically swap the schedule derived
    /// from it. Jobs whose trigger is unchanged keep their next-fire time.
    pub async fn apply_config(&self, mut new_cfg: Config) -> Result<()> {
        new_cfg.normalize();
        // Compile first so an invalid config is rejected before persisting.
        let jobs = self.build_jobs(&new_cfg)?;
        config::save_config(&new_cfg, self.config_path.as_deref())?;
        *self.config.write().await = new_cfg;
        self.scheduler.replace_jobs(jobs).await;
        info!("Configuration applied, schedule replaced");
        Ok(())
    }

    /// Run one sync pass and surface its completion summary.
    pub async fn sync_now(&self) -> SyncReport {
        let cfg = self.config.read().await.clone();
        let report = run_sync_pass(&cfg, &self.sources, &self.cache).await;
        let (title, body) = report.summary();
        self.notifier.notify(&title, &body).await;
        report
    }

    // -- on-demand query surface --------------------------------------------

    pub async fn almanac_today(&self) -> Option<AlmanacInfo> {
        if !self.config.read().await.reminder.enable_huangli {
            return None;
        }
        self.cache.almanac_today().await
    }

    pub async fn upcoming_holidays(&self, limit: usize) -> Vec<HolidayInfo> {
        self.cache
            .upcoming_holidays(Local::now().date_naive(), limit)
            .await
    }

    pub async fn latest_news(&self) -> Vec<NewsItem> {
        self.cache.latest_news().await
    }

    // -- job wiring ---------------------------------------------------------

    fn build_jobs(&self, cfg: &Config) -> Result<Vec<Job>, ConfigError> {
        let specs = compile(cfg)?;
        Ok(specs.into_iter().map(|spec| self.bind(spec)).collect())
    }

    fn bind(&self, spec: TriggerSpec) -> Job {
        let app = self.clone();
        match spec.kind {
            JobKind::WorkStart | JobKind::WorkEnd => Job::new(spec, move || {
                let app = app.clone();
                async move { app.work_reminder().await }
            }),
            JobKind::Hydration => Job::new(spec, move || {
                let app = app.clone();
                async move { app.hydration_reminder().await }
            }),
            JobKind::DailySync => Job::new(spec, move || {
                let app = app.clone();
                async move {
                    app.sync_now().await;
                    Ok(())
                }
            }),
            JobKind::News => Job::new(spec, move || {
                let app = app.clone();
                async move { app.news_reminder().await }
            }),
        }
    }

    async fn work_reminder(&self) -> Result<()> {
        let mut body = String::from("Time to clock in or out. Stand up and stretch.");
        if let Some(almanac) = self.almanac_today().await {
            body.push_str(&format!("\n今日宜: {} 忌: {}", almanac.yi, almanac.ji));
        }
        self.notifier.notify("Work reminder", &body).await;
        Ok(())
    }

    async fn hydration_reminder(&self) -> Result<()> {
        self.notifier
            .notify("Hydration reminder", "Time to drink some water.")
            .await;
        Ok(())
    }

    async fn news_reminder(&self) -> Result<()> {
        let items = self.cache.latest_news().await;
        let body = if items.is_empty() {
            "No news cached yet.".to_string()
        } else {
            items
                .iter()
                .map(|i| i.title.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.notifier.notify("Today's news", &body).await;
        Ok(())
    }
}
