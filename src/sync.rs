//! Sync orchestrator: one pass over the enabled data sources, merging
//! results into the cache with per-source failure isolation.

use chrono::{DateTime, Local, Utc};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{info, warn};

use crate::cache::{CacheStore, HolidayInfo, Slot};
use crate::config::Config;
use crate::error::FetchError;
use crate::sources::{rolling_months, SourceSet, FETCH_TIMEOUT};

/// Number of news items kept per sync.
pub const NEWS_ITEM_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Per-slot outcome of a sync pass. Transient: drives the cache update
/// notification, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Updated,
    /// Some but not all holiday month fetches succeeded; the slot was
    /// updated with the months that did.
    Partial { fetched: u32, failed: u32 },
    /// Slot disabled by configuration.
    Skipped,
    Failed(String),
}

impl SlotOutcome {
    fn failures(&self) -> u32 {
        match self {
            SlotOutcome::Partial { failed, .. } => *failed,
            SlotOutcome::Failed(_) => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for SlotOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotOutcome::Updated => write!(f, "updated"),
            SlotOutcome::Partial { fetched, failed } => {
                write!(f, "partial ({fetched} ok, {failed} failed)")
            }
            SlotOutcome::Skipped => write!(f, "disabled"),
            SlotOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub almanac: SlotOutcome,
    pub holidays: SlotOutcome,
    pub news: SlotOutcome,
    pub persisted: bool,
}

impl SyncReport {
    pub fn failure_count(&self) -> u32 {
        self.almanac.failures() + self.holidays.failures() + self.news.failures()
    }

    /// Notifier-ready completion summary.
    pub fn summary(&self) -> (String, String) {
        let failures = self.failure_count();
        let body = if failures == 0 {
            "Sync complete".to_string()
        } else {
            format!("Sync completed with {failures} failure(s)")
        };
        ("Data sync".to_string(), body)
    }
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

/// Run one sync pass at the current wall-clock time.
pub async fn run_sync_pass(cfg: &Config, sources: &SourceSet, cache: &CacheStore) -> SyncReport {
    run_sync_pass_at(cfg, sources, cache, Local::now()).await
}

/// Run one sync pass with an explicit pass timestamp. The timestamp fixes
/// both the rolling holiday window and the recorded per-slot fetch times,
/// so a pass is reproducible for a given clock.
pub async fn run_sync_pass_at(
    cfg: &Config,
    sources: &SourceSet,
    cache: &CacheStore,
    now: DateTime<Local>,
) -> SyncReport {
    let at = now.with_timezone(&Utc);
    let today = now.date_naive();

    let almanac = if cfg.reminder.enable_huangli {
        match bounded(sources.almanac.fetch(today)).await {
            Ok(info) => {
                cache.set_almanac(info, at).await;
                SlotOutcome::Updated
            }
            Err(e) => {
                warn!(slot = %Slot::Huangli, error = %e, "Fetch failed, keeping cached value");
                SlotOutcome::Failed(e.to_string())
            }
        }
    } else {
        SlotOutcome::Skipped
    };

    // Holidays are fetched unconditionally, one call per month of the
    // rolling window. Partial success updates the slot with whatever
    // months arrived; dates supplied earlier in the pass win.
    let months = rolling_months(today);
    let mut merged: BTreeMap<String, HolidayInfo> = BTreeMap::new();
    let mut ok_months: Vec<(i32, u32)> = Vec::new();
    let mut failed_months = 0u32;
    for &(year, month) in &months {
        match bounded(sources.holidays.fetch((year, month))).await {
            Ok(map) => {
                ok_months.push((year, month));
                for (date, info) in map {
                    merged.entry(date).or_insert(info);
                }
            }
            Err(e) => {
                failed_months += 1;
                warn!(year, month, error = %e, "Holiday month fetch failed");
            }
        }
    }
    let holidays = if ok_months.is_empty() {
        SlotOutcome::Failed(format!("all {} month fetches failed", months.len()))
    } else {
        cache.replace_holiday_months(&ok_months, merged, at).await;
        if failed_months == 0 {
            SlotOutcome::Updated
        } else {
            SlotOutcome::Partial {
                fetched: ok_months.len() as u32,
                failed: failed_months,
            }
        }
    };

    let news = if cfg.reminder.enable_news {
        match bounded(sources.news.fetch(NEWS_ITEM_LIMIT)).await {
            Ok(mut items) => {
                items.truncate(NEWS_ITEM_LIMIT);
                cache.set_news(items, at).await;
                SlotOutcome::Updated
            }
            Err(e) => {
                warn!(slot = %Slot::News, error = %e, "Fetch failed, keeping cached value");
                SlotOutcome::Failed(e.to_string())
            }
        }
    } else {
        SlotOutcome::Skipped
    };

    // One atomic write per pass, after every slot update for this pass.
    let persisted = match cache.persist().await {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %cache.path().display(), error = %e, "Cache persist failed, will retry next pass");
            false
        }
    };

    let report = SyncReport {
        almanac,
        holidays,
        news,
        persisted,
    };
    info!(failures = report.failure_count(), persisted, "Sync pass finished");
    report
}

/// Enforce the adapter timeout at the orchestrator boundary, so the
/// contract holds for any adapter implementation.
async fn bounded<T>(fut: impl Future<Output = Result<T, FetchError>>) -> Result<T, FetchError> {
    tokio::time::timeout(FETCH_TIMEOUT, fut)
        .await
        .map_err(|_| FetchError::Timeout(FETCH_TIMEOUT))?
}
