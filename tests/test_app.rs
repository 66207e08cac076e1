//! Assistant-level behavior: sync notifications, live config replacement
//! and the on-demand query surface.

mod common;

use chrono::Local;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

use common::{almanac_fixture, headlines, holiday, source_set, CollectingNotifier, FixedAlmanac, FixedNews, MonthTable};
use deskmate::app::Assistant;
use deskmate::cache::CacheStore;
use deskmate::config::Config;
use deskmate::scheduler::JobKind;
use deskmate::sources::rolling_months;

/// Month table covering the current rolling window, so a pass driven by the
/// real clock updates every month.
fn live_month_table() -> MonthTable {
    let today = Local::now().date_naive();
    let mut table = BTreeMap::new();
    for (year, month) in rolling_months(today) {
        table.insert(
            (year, month),
            vec![holiday(&format!("{year:04}-{month:02}-28"), true)],
        );
    }
    MonthTable(table)
}

fn assistant_in(dir: &TempDir, cfg: Config) -> (Assistant, CollectingNotifier) {
    let notifier = CollectingNotifier::default();
    let app = Assistant::new(
        cfg,
        Some(dir.path().join("config.json")),
        CacheStore::load(dir.path().join("cache.json")),
        source_set(
            Arc::new(FixedAlmanac(Ok(almanac_fixture()))),
            Arc::new(live_month_table()),
            Arc::new(FixedNews(Ok(headlines(3)))),
        ),
        Arc::new(notifier.clone()),
    );
    (app, notifier)
}

#[tokio::test]
async fn sync_now_notifies_with_the_pass_summary() {
    let dir = TempDir::new().unwrap();
    let (app, notifier) = assistant_in(&dir, Config::default());

    let report = app.sync_now().await;
    assert_eq!(report.failure_count(), 0);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0], ("Data sync".to_string(), "Sync complete".to_string()));
}

#[tokio::test]
async fn apply_config_persists_and_swaps_the_schedule() {
    let dir = TempDir::new().unwrap();
    let (app, _) = assistant_in(&dir, Config::default());
    app.start().await.unwrap();
    assert_eq!(app.scheduler().active_triggers().await.len(), 5);

    let mut cfg = app.config_snapshot().await;
    cfg.reminder.enable_news = false;
    cfg.reminder.drink_interval = 9999; // clamped by normalize
    app.apply_config(cfg).await.unwrap();

    let triggers = app.scheduler().active_triggers().await;
    assert_eq!(triggers.len(), 4);
    assert!(!triggers.iter().any(|t| t.kind == JobKind::News));

    let saved: Config = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("config.json")).unwrap(),
    )
    .unwrap();
    assert!(!saved.reminder.enable_news);
    assert_eq!(saved.reminder.drink_interval, 240);

    app.stop().await;
}

#[tokio::test]
async fn invalid_config_is_rejected_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let (app, _) = assistant_in(&dir, Config::default());
    app.start().await.unwrap();

    let mut cfg = app.config_snapshot().await;
    cfg.work.start = "nonsense".into();
    assert!(app.apply_config(cfg).await.is_err());

    // Nothing persisted, nothing replaced.
    assert!(!dir.path().join("config.json").exists());
    assert_eq!(app.scheduler().active_triggers().await.len(), 5);
    assert_eq!(app.config_snapshot().await.work.start, "09:00");

    app.stop().await;
}

#[tokio::test]
async fn almanac_query_is_gated_by_configuration() {
    let dir = TempDir::new().unwrap();
    let (app, _) = assistant_in(&dir, Config::default());

    app.sync_now().await;
    assert_eq!(app.almanac_today().await, Some(almanac_fixture()));

    let mut cfg = app.config_snapshot().await;
    cfg.reminder.enable_huangli = false;
    app.apply_config(cfg).await.unwrap();

    assert_eq!(app.almanac_today().await, None, "disabled slot must not surface");
    assert_eq!(app.latest_news().await, headlines(3));
}

#[tokio::test]
async fn upcoming_holidays_are_served_from_the_cache() {
    let dir = TempDir::new().unwrap();
    let (app, _) = assistant_in(&dir, Config::default());

    app.sync_now().await;
    let holidays = app.upcoming_holidays(5).await;
    assert!(!holidays.is_empty());
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(holidays.iter().all(|h| h.date >= today));
}
