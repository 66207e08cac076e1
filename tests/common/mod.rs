//! Shared test fixtures: canned data sources and a collecting notifier.
#![allow(dead_code)]

use async_trait::async_trait;
use proptest::prelude::*;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use deskmate::cache::{AlmanacInfo, HolidayInfo, NewsItem};
use deskmate::error::FetchError;
use deskmate::notify::Notifier;
use deskmate::config::Config;
use deskmate::sources::{AlmanacSource, DataSource, HolidaySource, NewsSource, SourceSet};

/// Property-test iteration count, kept low enough for CI.
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    }
}

/// Arbitrary configuration with valid work times and a drink interval
/// inside the accepted range.
pub fn arb_config() -> impl Strategy<Value = Config> {
    (
        0u32..24,
        0u32..60,
        0u32..24,
        0u32..60,
        30u32..=240,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(sh, sm, eh, em, interval, news, huangli)| {
            let mut cfg = Config::default();
            cfg.work.start = format!("{sh:02}:{sm:02}");
            cfg.work.end = format!("{eh:02}:{em:02}");
            cfg.reminder.drink_interval = interval;
            cfg.reminder.enable_news = news;
            cfg.reminder.enable_huangli = huangli;
            cfg
        })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn almanac_fixture() -> AlmanacInfo {
    AlmanacInfo {
        yi: "祭祀、出行".into(),
        ji: "动土、安葬".into(),
        type_desc: "工作日".into(),
    }
}

pub fn holiday(date: &str, off: bool) -> HolidayInfo {
    HolidayInfo {
        date: date.to_string(),
        type_des: "节假日".to_string(),
        is_off_day: off,
    }
}

pub fn headlines(count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|i| NewsItem {
            title: format!("headline {i}"),
            link: format!("http://news.example/{i}"),
        })
        .collect()
}

pub fn source_set(
    almanac: Arc<AlmanacSource>,
    holidays: Arc<HolidaySource>,
    news: Arc<NewsSource>,
) -> SourceSet {
    SourceSet {
        almanac,
        holidays,
        news,
    }
}

// ---------------------------------------------------------------------------
// Canned sources
// ---------------------------------------------------------------------------

/// Almanac source returning a fixed payload, or failing with the given
/// message.
pub struct FixedAlmanac(pub Result<AlmanacInfo, String>);

#[async_trait]
impl DataSource for FixedAlmanac {
    type Params = NaiveDate;
    type Payload = AlmanacInfo;

    async fn fetch(&self, _date: NaiveDate) -> Result<AlmanacInfo, FetchError> {
        match &self.0 {
            Ok(info) => Ok(info.clone()),
            Err(msg) => Err(FetchError::Payload(msg.clone())),
        }
    }
}

/// Holiday source with canned per-month listings; months not in the table
/// fail as the remote API would.
pub struct MonthTable(pub BTreeMap<(i32, u32), Vec<HolidayInfo>>);

#[async_trait]
impl DataSource for MonthTable {
    type Params = (i32, u32);
    type Payload = BTreeMap<String, HolidayInfo>;

    async fn fetch(
        &self,
        (year, month): (i32, u32),
    ) -> Result<BTreeMap<String, HolidayInfo>, FetchError> {
        match self.0.get(&(year, month)) {
            Some(list) => Ok(list
                .iter()
                .map(|info| (info.date.clone(), info.clone()))
                .collect()),
            None => Err(FetchError::Api {
                code: 0,
                message: format!("month {year:04}-{month:02} unavailable"),
            }),
        }
    }
}

/// News source returning a fixed list regardless of the requested limit.
pub struct FixedNews(pub Result<Vec<NewsItem>, String>);

#[async_trait]
impl DataSource for FixedNews {
    type Params = usize;
    type Payload = Vec<NewsItem>;

    async fn fetch(&self, _limit: usize) -> Result<Vec<NewsItem>, FetchError> {
        match &self.0 {
            Ok(items) => Ok(items.clone()),
            Err(msg) => Err(FetchError::Payload(msg.clone())),
        }
    }
}

/// News source that never responds, for timeout tests.
pub struct HangingNews;

#[async_trait]
impl DataSource for HangingNews {
    type Params = usize;
    type Payload = Vec<NewsItem>;

    async fn fetch(&self, _limit: usize) -> Result<Vec<NewsItem>, FetchError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(FetchError::Payload("unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Notifier that records every (title, body) pair it receives.
#[derive(Default, Clone)]
pub struct CollectingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn notify(&self, title: &str, body: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

impl CollectingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}
