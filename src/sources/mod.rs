//! Data source adapters: one per remote data kind, behind a shared
//! fetch contract. The sync orchestrator treats all three identically and
//! never sees transport or payload-parsing details.

pub mod almanac;
pub mod holidays;
pub mod news;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{AlmanacInfo, HolidayInfo, NewsItem};
use crate::config::SourcesConfig;
use crate::error::FetchError;

/// Bounded execution time for a single fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// mxnzp API response wrapper shared by the almanac and holiday adapters.
/// `code` 1 means success; anything else carries the upstream message.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Envelope<T> {
    code: i64,
    msg: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_data(self) -> Result<T, FetchError> {
        if self.code != 1 {
            return Err(FetchError::Api {
                code: self.code,
                message: self.msg.unwrap_or_default(),
            });
        }
        self.data
            .ok_or_else(|| FetchError::Payload("missing data field".into()))
    }
}

/// Shared adapter contract: a single fetch operation returning a
/// slot-specific payload or a loggable failure.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Params: Send;
    type Payload: Send;

    async fn fetch(&self, params: Self::Params) -> Result<Self::Payload, FetchError>;
}

pub type AlmanacSource = dyn DataSource<Params = NaiveDate, Payload = AlmanacInfo>;
pub type HolidaySource =
    dyn DataSource<Params = (i32, u32), Payload = BTreeMap<String, HolidayInfo>>;
pub type NewsSource = dyn DataSource<Params = usize, Payload = Vec<NewsItem>>;

/// The three adapters a sync pass draws from.
pub struct SourceSet {
    pub almanac: Arc<AlmanacSource>,
    pub holidays: Arc<HolidaySource>,
    pub news: Arc<NewsSource>,
}

impl SourceSet {
    /// HTTP-backed adapters against the configured endpoints, sharing one
    /// client with the fetch timeout applied.
    pub fn over_http(cfg: &SourcesConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            almanac: Arc::new(almanac::HttpAlmanacSource::new(
                client.clone(),
                cfg.almanac_api.clone(),
            )),
            holidays: Arc::new(holidays::HttpHolidaySource::new(
                client.clone(),
                cfg.holiday_api.clone(),
            )),
            news: Arc::new(news::RssNewsSource::new(client, cfg.news_rss.clone())),
        })
    }
}

/// The rolling window: the current calendar month plus the following two,
/// with year rollover at December.
pub fn rolling_months(today: NaiveDate) -> [(i32, u32); 3] {
    let year = today.year();
    let month0 = today.month();
    std::array::from_fn(|offset| {
        let linear = month0 + offset as u32 - 1;
        (year + (linear / 12) as i32, linear % 12 + 1)
    })
}
