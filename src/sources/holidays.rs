//! Holiday-range adapter against the mxnzp month-list API.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::warn;

use crate::cache::HolidayInfo;
use crate::error::FetchError;
use crate::sources::{DataSource, Envelope};

pub struct HttpHolidaySource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHolidaySource {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DataSource for HttpHolidaySource {
    type Params = (i32, u32);
    type Payload = BTreeMap<String, HolidayInfo>;

    async fn fetch(&self, (year, month): (i32, u32)) -> Result<Self::Payload, FetchError> {
        let envelope: Envelope<Vec<HolidayInfo>> = self
            .client
            .get(&self.base_url)
            .query(&[
                ("month", format!("{year:04}-{month:02}")),
                ("ignoreHoliday", "false".to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(keyed_by_date(envelope.into_data()?))
    }
}

/// Index a month's listing by its ISO date. An entry whose date does not
/// parse would be unreachable by any month-keyed lookup, so it is dropped.
fn keyed_by_date(listing: Vec<HolidayInfo>) -> BTreeMap<String, HolidayInfo> {
    listing
        .into_iter()
        .filter(|info| {
            let valid = info.date.parse::<NaiveDate>().is_ok();
            if !valid {
                warn!(date = %info.date, "Dropping holiday entry with invalid date");
            }
            valid
        })
        .map(|info| (info.date.clone(), info))
        .collect()
}
