//! Almanac (huangli) adapter against the mxnzp single-day API.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::cache::AlmanacInfo;
use crate::error::FetchError;
use crate::sources::{DataSource, Envelope};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlmanacData {
    yi: Vec<String>,
    ji: Vec<String>,
    type_desc: String,
}

pub struct HttpAlmanacSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAlmanacSource {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DataSource for HttpAlmanacSource {
    type Params = NaiveDate;
    type Payload = AlmanacInfo;

    async fn fetch(&self, date: NaiveDate) -> Result<AlmanacInfo, FetchError> {
        let envelope: Envelope<AlmanacData> = self
            .client
            .get(&self.base_url)
            .query(&[
                ("date", date.format("%Y%m%d").to_string()),
                ("ignoreHoliday", "false".to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;
        let data = envelope.into_data()?;

        Ok(AlmanacInfo {
            yi: data.yi.join("、"),
            ji: data.ji.join("、"),
            type_desc: data.type_desc,
        })
    }
}
