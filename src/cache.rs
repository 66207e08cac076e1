//! Cache store: persisted slots for almanac, holidays and news data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::PersistError;

// ---------------------------------------------------------------------------
// Slot payloads
// ---------------------------------------------------------------------------

/// One named category of cached remote data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Huangli,
    Holidays,
    News,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Huangli => write!(f, "huangli"),
            Slot::Holidays => write!(f, "holidays"),
            Slot::News => write!(f, "news"),
        }
    }
}

/// Daily almanac: auspicious/inauspicious activities and the day type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlmanacInfo {
    pub yi: String,
    pub ji: String,
    #[serde(rename = "type")]
    pub type_desc: String,
}

/// One holiday calendar entry, keyed in the cache by its ISO date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayInfo {
    pub date: String,
    pub type_des: String,
    pub is_off_day: bool,
}

/// News headline with its link; serialized as a `[title, link]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct NewsItem {
    pub title: String,
    pub link: String,
}

impl From<(String, String)> for NewsItem {
    fn from((title, link): (String, String)) -> Self {
        Self { title, link }
    }
}

impl From<NewsItem> for (String, String) {
    fn from(item: NewsItem) -> Self {
        (item.title, item.link)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The persisted `cache.json` document. `fetchedAt` records the per-slot
/// fetch timestamp and is absent on documents written by older versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    #[serde(default)]
    pub huangli: Option<AlmanacInfo>,
    #[serde(default)]
    pub holidays: BTreeMap<String, HolidayInfo>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub fetched_at: BTreeMap<Slot, DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Durable cache shared between the sync orchestrator (single writer per
/// pass) and reminder callbacks (snapshot readers).
pub struct CacheStore {
    path: PathBuf,
    doc: RwLock<CacheDocument>,
}

impl CacheStore {
    /// Load the cache from disk, starting empty if the file is missing or
    /// unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cache unparsable, starting empty");
                    CacheDocument::default()
                }
            },
            Err(_) => CacheDocument::default(),
        };
        Self {
            path,
            doc: RwLock::new(doc),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consistent point-in-time copy of the whole document.
    pub async fn snapshot(&self) -> CacheDocument {
        self.doc.read().await.clone()
    }

    pub async fn set_almanac(&self, info: AlmanacInfo, at: DateTime<Utc>) {
        let mut doc = self.doc.write().await;
        doc.huangli = Some(info);
        doc.fetched_at.insert(Slot::Huangli, at);
    }

    /// Replace the cached entries for the given months with `fetched`.
    ///
    /// Only dates belonging to `months` are dropped before the merge;
    /// entries for any other month stay until a future pass fetches their
    /// month again. Months that roll out of the window are never purged.
    pub async fn replace_holiday_months(
        &self,
        months: &[(i32, u32)],
        fetched: BTreeMap<String, HolidayInfo>,
        at: DateTime<Utc>,
    ) {
        let prefixes: Vec<String> = months
            .iter()
            .map(|(year, month)| format!("{year:04}-{month:02}-"))
            .collect();

        let mut doc = self.doc.write().await;
        doc.holidays
            .retain(|date, _| !prefixes.iter().any(|p| date.starts_with(p.as_str())));
        // A key that is not an ISO date can never match a month prefix, so
        // it could never be replaced once stored.
        doc.holidays.extend(
            fetched
                .into_iter()
                .filter(|(date, _)| date.parse::<NaiveDate>().is_ok()),
        );
        doc.fetched_at.insert(Slot::Holidays, at);
    }

    pub async fn set_news(&self, items: Vec<NewsItem>, at: DateTime<Utc>) {
        let mut doc = self.doc.write().await;
        doc.news = items;
        doc.fetched_at.insert(Slot::News, at);
    }

    /// Write the document to disk atomically (temp file + rename), so a
    /// crash mid-write cannot leave a corrupt cache.
    pub async fn persist(&self) -> Result<(), PersistError> {
        let json = {
            let doc = self.doc.read().await;
            serde_json::to_string_pretty(&*doc)?
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    // -- query surface ------------------------------------------------------

    pub async fn almanac_today(&self) -> Option<AlmanacInfo> {
        self.doc.read().await.huangli.clone()
    }

    /// Holidays with date >= `today`, ascending, at most `limit` entries.
    pub async fn upcoming_holidays(&self, today: NaiveDate, limit: usize) -> Vec<HolidayInfo> {
        let doc = self.doc.read().await;
        doc.holidays
            .iter()
            .filter(|(date, _)| {
                date.parse::<NaiveDate>()
                    .map(|d| d >= today)
                    .unwrap_or(false)
            })
            .take(limit)
            .map(|(_, info)| info.clone())
            .collect()
    }

    pub async fn latest_news(&self) -> Vec<NewsItem> {
        self.doc.read().await.news.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(date: &str, off: bool) -> HolidayInfo {
        HolidayInfo {
            date: date.to_string(),
            type_des: "节假日".to_string(),
            is_off_day: off,
        }
    }

    #[tokio::test]
    async fn persist_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = CacheStore::load(&path);
        let at = Utc::now();
        store
            .set_almanac(
                AlmanacInfo {
                    yi: "祭祀、出行".into(),
                    ji: "动土".into(),
                    type_desc: "工作日".into(),
                },
                at,
            )
            .await;
        store
            .set_news(
                vec![NewsItem {
                    title: "headline".into(),
                    link: "http://example.com/1".into(),
                }],
                at,
            )
            .await;
        store.persist().await.unwrap();

        let reloaded = CacheStore::load(&path);
        assert_eq!(reloaded.snapshot().await, store.snapshot().await);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn unparsable_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = CacheStore::load(&path);
        assert_eq!(store.snapshot().await, CacheDocument::default());
    }

    #[tokio::test]
    async fn upcoming_holidays_excludes_past_orders_and_caps() {
        let store = CacheStore::load("/nonexistent/cache.json");
        let mut fetched = BTreeMap::new();
        for date in ["2024-01-01", "2024-02-10", "2024-03-05"] {
            fetched.insert(date.to_string(), holiday(date, true));
        }
        store
            .replace_holiday_months(&[(2024, 1), (2024, 2), (2024, 3)], fetched, Utc::now())
            .await;

        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let upcoming = store.upcoming_holidays(today, 5).await;
        let dates: Vec<&str> = upcoming.iter().map(|h| h.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-10", "2024-03-05"]);

        let capped = store.upcoming_holidays(today, 1).await;
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].date, "2024-02-10");
    }

    #[tokio::test]
    async fn non_iso_date_keys_never_enter_the_store() {
        let store = CacheStore::load("/nonexistent/cache.json");
        let mut fetched = BTreeMap::new();
        fetched.insert("2024-05-01".to_string(), holiday("2024-05-01", true));
        fetched.insert("garbage-date".to_string(), holiday("garbage-date", true));
        store
            .replace_holiday_months(&[(2024, 5)], fetched, Utc::now())
            .await;

        let doc = store.snapshot().await;
        assert_eq!(doc.holidays.keys().collect::<Vec<_>>(), vec!["2024-05-01"]);
    }

    #[tokio::test]
    async fn month_replacement_keeps_other_months() {
        let store = CacheStore::load("/nonexistent/cache.json");
        let at = Utc::now();

        let mut first = BTreeMap::new();
        first.insert("2024-01-01".to_string(), holiday("2024-01-01", true));
        first.insert("2024-02-10".to_string(), holiday("2024-02-10", true));
        store
            .replace_holiday_months(&[(2024, 1), (2024, 2)], first, at)
            .await;

        // A later pass fetching only February replaces February and leaves
        // January untouched.
        let mut second = BTreeMap::new();
        second.insert("2024-02-11".to_string(), holiday("2024-02-11", false));
        store.replace_holiday_months(&[(2024, 2)], second, at).await;

        let doc = store.snapshot().await;
        let dates: Vec<&str> = doc.holidays.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-11"]);
    }

    #[test]
    fn news_item_serializes_as_pair() {
        let item = NewsItem {
            title: "t".into(),
            link: "l".into(),
        };
        assert_eq!(serde_json::to_string(&item).unwrap(), r#"["t","l"]"#);

        let back: NewsItem = serde_json::from_str(r#"["t","l"]"#).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn document_wire_shape() {
        let json = r#"{
            "huangli": {"yi": "a", "ji": "b", "type": "工作日"},
            "holidays": {"2024-05-01": {"date": "2024-05-01", "typeDes": "劳动节", "isOffDay": true}},
            "news": [["title", "link"]]
        }"#;
        let doc: CacheDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.huangli.as_ref().unwrap().type_desc, "工作日");
        assert!(doc.holidays["2024-05-01"].is_off_day);
        assert_eq!(doc.news[0].title, "title");
        assert!(doc.fetched_at.is_empty());
    }
}
