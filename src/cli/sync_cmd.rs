//! Sync command - one-shot data sync pass.

use anyhow::Result;

use crate::cache::CacheStore;
use crate::config;
use crate::logging;
use crate::sources::SourceSet;
use crate::sync;

pub async fn cmd_sync() -> Result<()> {
    logging::init_simple_logging();

    let cfg = config::load_config(None)?;
    let cache = CacheStore::load(config::cache_path());
    let sources = SourceSet::over_http(&cfg.sources)?;

    let report = sync::run_sync_pass(&cfg, &sources, &cache).await;
    println!("{}", report.summary().1);
    println!("  almanac:  {}", report.almanac);
    println!("  holidays: {}", report.holidays);
    println!("  news:     {}", report.news);
    if !report.persisted {
        println!("  warning: cache could not be persisted");
    }
    Ok(())
}
