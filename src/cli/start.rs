//! Start command - run the reminder and sync daemon.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::app::Assistant;
use crate::cache::CacheStore;
use crate::config;
use crate::logging;
use crate::notify::{LogNotifier, Notifier};
use crate::sources::SourceSet;

pub async fn cmd_start() -> Result<()> {
    let cfg = config::load_config(None)?;
    logging::init_logging(&cfg)?;

    let cache = CacheStore::load(config::cache_path());
    let sources = SourceSet::over_http(&cfg.sources)?;
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let app = Assistant::new(cfg, None, cache, sources, notifier);
    app.start().await?;
    info!("deskmate daemon running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    app.stop().await;
    Ok(())
}
