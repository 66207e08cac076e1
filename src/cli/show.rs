//! Show command - display cached almanac, holiday, or news data.

use anyhow::Result;
use chrono::Local;
use clap::Subcommand;

use crate::cache::CacheStore;
use crate::config;

#[derive(Subcommand)]
pub enum ShowTarget {
    /// Today's almanac (huangli).
    Almanac,
    /// Upcoming holidays.
    Holidays {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Latest news headlines.
    News,
}

pub async fn cmd_show(target: ShowTarget) -> Result<()> {
    let cfg = config::load_config(None)?;
    let cache = CacheStore::load(config::cache_path());

    match target {
        ShowTarget::Almanac => {
            if !cfg.reminder.enable_huangli {
                println!("Almanac display is disabled (reminder.enableHuangli).");
                return Ok(());
            }
            match cache.almanac_today().await {
                Some(a) => {
                    println!("今日黄历 ({})", a.type_desc);
                    println!("宜: {}", a.yi);
                    println!("忌: {}", a.ji);
                }
                None => println!("No almanac cached yet. Run `deskmate sync` first."),
            }
        }
        ShowTarget::Holidays { limit } => {
            let today = Local::now().date_naive();
            let items = cache.upcoming_holidays(today, limit).await;
            if items.is_empty() {
                println!("No upcoming holidays cached. Run `deskmate sync` first.");
            }
            for h in items {
                let day = if h.is_off_day { "休息" } else { "工作日" };
                println!("{} {} ({})", h.date, h.type_des, day);
            }
        }
        ShowTarget::News => {
            let items = cache.latest_news().await;
            if items.is_empty() {
                println!("No news cached yet. Run `deskmate sync` first.");
            }
            for (i, item) in items.iter().enumerate() {
                println!("{}. {}", i + 1, item.title);
                println!("   {}", item.link);
            }
        }
    }
    Ok(())
}
