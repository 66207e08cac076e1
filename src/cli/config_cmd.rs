//! Config command - inspect or edit the persisted configuration.
//!
//! A running daemon applies changes through `Assistant::apply_config`;
//! edits made here are picked up on the next start.

use anyhow::Result;
use clap::Subcommand;

use crate::config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration.
    Show,
    /// Update configuration values.
    Set {
        /// Work start time (HH:MM).
        #[arg(long)]
        work_start: Option<String>,
        /// Work end time (HH:MM).
        #[arg(long)]
        work_end: Option<String>,
        /// Minutes between hydration reminders (30-240).
        #[arg(long)]
        drink_interval: Option<u32>,
        #[arg(long)]
        enable_news: Option<bool>,
        #[arg(long)]
        enable_huangli: Option<bool>,
    },
}

pub async fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let cfg = config::load_config(None)?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        ConfigAction::Set {
            work_start,
            work_end,
            drink_interval,
            enable_news,
            enable_huangli,
        } => {
            let mut cfg = config::load_config(None)?;
            if let Some(start) = work_start {
                cfg.work.start = start;
            }
            if let Some(end) = work_end {
                cfg.work.end = end;
            }
            if let Some(minutes) = drink_interval {
                cfg.reminder.drink_interval = minutes;
            }
            if let Some(news) = enable_news {
                cfg.reminder.enable_news = news;
            }
            if let Some(huangli) = enable_huangli {
                cfg.reminder.enable_huangli = huangli;
            }

            cfg.work_start()?;
            cfg.work_end()?;
            cfg.normalize();

            config::save_config(&cfg, None)?;
            println!("✓ Saved config to {}", config::config_path().display());
        }
    }
    Ok(())
}
