//! Schedule compiler: derives the trigger set from the configuration.

use chrono::Timelike;
use std::time::Duration;

use crate::config::Config;
use crate::error::ConfigError;
use crate::scheduler::types::{JobKind, Trigger, TriggerSpec};

/// Hour of the daily full data sync.
pub const DAILY_SYNC_HOUR: u32 = 8;
/// Hour of the daily news reminder (when news is enabled).
pub const NEWS_HOUR: u32 = 9;

/// Pure derivation of the active trigger set from a configuration snapshot.
///
/// Yields exactly four triggers, five when news is enabled. Re-compiling the
/// same configuration yields an identical set.
pub fn compile(cfg: &Config) -> Result<Vec<TriggerSpec>, ConfigError> {
    let start = cfg.work_start()?;
    let end = cfg.work_end()?;

    let mut specs = vec![
        TriggerSpec {
            kind: JobKind::WorkStart,
            trigger: Trigger::Absolute {
                hour: start.hour(),
                minute: start.minute(),
            },
        },
        TriggerSpec {
            kind: JobKind::WorkEnd,
            trigger: Trigger::Absolute {
                hour: end.hour(),
                minute: end.minute(),
            },
        },
        TriggerSpec {
            kind: JobKind::Hydration,
            trigger: Trigger::Interval {
                period: Duration::from_secs(u64::from(cfg.reminder.drink_interval) * 60),
            },
        },
        TriggerSpec {
            kind: JobKind::DailySync,
            trigger: Trigger::Absolute {
                hour: DAILY_SYNC_HOUR,
                minute: 0,
            },
        },
    ];

    if cfg.reminder.enable_news {
        specs.push(TriggerSpec {
            kind: JobKind::News,
            trigger: Trigger::Absolute {
                hour: NEWS_HOUR,
                minute: 0,
            },
        });
    }

    Ok(specs)
}
