//! Scheduler data types and next-fire computation.

use chrono::{DateTime, Local};
use std::str::FromStr;
use std::time::Duration;

/// Identity of a scheduled job. Replacing the trigger set matches old and
/// new jobs by this identity, so an unchanged job keeps its next-fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobKind {
    WorkStart,
    WorkEnd,
    Hydration,
    DailySync,
    News,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobKind::WorkStart => "work-start",
            JobKind::WorkEnd => "work-end",
            JobKind::Hydration => "hydration",
            JobKind::DailySync => "daily-sync",
            JobKind::News => "news",
        };
        write!(f, "{name}")
    }
}

/// A recurring scheduling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fires once per calendar day at the given wall-clock moment.
    Absolute { hour: u32, minute: u32 },
    /// Fires every `period`, starting one period after activation.
    Interval { period: Duration },
}

/// One compiled schedule rule: which job, and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSpec {
    pub kind: JobKind,
    pub trigger: Trigger,
}

/// Next wall-clock occurrence of `hour:minute` strictly after `after`
/// (today if not yet passed, else tomorrow).
pub fn next_occurrence(after: DateTime<Local>, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    // sec min hour dom month dow year
    let expr = format!("0 {minute} {hour} * * * *");
    let schedule = cron::Schedule::from_str(&expr).ok()?;
    schedule.after(&after).next()
}
