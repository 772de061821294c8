//! Cron-driven sync passes

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::DomainError;
use crate::infrastructure::services::SyncTrigger;

/// Convert a standard 5-field Unix cron expression to the 7-field format
/// expected by the `cron` crate (seconds prepended, any year appended).
/// 6 and 7 field expressions pass through unchanged.
fn normalize_expression(expression: &str) -> String {
    let expression = expression.trim();
    let fields: Vec<&str> = expression.split_whitespace().collect();

    match fields.as_slice() {
        [minute, hour, day, month, weekday] => format!(
            "0 {} {} {} {} {} *",
            minute,
            hour,
            day,
            month,
            unix_day_of_week(weekday)
        ),
        _ => expression.to_string(),
    }
}

/// Rewrite a Unix day-of-week field (0-7, Sunday is 0 or 7) in the `cron`
/// crate's numbering (1-7, Sunday is 1). Day names pass through, as does
/// anything unparseable so the schedule parser reports it.
fn unix_day_of_week(field: &str) -> String {
    if field == "*" || field == "?" {
        return field.to_string();
    }

    let mut days = BTreeSet::new();
    for part in field.split(',') {
        match unix_days(part) {
            Some(expanded) => days.extend(expanded),
            None => return field.to_string(),
        }
    }

    days.into_iter()
        .map(|day| (day + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Days (0 = Sunday) selected by one comma-separated part of a Unix field
fn unix_days(part: &str) -> Option<Vec<u32>> {
    let (base, step) = match part.split_once('/') {
        Some((base, step)) => (base, step.parse::<usize>().ok().filter(|s| *s > 0)?),
        None => (part, 1),
    };

    let (start, end): (u32, u32) = match (base, base.split_once('-')) {
        ("*", _) => (0, 6),
        (_, Some((start, end))) => (start.parse().ok()?, end.parse().ok()?),
        (_, None) => {
            let day = base.parse().ok()?;
            if part.contains('/') { (day, 7) } else { (day, day) }
        }
    };

    if start > end || end > 7 {
        return None;
    }

    Some((start..=end).step_by(step).map(|day| day % 7).collect())
}

/// Parse a cron expression
pub fn parse_schedule(expression: &str) -> Result<Schedule, DomainError> {
    if expression.trim().is_empty() {
        return Err(DomainError::configuration("sync schedule is empty"));
    }

    Schedule::from_str(&normalize_expression(expression)).map_err(|e| {
        DomainError::configuration(format!("invalid sync schedule '{}': {}", expression, e))
    })
}

/// Runs a sync pass on every tick of a cron schedule
pub struct CronScheduler {
    schedule: Schedule,
    trigger: Arc<dyn SyncTrigger>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("schedule", &self.schedule.to_string())
            .finish()
    }
}

impl CronScheduler {
    pub fn new(schedule: Schedule, trigger: Arc<dyn SyncTrigger>) -> Self {
        Self { schedule, trigger }
    }

    /// Next tick strictly after `after`
    pub fn next_run(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Run one pass and log its outcome
    pub async fn tick(&self) {
        info!("Scheduled sync started");

        match self.trigger.trigger().await {
            Ok(report) => info!(
                teams_converged = report.teams_converged(),
                teams_created = report.teams_created(),
                "Scheduled sync succeeded"
            ),
            Err(e) if e.is_fatal() => error!(error = %e, "Scheduled sync aborted"),
            Err(e) => warn!(error = %e, "Scheduled sync completed with errors"),
        }
    }

    /// Spawn the schedule loop. The loop ends when the schedule has no
    /// further occurrences or the handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let Some(next) = self.next_run(now) else {
                    warn!("Sync schedule has no upcoming runs, scheduler stopping");
                    break;
                };

                let wait = (next - now).to_std().unwrap_or_default();
                debug!(next_run = %next, wait_secs = wait.as_secs(), "Waiting for next scheduled sync");
                tokio::time::sleep(wait).await;

                self.tick().await;
            }
        })
    }
}
