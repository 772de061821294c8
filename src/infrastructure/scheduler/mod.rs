//! Periodic sync scheduling

mod schedule;

pub use schedule::{parse_schedule, CronScheduler};
