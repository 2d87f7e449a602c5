//! Human-readable schedule previews: a one-line description of a descriptor and
//! the next few fire times of an expression.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::str::FromStr;

use super::codec::encode;
use super::types::ScheduleDescriptor;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn describe(descriptor: &ScheduleDescriptor) -> String {
    match descriptor {
        ScheduleDescriptor::Hourly => "Every hour".to_string(),
        ScheduleDescriptor::Daily { hour } => format!("Daily at {:02}:00", hour),
        ScheduleDescriptor::Weekly { hour, day } => {
            let name = DAY_NAMES.get(*day as usize).copied().unwrap_or("Sunday");
            format!("Weekly on {} at {:02}:00", name, hour)
        }
        ScheduleDescriptor::Custom { interval_minutes: 1 } => "Every minute".to_string(),
        ScheduleDescriptor::Custom { interval_minutes } => {
            format!("Every {} minutes", interval_minutes)
        }
        ScheduleDescriptor::Manual { .. } => format!("Custom schedule: {}", encode(descriptor)),
    }
}

/// Normalize a 5-field expression (min hour dom month dow) to the 7-field form
/// the `cron` crate parses (sec min hour dom month dow year).
///
/// The crate numbers weekdays 1-7 from Sunday, crontab uses 0-6, so numeric
/// day-of-week values are shifted by one.
fn normalize_cron_expr(expr: &str) -> String {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if parts.len() == 5 {
        format!(
            "0 {} {} {} {} {} *",
            parts[0],
            parts[1],
            parts[2],
            parts[3],
            shift_weekdays(parts[4])
        )
    } else {
        expr.to_string()
    }
}

fn shift_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(|item| {
            let (base, step) = match item.split_once('/') {
                Some((base, step)) => (base, Some(step)),
                None => (item, None),
            };
            let base = base
                .split('-')
                .map(|bound| match bound.parse::<u32>() {
                    Ok(day) => (day % 7 + 1).to_string(),
                    Err(_) => bound.to_string(),
                })
                .collect::<Vec<_>>()
                .join("-");
            match step {
                Some(step) => format!("{}/{}", base, step),
                None => base,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// The next `count` fire times of `expression` strictly after `after`.
pub fn next_runs(expression: &str, after: DateTime<Utc>, count: usize) -> Result<Vec<DateTime<Utc>>> {
    let normalized = normalize_cron_expr(expression);
    let schedule = cron::Schedule::from_str(&normalized)
        .with_context(|| format!("invalid cron expression: {}", expression))?;
    Ok(schedule.after(&after).take(count).collect())
}
