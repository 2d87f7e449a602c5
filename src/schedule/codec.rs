//! Descriptor <-> five-field cron expression.
//!
//! Encoding is exact. Decoding is best-effort: anything that does not look like
//! one of the structured shapes comes back as [`ScheduleDescriptor::Manual`]
//! carrying the raw string, so every expression survives a round-trip.

use serde::{Deserialize, Serialize};

use super::types::{ScheduleDescriptor, MAX_DAY, MAX_HOUR, MAX_INTERVAL, MIN_INTERVAL};

/// Expression used for `hourly` and for an empty manual expression.
pub const HOURLY_EXPRESSION: &str = "0 */1 * * *";

/// How the weekly rule of [`decode_with`] recognizes an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeeklyMatching {
    /// Any five-field expression containing `" * * "` whose day-of-week field
    /// is not `*`. Hour and day are parsed leniently (clamped, 0 if not
    /// numeric). This is what existing dashboards and stored configs expect.
    #[default]
    Loose,
    /// Only `0 H * * D` with `H` in 0..=23 and `D` in 0..=6.
    Strict,
}

pub fn encode(descriptor: &ScheduleDescriptor) -> String {
    match descriptor {
        ScheduleDescriptor::Hourly => HOURLY_EXPRESSION.to_string(),
        ScheduleDescriptor::Daily { hour } => format!("0 {} * * *", hour),
        ScheduleDescriptor::Weekly { hour, day } => format!("0 {} * * {}", hour, day),
        ScheduleDescriptor::Custom { interval_minutes } => {
            format!("*/{} * * * *", interval_minutes)
        }
        ScheduleDescriptor::Manual { raw_expression } => {
            if raw_expression.trim().is_empty() {
                HOURLY_EXPRESSION.to_string()
            } else {
                raw_expression.clone()
            }
        }
    }
}

/// Decode with the default (loose) weekly rule.
pub fn decode(expression: &str) -> ScheduleDescriptor {
    decode_with(expression, WeeklyMatching::Loose)
}

pub fn decode_with(expression: &str, weekly: WeeklyMatching) -> ScheduleDescriptor {
    let trimmed = expression.trim();
    if trimmed.is_empty() || trimmed == HOURLY_EXPRESSION {
        return ScheduleDescriptor::Hourly;
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() == 5 {
        if let Some(descriptor) = match_daily(&fields) {
            return descriptor;
        }
        if let Some(descriptor) = match_weekly(trimmed, &fields, weekly) {
            return descriptor;
        }
        if let Some(descriptor) = match_custom(&fields) {
            return descriptor;
        }
    }

    ScheduleDescriptor::manual(expression)
}

fn match_daily(fields: &[&str]) -> Option<ScheduleDescriptor> {
    if fields[0] != "0" || fields[2..] != ["*", "*", "*"] {
        return None;
    }
    let hour = parse_in_range(fields[1], 0, MAX_HOUR)?;
    Some(ScheduleDescriptor::Daily { hour })
}

fn match_weekly(
    expression: &str,
    fields: &[&str],
    weekly: WeeklyMatching,
) -> Option<ScheduleDescriptor> {
    match weekly {
        WeeklyMatching::Loose => {
            if !expression.contains(" * * ") || fields[4] == "*" {
                return None;
            }
            Some(ScheduleDescriptor::Weekly {
                hour: parse_lenient(fields[1], MAX_HOUR),
                day: parse_lenient(fields[4], MAX_DAY),
            })
        }
        WeeklyMatching::Strict => {
            if fields[0] != "0" || fields[2] != "*" || fields[3] != "*" {
                return None;
            }
            let hour = parse_in_range(fields[1], 0, MAX_HOUR)?;
            let day = parse_in_range(fields[4], 0, MAX_DAY)?;
            Some(ScheduleDescriptor::Weekly { hour, day })
        }
    }
}

fn match_custom(fields: &[&str]) -> Option<ScheduleDescriptor> {
    if fields[1..] != ["*", "*", "*", "*"] {
        return None;
    }
    let step = fields[0].strip_prefix("*/")?;
    let interval_minutes = parse_in_range(step, MIN_INTERVAL, MAX_INTERVAL)?;
    Some(ScheduleDescriptor::Custom { interval_minutes })
}

/// Plain canonical decimal only: no sign, no leading zeros.
fn parse_in_range(field: &str, min: u8, max: u8) -> Option<u8> {
    let canonical = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && (field == "0" || !field.starts_with('0'));
    if !canonical {
        return None;
    }
    field.parse::<u8>().ok().filter(|v| (min..=max).contains(v))
}

fn parse_lenient(field: &str, max: u8) -> u8 {
    field
        .parse::<u32>()
        .map(|v| v.min(max as u32) as u8)
        .unwrap_or(0)
}
