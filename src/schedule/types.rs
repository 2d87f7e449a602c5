//! Schedule data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_HOUR: u8 = 23;
pub const MAX_DAY: u8 = 6;
pub const MIN_INTERVAL: u8 = 1;
pub const MAX_INTERVAL: u8 = 59;

const DEFAULT_HOUR: u8 = 0;
const DEFAULT_DAY: u8 = 0;
const DEFAULT_INTERVAL: u8 = 15;

/// Structured, human-editable form of a recurring update schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum ScheduleDescriptor {
    /// Top of every hour.
    Hourly,
    /// Once a day at `hour`.
    Daily { hour: u8 },
    /// Once a week on `day` (0 = Sunday) at `hour`.
    Weekly { hour: u8, day: u8 },
    /// Every `interval_minutes` minutes.
    #[serde(rename_all = "camelCase")]
    Custom { interval_minutes: u8 },
    /// Opaque user-supplied cron expression.
    #[serde(rename_all = "camelCase")]
    Manual { raw_expression: String },
}

impl Default for ScheduleDescriptor {
    fn default() -> Self {
        ScheduleDescriptor::Hourly
    }
}

impl ScheduleDescriptor {
    pub fn daily(hour: u32) -> Self {
        ScheduleDescriptor::Daily {
            hour: clamp(hour, 0, MAX_HOUR),
        }
    }

    pub fn weekly(hour: u32, day: u32) -> Self {
        ScheduleDescriptor::Weekly {
            hour: clamp(hour, 0, MAX_HOUR),
            day: clamp(day, 0, MAX_DAY),
        }
    }

    pub fn custom(interval_minutes: u32) -> Self {
        ScheduleDescriptor::Custom {
            interval_minutes: clamp(interval_minutes, MIN_INTERVAL, MAX_INTERVAL),
        }
    }

    pub fn manual(raw_expression: impl Into<String>) -> Self {
        ScheduleDescriptor::Manual {
            raw_expression: raw_expression.into(),
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            ScheduleDescriptor::Hourly => Frequency::Hourly,
            ScheduleDescriptor::Daily { .. } => Frequency::Daily,
            ScheduleDescriptor::Weekly { .. } => Frequency::Weekly,
            ScheduleDescriptor::Custom { .. } => Frequency::Custom,
            ScheduleDescriptor::Manual { .. } => Frequency::Manual,
        }
    }

    /// Re-clamp numeric fields. Deserialized descriptors are not range-checked.
    pub fn normalized(self) -> Self {
        match self {
            ScheduleDescriptor::Daily { hour } => Self::daily(hour as u32),
            ScheduleDescriptor::Weekly { hour, day } => Self::weekly(hour as u32, day as u32),
            ScheduleDescriptor::Custom { interval_minutes } => Self::custom(interval_minutes as u32),
            other => other,
        }
    }
}

fn clamp(value: u32, min: u8, max: u8) -> u8 {
    value.clamp(min as u32, max as u32) as u8
}

/// The frequency choice offered by the schedule form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    Custom,
    Manual,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            "manual" => Ok(Frequency::Manual),
            _ => Err(format!("Unknown schedule frequency: {}", s)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
            Frequency::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Raw inputs of the schedule form, as typed by the operator.
///
/// Only the fields relevant to `frequency` are read.
#[derive(Debug, Clone)]
pub struct ScheduleForm {
    pub frequency: Frequency,
    pub hour: Option<String>,
    pub day: Option<String>,
    pub interval: Option<String>,
    pub expression: Option<String>,
}

impl ScheduleForm {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            hour: None,
            day: None,
            interval: None,
            expression: None,
        }
    }

    /// Missing or unparsable numbers fall back to defaults, others are clamped.
    pub fn to_descriptor(&self) -> ScheduleDescriptor {
        match self.frequency {
            Frequency::Hourly => ScheduleDescriptor::Hourly,
            Frequency::Daily => {
                ScheduleDescriptor::daily(parse_or(self.hour.as_deref(), DEFAULT_HOUR))
            }
            Frequency::Weekly => ScheduleDescriptor::weekly(
                parse_or(self.hour.as_deref(), DEFAULT_HOUR),
                parse_or(self.day.as_deref(), DEFAULT_DAY),
            ),
            Frequency::Custom => {
                ScheduleDescriptor::custom(parse_or(self.interval.as_deref(), DEFAULT_INTERVAL))
            }
            Frequency::Manual => {
                ScheduleDescriptor::manual(self.expression.as_deref().unwrap_or("").trim())
            }
        }
    }
}

fn parse_or(raw: Option<&str>, default: u8) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default as u32)
}
