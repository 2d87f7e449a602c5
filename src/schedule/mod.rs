//! Update schedule: structured descriptor, cron codec and previews.

pub mod codec;
pub mod preview;
pub mod types;

pub use codec::{decode, decode_with, encode, WeeklyMatching, HOURLY_EXPRESSION};
pub use preview::{describe, next_runs};
pub use types::{Frequency, ScheduleDescriptor, ScheduleForm};
