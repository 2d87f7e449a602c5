//! Schedule command - encode, decode and preview cron expressions offline.

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Subcommand;

use crate::config::Config;
use crate::schedule::{self, Frequency, ScheduleForm, WeeklyMatching};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Build an expression from form values.
    Encode {
        /// hourly | daily | weekly | custom | manual
        #[arg(short, long)]
        frequency: Frequency,
        #[arg(long)]
        hour: Option<String>,
        /// Day of week, 0 = Sunday.
        #[arg(long)]
        day: Option<String>,
        /// Minutes between runs for `custom`.
        #[arg(long)]
        interval: Option<String>,
        /// Raw expression for `manual`.
        #[arg(long)]
        expr: Option<String>,
    },
    /// Show how an expression maps back onto the form.
    Decode {
        expr: String,
        /// Only accept `0 H * * D` as weekly.
        #[arg(long)]
        strict: bool,
    },
    /// List the next fire times of an expression.
    Preview {
        expr: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
}

pub fn cmd_schedule(cfg: &Config, action: ScheduleAction) -> Result<()> {
    match action {
        ScheduleAction::Encode { frequency, hour, day, interval, expr } => {
            let form = ScheduleForm {
                frequency,
                hour,
                day,
                interval,
                expression: expr,
            };
            let descriptor = form.to_descriptor();
            println!("{}", schedule::encode(&descriptor));
            println!("  {}", schedule::describe(&descriptor));
        }
        ScheduleAction::Decode { expr, strict } => {
            let matching = if strict {
                WeeklyMatching::Strict
            } else {
                cfg.schedule.weekly_matching()
            };
            let descriptor = schedule::decode_with(&expr, matching);
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            println!("  {}", schedule::describe(&descriptor));
        }
        ScheduleAction::Preview { expr, count } => {
            let runs = schedule::next_runs(&expr, Utc::now(), count)?;
            if runs.is_empty() {
                println!("No upcoming runs.");
            }
            for run in runs {
                println!("{}", run.with_timezone(&Local).format("%Y-%m-%d %H:%M (%a)"));
            }
        }
    }
    Ok(())
}
