use clap::Subcommand;
use sabbathlock_core::{Weekday, WeeklyRecurrence};

use crate::common::{now_local, with_manager, CliResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the configured weekly window
    Show,
    /// Replace the weekly window
    Set {
        /// Start weekday (e.g. "friday" or "fri")
        #[arg(long)]
        start_day: String,
        /// Start time, 24h "HH:MM"
        #[arg(long)]
        start: String,
        /// End weekday
        #[arg(long)]
        end_day: String,
        /// End time, 24h "HH:MM"
        #[arg(long)]
        end: String,
    },
    /// Reset to the default window (Friday 18:00 - Saturday 19:30)
    Reset,
}

fn parse_weekday(s: &str) -> Result<Weekday, Box<dyn std::error::Error>> {
    Weekday::parse(s).ok_or_else(|| format!("unknown weekday: {s}").into())
}

fn parse_time(s: &str) -> Result<(u8, u8), Box<dyn std::error::Error>> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
    let hour: u8 = hour.parse().map_err(|_| format!("bad hour in '{s}'"))?;
    let minute: u8 = minute.parse().map_err(|_| format!("bad minute in '{s}'"))?;
    if hour > 23 || minute > 59 {
        return Err(format!("time out of range: '{s}'").into());
    }
    Ok((hour, minute))
}

pub fn run(action: ScheduleAction) -> CliResult {
    with_manager(|manager, _store| {
        match action {
            ScheduleAction::Show => {
                let recurrence = manager.recurrence();
                println!("{}", serde_json::to_string_pretty(&recurrence)?);
                let now = now_local();
                if let Ok(next) = recurrence.next_start(now) {
                    eprintln!("next start: {}", next.format("%A %H:%M"));
                }
            }
            ScheduleAction::Set {
                start_day,
                start,
                end_day,
                end,
            } => {
                let (start_hour, start_minute) = parse_time(&start)?;
                let (end_hour, end_minute) = parse_time(&end)?;
                let recurrence = WeeklyRecurrence {
                    start_day: parse_weekday(&start_day)?,
                    start_hour,
                    start_minute,
                    end_day: parse_weekday(&end_day)?,
                    end_hour,
                    end_minute,
                };
                let event = manager.update_recurrence(recurrence)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            ScheduleAction::Reset => {
                let event = manager.update_recurrence(WeeklyRecurrence::default())?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        Ok(())
    })
}
