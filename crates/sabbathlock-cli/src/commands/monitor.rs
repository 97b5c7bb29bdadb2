//! Host hooks for the interval monitor.
//!
//! A real platform delivers boundary callbacks itself. Here the host is
//! whatever drives this binary (cron, launchd, a test); `fire-start` and
//! `fire-end` are the entry points it invokes at the registered wall-clock
//! instants. They run in a fresh process and share nothing with the
//! UI-facing commands except the persisted store.

use clap::Subcommand;
use sabbathlock_core::{SharedStoreMonitor, SCHEDULE_NAME};

use crate::common::{with_manager, CliResult};

#[derive(Subcommand)]
pub enum MonitorAction {
    /// List registered schedules
    List,
    /// Deliver the start-boundary callback
    FireStart {
        /// Schedule name the callback is scoped to
        #[arg(long, default_value = SCHEDULE_NAME)]
        name: String,
    },
    /// Deliver the end-boundary callback
    FireEnd {
        #[arg(long, default_value = SCHEDULE_NAME)]
        name: String,
    },
}

pub fn run(action: MonitorAction) -> CliResult {
    with_manager(|manager, store| {
        match action {
            MonitorAction::List => {
                let monitor = SharedStoreMonitor::new(store);
                let registrations = monitor.registrations()?;
                println!("{}", serde_json::to_string_pretty(&registrations)?);
            }
            MonitorAction::FireStart { name } => {
                let event = manager.on_interval_start(&name)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            MonitorAction::FireEnd { name } => {
                let event = manager.on_interval_end(&name)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        Ok(())
    })
}
