use clap::Subcommand;

use crate::common::{with_manager, CliResult};

#[derive(Subcommand)]
pub enum AutoAction {
    /// Register the schedule with the interval monitor (requires premium)
    Enable,
    /// Unregister the schedule and stop automatic mode
    Disable,
}

pub fn run(action: AutoAction) -> CliResult {
    with_manager(|manager, _store| {
        let event = match action {
            AutoAction::Enable => manager.enable_auto_mode()?,
            AutoAction::Disable => manager.disable_auto_mode()?,
        };
        println!("{}", serde_json::to_string_pretty(&event)?);
        Ok(())
    })
}
