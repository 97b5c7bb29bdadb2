use sabbathlock_core::Event;

use crate::common::{now_local, with_manager, CliResult};

pub fn run(json: bool) -> CliResult {
    with_manager(|manager, _store| {
        let snapshot = manager.status(now_local());
        if json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }
        if let Event::StateSnapshot {
            state,
            auto_mode_enabled,
            activated_at,
            next_start,
            next_end,
            selection_summary,
            ..
        } = snapshot
        {
            println!("state:      {state}");
            println!("auto mode:  {}", if auto_mode_enabled { "on" } else { "off" });
            if let Some(at) = activated_at {
                println!("active since: {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
            if let Some(start) = next_start {
                println!("next start: {}", start.format("%A %H:%M"));
            }
            if let Some(end) = next_end {
                println!("next end:   {}", end.format("%A %H:%M"));
            }
            println!("selection:  {selection_summary}");
        }
        Ok(())
    })
}
