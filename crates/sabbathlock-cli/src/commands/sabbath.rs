use sabbathlock_core::ModeConfig;

use crate::common::{with_manager, CliResult};

pub fn activate() -> CliResult {
    with_manager(|manager, _store| {
        match manager.activate_manual()? {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("already active"),
        }
        Ok(())
    })
}

pub fn deactivate() -> CliResult {
    with_manager(|manager, _store| {
        if let Some(event) = manager.deactivate_manual()? {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        Ok(())
    })
}

pub fn reset() -> CliResult {
    with_manager(|manager, _store| {
        manager.reset()?;
        ModeConfig::default().save()?;
        println!("all state reset to defaults");
        Ok(())
    })
}
