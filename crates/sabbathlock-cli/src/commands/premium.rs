use clap::Subcommand;

use crate::common::{with_manager, CliResult};

#[derive(Subcommand)]
pub enum PremiumAction {
    /// Show the cached entitlement flag
    Status,
    /// Set the cached entitlement flag (stand-in for the storefront service)
    Set {
        /// "true" or "false"
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

pub fn run(action: PremiumAction) -> CliResult {
    with_manager(|_manager, store| {
        match action {
            PremiumAction::Status => {
                let premium = store.is_premium()?;
                println!("premium: {premium}");
            }
            PremiumAction::Set { value } => {
                store.set_premium(value)?;
                println!("premium: {value}");
            }
        }
        Ok(())
    })
}
