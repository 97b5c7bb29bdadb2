use clap::{Subcommand, ValueEnum};
use sabbathlock_core::{Selection, TargetKind};

use crate::common::{with_manager, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    App,
    Category,
    Domain,
}

impl From<Kind> for TargetKind {
    fn from(kind: Kind) -> TargetKind {
        match kind {
            Kind::App => TargetKind::App,
            Kind::Category => TargetKind::Category,
            Kind::Domain => TargetKind::Domain,
        }
    }
}

#[derive(Subcommand)]
pub enum SelectionAction {
    /// Show the current selection
    Show,
    /// Add a target token
    Add {
        /// Token kind
        #[arg(value_enum)]
        kind: Kind,
        /// Opaque target token (bundle id, category id, or domain)
        token: String,
    },
    /// Remove a target token
    Remove {
        #[arg(value_enum)]
        kind: Kind,
        token: String,
    },
    /// Clear the entire selection
    Clear,
}

pub fn run(action: SelectionAction) -> CliResult {
    with_manager(|manager, _store| {
        match action {
            SelectionAction::Show => {
                let selection = manager.selection();
                println!("{}", serde_json::to_string_pretty(&selection)?);
                eprintln!("{}", selection.summary());
            }
            SelectionAction::Add { kind, token } => {
                let mut selection = manager.selection();
                selection.insert(kind.into(), &token);
                let event = manager.update_selection(selection)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            SelectionAction::Remove { kind, token } => {
                let mut selection = manager.selection();
                if !selection.remove(kind.into(), &token) {
                    eprintln!("token not in selection: {token}");
                }
                let event = manager.update_selection(selection)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            SelectionAction::Clear => {
                let event = manager.update_selection(Selection::default())?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        Ok(())
    })
}
