use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "sabbathlock", version, about = "SabbathLock CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current Sabbath mode status
    Status {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Activate Sabbath mode now (manual, free tier)
    Activate,
    /// Deactivate Sabbath mode
    Deactivate,
    /// Automatic scheduling (premium)
    Auto {
        #[command(subcommand)]
        action: commands::auto::AutoAction,
    },
    /// Weekly schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Blocked-target selection management
    Selection {
        #[command(subcommand)]
        action: commands::selection::SelectionAction,
    },
    /// Shield configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Premium entitlement flag
    Premium {
        #[command(subcommand)]
        action: commands::premium::PremiumAction,
    },
    /// Interval-monitor host hooks (boundary callbacks)
    Monitor {
        #[command(subcommand)]
        action: commands::monitor::MonitorAction,
    },
    /// Reset all state to defaults
    Reset,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status { json } => commands::status::run(json),
        Commands::Activate => commands::sabbath::activate(),
        Commands::Deactivate => commands::sabbath::deactivate(),
        Commands::Auto { action } => commands::auto::run(action),
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Selection { action } => commands::selection::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Premium { action } => commands::premium::run(action),
        Commands::Monitor { action } => commands::monitor::run(action),
        Commands::Reset => commands::sabbath::reset(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sabbathlock", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
