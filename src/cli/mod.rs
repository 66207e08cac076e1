//! CLI commands module.

mod config_cmd;
mod init;
mod show;
mod start;
mod sync_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use config_cmd::{cmd_config, ConfigAction};
pub use init::cmd_init;
pub use show::{cmd_show, ShowTarget};
pub use start::cmd_start;
pub use sync_cmd::cmd_sync;

#[derive(Parser)]
#[command(name = "deskmate", about = "deskmate, a desktop assistant daemon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the configuration file.
    Init,

    /// Start the reminder and sync daemon.
    Start,

    /// Run one data sync pass and exit.
    Sync,

    /// Show cached data.
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },

    /// Inspect or edit the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cmd_init().await,
        Commands::Start => cmd_start().await,
        Commands::Sync => cmd_sync().await,
        Commands::Show { target } => cmd_show(target).await,
        Commands::Config { action } => cmd_config(action).await,
    }
}
