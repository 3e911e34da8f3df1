//! ldapws - LDAP write support from the command line
//!
//! - Push local group administrators into the directory's group owners
//! - Inspect and change the write-support switches
//! - Call the user and group write operations directly

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod logging;

use error::CliResult;

/// ldapws - LDAP write support
#[derive(Parser)]
#[command(name = "ldapws")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(
        long,
        global = true,
        env = "LDAPWS_CONFIG",
        default_value = "ldapws.json"
    )]
    config: PathBuf,

    /// Log as JSON instead of plain text
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync local group administrators to the directory's group owners
    SyncGroupAdmins(commands::sync_group_admins::SyncGroupAdminsArgs),

    /// Show or change the write-support switches
    Settings(commands::settings::SettingsArgs),

    /// Change a user's directory entry
    User(commands::user::UserArgs),

    /// Change a directory group
    Group(commands::group::GroupArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init_logging(cli.log_json);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = cli.config.as_path();
    match cli.command {
        Commands::SyncGroupAdmins(args) => commands::sync_group_admins::execute(args, config).await,
        Commands::Settings(args) => commands::settings::execute(args, config).await,
        Commands::User(args) => commands::user::execute(args, config).await,
        Commands::Group(args) => commands::group::execute(args, config).await,
    }
}
