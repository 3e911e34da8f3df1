//! Write-support switches

use std::path::Path;

use clap::{Args, Subcommand};
use ldapws_core::settings::{SettingKey, WriteSettings};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the current switches as JSON
    Show,

    /// Change one switch
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Switch name, e.g. hasAvatarPermission
    pub key: String,

    /// New value (true or false)
    #[arg(action = clap::ArgAction::Set)]
    pub value: bool,
}

/// Execute settings commands
pub async fn execute(args: SettingsArgs, config_path: &Path) -> CliResult<()> {
    match args.command {
        SettingsCommands::Show => execute_show(config_path),
        SettingsCommands::Set(a) => execute_set(a, config_path),
    }
}

fn execute_show(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load_file(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config.settings)?);
    Ok(())
}

fn execute_set(args: SetArgs, config_path: &Path) -> CliResult<()> {
    let key: SettingKey = args
        .key
        .parse()
        .map_err(|_| CliError::Validation(format!("unknown setting '{}'", args.key)))?;

    let config = AppConfig::load_file(config_path)?;
    let settings = updated(config.settings, key, args.value);
    AppConfig::save_settings(config_path, settings)?;

    println!("{} = {}", key, args.value);
    Ok(())
}

fn updated(mut settings: WriteSettings, key: SettingKey, value: bool) -> WriteSettings {
    settings.set(key, value);
    settings
}
