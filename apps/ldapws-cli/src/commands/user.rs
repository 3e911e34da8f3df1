//! Direct access to the user write plugin

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use ldapws_core::ids::UserId;
use ldapws_core::plugin::UserPlugin;

use crate::commands::connect;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Set a user's display name
    DisplayName(DisplayNameArgs),

    /// Set a user's email address
    Email(EmailArgs),

    /// Replace or remove a user's avatar
    Avatar(AvatarArgs),

    /// Set a user's directory password
    Password(PasswordArgs),

    /// Delete a user's directory entry
    Delete(UidArgs),
}

#[derive(Args, Debug)]
pub struct UidArgs {
    /// User name
    pub uid: String,
}

#[derive(Args, Debug)]
pub struct DisplayNameArgs {
    pub uid: String,
    pub display_name: String,
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    pub uid: String,
    pub email: String,
}

#[derive(Args, Debug)]
pub struct AvatarArgs {
    pub uid: String,

    /// JPEG file to upload
    #[arg(long, conflicts_with = "remove", required_unless_present = "remove")]
    pub file: Option<PathBuf>,

    /// Remove the current avatar
    #[arg(long)]
    pub remove: bool,
}

#[derive(Args, Debug)]
pub struct PasswordArgs {
    pub uid: String,

    /// New password
    #[arg(long, env = "LDAPWS_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Execute user commands
pub async fn execute(args: UserArgs, config_path: &Path) -> CliResult<()> {
    let (config, provider) = connect(config_path).await?;
    let manager = provider.user_manager(config.settings);

    match args.command {
        UserCommands::DisplayName(a) => {
            let stored = manager
                .set_display_name(&UserId::new(a.uid), &a.display_name)
                .await?;
            println!("Display name set to '{}'", stored);
        }
        UserCommands::Email(a) => {
            manager.change_email(&UserId::new(a.uid), &a.email).await?;
            println!("Email updated");
        }
        UserCommands::Avatar(a) => {
            let uid = UserId::new(a.uid);
            if !manager.can_change_avatar(&uid) {
                return Err(CliError::Refused("avatar changes are disabled".to_string()));
            }
            let image = match &a.file {
                Some(path) => Some(tokio::fs::read(path).await?),
                None => None,
            };
            manager.change_avatar(&uid, image.as_deref()).await?;
            println!("{}", if image.is_some() { "Avatar updated" } else { "Avatar removed" });
        }
        UserCommands::Password(a) => {
            if !manager.can_set_password() {
                return Err(CliError::Refused("password changes are disabled".to_string()));
            }
            if !manager.set_password(&UserId::new(&a.uid), &a.password).await? {
                return Err(CliError::Refused(format!(
                    "the directory did not accept the new password for '{}'",
                    a.uid
                )));
            }
            println!("Password updated");
        }
        UserCommands::Delete(a) => {
            if !manager.delete_user(&UserId::new(&a.uid)).await? {
                return Err(CliError::Refused(format!("could not delete '{}'", a.uid)));
            }
            println!("User '{}' deleted", a.uid);
        }
    }

    Ok(())
}
