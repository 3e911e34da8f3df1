//! Direct access to the group write plugin

use std::path::Path;

use clap::{Args, Subcommand};
use ldapws_core::ids::{GroupId, UserId};
use ldapws_core::plugin::GroupPlugin;

use crate::commands::connect;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Add a user to a directory group
    AddMember(MemberArgs),

    /// Remove a user from a directory group
    RemoveMember(MemberArgs),

    /// Delete a directory group
    Delete(GidArgs),
}

#[derive(Args, Debug)]
pub struct MemberArgs {
    /// Group name
    pub gid: String,
    /// User name
    pub uid: String,
}

#[derive(Args, Debug)]
pub struct GidArgs {
    pub gid: String,
}

/// Execute group commands
pub async fn execute(args: GroupArgs, config_path: &Path) -> CliResult<()> {
    let (_, provider) = connect(config_path).await?;
    let manager = provider.group_manager();

    let (done, description) = match args.command {
        GroupCommands::AddMember(a) => (
            manager
                .add_to_group(&UserId::new(&a.uid), &GroupId::new(&a.gid))
                .await?,
            format!("add '{}' to '{}'", a.uid, a.gid),
        ),
        GroupCommands::RemoveMember(a) => (
            manager
                .remove_from_group(&UserId::new(&a.uid), &GroupId::new(&a.gid))
                .await?,
            format!("remove '{}' from '{}'", a.uid, a.gid),
        ),
        GroupCommands::Delete(a) => (
            manager.delete_group(&GroupId::new(&a.gid)).await?,
            format!("delete '{}'", a.gid),
        ),
    };

    if !done {
        return Err(CliError::Refused(format!("could not {}", description)));
    }
    println!("Done: {}", description);
    Ok(())
}
