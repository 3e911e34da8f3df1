//! Push local group administrators into the directory's group owners

use std::path::Path;

use clap::Args;
use ldapws_core::APP_ID;
use ldapws_ldap::{GroupAdminSync, LdapConnectionProvider, SyncOptions};
use tracing::info;

use crate::config::AppConfig;
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct SyncGroupAdminsArgs {
    /// Simulate: print what would change without writing to the directory
    #[arg(long)]
    pub sim: bool,

    /// Print one line per added or removed owner
    #[arg(long)]
    pub verb: bool,
}

impl SyncGroupAdminsArgs {
    fn options(&self) -> SyncOptions {
        SyncOptions {
            simulate: self.sim,
            verbose: self.verb,
        }
    }
}

/// Execute the sync command
pub async fn execute(args: SyncGroupAdminsArgs, config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    let roster = config.roster();

    let mut stdout = std::io::stdout();
    let outcome = GroupAdminSync::new(&config.endpoints, &LdapConnectionProvider, &roster)
        .with_options(args.options())
        .run(&mut stdout)
        .await?;

    let report = &outcome.report;
    info!(
        app = APP_ID,
        endpoint = %outcome.endpoint,
        added = report.added,
        removed = report.removed,
        failed = report.failures.len(),
        simulated = report.simulated,
        "Group admin sync finished"
    );

    Ok(())
}
