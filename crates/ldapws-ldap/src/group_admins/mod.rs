//! Group administrator to owner synchronisation
//!
//! Local group administrators are the desired state; the directory's group
//! `owner` attribute is made to match them. A run is one linear pass:
//!
//! 1. select the single active endpoint and connect
//! 2. fetch local administrators and directory owners
//! 3. reconcile the two maps
//! 4. apply additions, then removals

mod directory;
mod local;
mod mutator;

use std::io::Write;

use ldapws_core::error::{DirectoryError, DirectoryResult};
use ldapws_core::reconcile::{reconcile, Reconciliation};
use ldapws_core::roster::RosterProvider;
use ldapws_core::APP_ID;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::EndpointConfig;
use crate::connector::ConnectionProvider;
use crate::provider::LdapProvider;

pub use directory::DirectoryMembershipSource;
pub use local::{admin_map, LocalMembershipSource};
pub use mutator::{ApplyReport, ChangeAction, DirectoryMutator, ItemFailure, PlannedChange};

/// Banner printed first in simulate mode.
pub const SIMULATE_BANNER: &str = "SIMULATE MODE ON";

/// Run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Do not write to the directory.
    pub simulate: bool,
    /// Print one line per change.
    pub verbose: bool,
}

/// What a run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub endpoint: String,
    pub reconciliation: Reconciliation,
    pub report: ApplyReport,
}

/// Orchestrates one synchronisation run.
pub struct GroupAdminSync<'a> {
    endpoints: &'a [EndpointConfig],
    connector: &'a dyn ConnectionProvider,
    roster: &'a dyn RosterProvider,
    options: SyncOptions,
}

impl<'a> GroupAdminSync<'a> {
    pub fn new(
        endpoints: &'a [EndpointConfig],
        connector: &'a dyn ConnectionProvider,
        roster: &'a dyn RosterProvider,
    ) -> Self {
        Self {
            endpoints,
            connector,
            roster,
            options: SyncOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Run once, writing the banner and verbose lines to `out`.
    #[instrument(skip_all, fields(simulate = self.options.simulate))]
    pub async fn run<W: Write>(&self, out: &mut W) -> DirectoryResult<SyncOutcome> {
        if self.options.simulate {
            writeln!(out, "{SIMULATE_BANNER}").map_err(|e| {
                DirectoryError::operation_failed_with_source("cannot write output", e)
            })?;
        }

        let provider = LdapProvider::connect(self.endpoints, self.connector).await?;
        let config = provider.config();

        let local = LocalMembershipSource::new(self.roster).fetch().await?;
        let recorded =
            DirectoryMembershipSource::new(provider.directory(), provider.identity(), config)
                .fetch()
                .await?;

        let plan = reconcile(&local, &recorded);
        if plan.is_empty() {
            info!(app = APP_ID, "Group owners already in sync");
        }

        let report = DirectoryMutator::new(
            provider.directory(),
            provider.identity(),
            &config.owner_attribute,
        )
        .simulate(self.options.simulate)
        .verbose(self.options.verbose)
        .apply(&plan, out)
        .await?;

        Ok(SyncOutcome {
            endpoint: provider.directory().endpoint().to_string(),
            reconciliation: plan,
            report,
        })
    }
}
