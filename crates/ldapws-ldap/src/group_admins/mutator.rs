//! Applies an owner reconciliation to the directory.

use std::fmt;
use std::io::Write;

use ldapws_core::directory::DirectoryOps;
use ldapws_core::error::{DirectoryError, DirectoryResult};
use ldapws_core::identity::IdentityMapper;
use ldapws_core::ids::{GroupId, UserId};
use ldapws_core::membership::MembershipMap;
use ldapws_core::reconcile::Reconciliation;
use ldapws_core::APP_ID;
use serde::Serialize;
use tracing::{error, info, instrument};

/// Direction of an owner change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeAction {
    Add,
    Delete,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Add => f.write_str("ADD"),
            ChangeAction::Delete => f.write_str("DEL"),
        }
    }
}

/// One resolved owner change.
///
/// Displays as the verbose line:
/// `ADD: UID=alice (uid=alice,...) into GID=engineering (cn=engineering,...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub action: ChangeAction,
    pub user: UserId,
    pub user_dn: String,
    pub group: GroupId,
    pub group_dn: String,
}

impl fmt::Display for PlannedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: UID={} ({}) into GID={} ({})",
            self.action, self.user, self.user_dn, self.group, self.group_dn
        )
    }
}

/// A change that could not be resolved or was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub action: ChangeAction,
    pub user: UserId,
    pub group: GroupId,
    pub error: String,
}

/// Result of applying a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Owners added (or that would have been, in simulate mode).
    pub added: usize,
    /// Owners removed (or that would have been, in simulate mode).
    pub removed: usize,
    pub failures: Vec<ItemFailure>,
    pub simulated: bool,
}

impl ApplyReport {
    /// Whether every change went through.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes owner changes, one attribute modification per (group, user) pair.
pub struct DirectoryMutator<'a> {
    directory: &'a dyn DirectoryOps,
    identity: &'a dyn IdentityMapper,
    owner_attribute: &'a str,
    simulate: bool,
    verbose: bool,
}

impl<'a> DirectoryMutator<'a> {
    pub fn new(
        directory: &'a dyn DirectoryOps,
        identity: &'a dyn IdentityMapper,
        owner_attribute: &'a str,
    ) -> Self {
        Self {
            directory,
            identity,
            owner_attribute,
            simulate: false,
            verbose: false,
        }
    }

    /// Log and print changes without touching the directory.
    #[must_use]
    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Print one line per change to the output.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Apply additions, then removals.
    ///
    /// Per-item resolution failures and rejections are recorded in the
    /// report; only fatal errors end the batch early.
    #[instrument(skip_all, fields(simulate = self.simulate, changes = plan.change_count()))]
    pub async fn apply<W: Write>(
        &self,
        plan: &Reconciliation,
        out: &mut W,
    ) -> DirectoryResult<ApplyReport> {
        let mut report = ApplyReport {
            simulated: self.simulate,
            ..ApplyReport::default()
        };

        self.apply_side(ChangeAction::Add, &plan.to_add, out, &mut report)
            .await?;
        self.apply_side(ChangeAction::Delete, &plan.to_remove, out, &mut report)
            .await?;

        info!(
            app = APP_ID,
            added = report.added,
            removed = report.removed,
            failed = report.failures.len(),
            simulate = self.simulate,
            "Applied group owner changes"
        );

        Ok(report)
    }

    async fn apply_side<W: Write>(
        &self,
        action: ChangeAction,
        changes: &MembershipMap,
        out: &mut W,
        report: &mut ApplyReport,
    ) -> DirectoryResult<()> {
        for (group, users) in changes.iter() {
            let group_dn = match self.identity.require_group_dn(group).await {
                Ok(dn) => dn,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    for user in users {
                        record_failure(report, action, user, group, &e);
                    }
                    continue;
                }
            };

            for user in users {
                let user_dn = match self.identity.require_user_dn(user).await {
                    Ok(dn) => dn,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        record_failure(report, action, user, group, &e);
                        continue;
                    }
                };

                let change = PlannedChange {
                    action,
                    user: user.clone(),
                    user_dn,
                    group: group.clone(),
                    group_dn: group_dn.clone(),
                };

                match self.apply_change(&change, out).await {
                    Ok(()) => match action {
                        ChangeAction::Add => report.added += 1,
                        ChangeAction::Delete => report.removed += 1,
                    },
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => record_failure(report, action, user, group, &e),
                }
            }
        }

        Ok(())
    }

    async fn apply_change<W: Write>(&self, change: &PlannedChange, out: &mut W) -> DirectoryResult<()> {
        info!(
            app = APP_ID,
            action = %change.action,
            uid = %change.user,
            gid = %change.group,
            simulate = self.simulate,
            "Group owner change"
        );

        if self.verbose {
            writeln!(out, "{change}").map_err(|e| {
                DirectoryError::operation_failed_with_source("cannot write verbose output", e)
            })?;
        }

        if self.simulate {
            return Ok(());
        }

        match change.action {
            ChangeAction::Add => {
                self.directory
                    .add_attribute_value(&change.group_dn, self.owner_attribute, &change.user_dn)
                    .await
            }
            ChangeAction::Delete => {
                self.directory
                    .delete_attribute_value(&change.group_dn, self.owner_attribute, &change.user_dn)
                    .await
            }
        }
    }
}

fn record_failure(
    report: &mut ApplyReport,
    action: ChangeAction,
    user: &UserId,
    group: &GroupId,
    err: &DirectoryError,
) {
    error!(
        app = APP_ID,
        action = %action,
        uid = %user,
        gid = %group,
        error = %err,
        "Group owner change failed"
    );
    report.failures.push(ItemFailure {
        action,
        user: user.clone(),
        group: group.clone(),
        error: err.to_string(),
    });
}
