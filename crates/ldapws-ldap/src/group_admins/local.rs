//! Desired owners, from the local administrator roster.

use ldapws_core::error::DirectoryResult;
use ldapws_core::membership::MembershipMap;
use ldapws_core::roster::{RoleAssignment, RosterProvider};
use ldapws_core::APP_ID;
use tracing::{debug, instrument};

/// Reads group administrators from a [`RosterProvider`].
pub struct LocalMembershipSource<'a> {
    roster: &'a dyn RosterProvider,
}

impl<'a> LocalMembershipSource<'a> {
    pub fn new(roster: &'a dyn RosterProvider) -> Self {
        Self { roster }
    }

    /// Group to administrators mapping. Roster errors are returned as is.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> DirectoryResult<MembershipMap> {
        let assignments = self.roster.role_assignments().await?;
        let admins = admin_map(&assignments);

        debug!(
            app = APP_ID,
            groups = admins.group_count(),
            admins = admins.pair_count(),
            "Collected local group administrators"
        );

        Ok(admins)
    }
}

/// Keep only administrator assignments, grouped by group.
#[must_use]
pub fn admin_map(assignments: &[RoleAssignment]) -> MembershipMap {
    assignments
        .iter()
        .filter(|assignment| assignment.is_admin())
        .map(|assignment| (assignment.group.clone(), assignment.user.clone()))
        .collect()
}
