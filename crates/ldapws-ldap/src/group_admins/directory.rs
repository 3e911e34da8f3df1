//! Recorded owners, from the group entries' owner attribute.

use ldapws_core::directory::{DirectoryOps, SearchScope};
use ldapws_core::error::DirectoryResult;
use ldapws_core::identity::IdentityMapper;
use ldapws_core::ids::GroupId;
use ldapws_core::membership::MembershipMap;
use ldapws_core::APP_ID;
use tracing::{debug, instrument, warn};

use crate::config::LdapConfig;

/// Reads group owners from the directory.
pub struct DirectoryMembershipSource<'a> {
    directory: &'a dyn DirectoryOps,
    identity: &'a dyn IdentityMapper,
    config: &'a LdapConfig,
}

impl<'a> DirectoryMembershipSource<'a> {
    pub fn new(
        directory: &'a dyn DirectoryOps,
        identity: &'a dyn IdentityMapper,
        config: &'a LdapConfig,
    ) -> Self {
        Self {
            directory,
            identity,
            config,
        }
    }

    /// Group to owners mapping.
    ///
    /// Groups without a display name and owner DNs that do not resolve to a
    /// user are skipped with a warning.
    #[instrument(skip(self), fields(endpoint = %self.directory.endpoint()))]
    pub async fn fetch(&self) -> DirectoryResult<MembershipMap> {
        let display_attribute = self.config.group_display_name_attribute.as_str();
        let owner_attribute = self.config.owner_attribute.as_str();
        let attributes = [
            display_attribute,
            "dn",
            self.config.member_association.as_str(),
            owner_attribute,
        ];

        let entries = self
            .directory
            .search(
                &self.config.group_dn(),
                SearchScope::Subtree,
                &self.config.group_filter,
                &attributes,
            )
            .await?;

        let mut owners = MembershipMap::new();

        for entry in &entries {
            let Some(name) = entry.first(display_attribute) else {
                warn!(app = APP_ID, dn = %entry.dn, "Group entry has no display name, skipping");
                continue;
            };
            let group = GroupId::new(name);

            if !entry.has(owner_attribute) {
                continue;
            }
            owners.ensure_group(group.clone());

            for owner_dn in entry.values(owner_attribute) {
                match self.identity.user_name_by_dn(owner_dn).await {
                    Ok(Some(user)) => {
                        owners.insert(group.clone(), user);
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(
                            app = APP_ID,
                            gid = %group,
                            owner = %owner_dn,
                            error = %e,
                            "Cannot resolve owner DN, skipping"
                        );
                    }
                    Ok(None) => {
                        warn!(
                            app = APP_ID,
                            gid = %group,
                            owner = %owner_dn,
                            "Owner DN does not map to a user, skipping"
                        );
                    }
                }
            }
        }

        debug!(
            app = APP_ID,
            groups = entries.len(),
            owners = owners.pair_count(),
            "Collected directory group owners"
        );

        Ok(owners)
    }
}
