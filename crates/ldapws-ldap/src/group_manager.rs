//! Group write plugin backed by LDAP.

use std::sync::Arc;

use async_trait::async_trait;
use ldapws_core::actions::GroupActions;
use ldapws_core::association::{MemberValueKind, MembershipOperation};
use ldapws_core::directory::{DirectoryOps, Modification};
use ldapws_core::error::{DirectoryError, DirectoryResult};
use ldapws_core::identity::IdentityMapper;
use ldapws_core::ids::{GroupId, UserId};
use ldapws_core::plugin::GroupPlugin;
use ldapws_core::APP_ID;
use tracing::{debug, error, info, instrument};

use crate::config::LdapConfig;

/// Writes group entries and memberships back to the directory.
pub struct LdapGroupManager {
    directory: Arc<dyn DirectoryOps>,
    identity: Arc<dyn IdentityMapper>,
    config: Arc<LdapConfig>,
}

impl LdapGroupManager {
    pub fn new(
        directory: Arc<dyn DirectoryOps>,
        identity: Arc<dyn IdentityMapper>,
        config: Arc<LdapConfig>,
    ) -> Self {
        Self {
            directory,
            identity,
            config,
        }
    }

    /// Build the member-attribute change for `user` on `group`.
    ///
    /// Fails before any lookup when the association mode cannot express it.
    async fn membership_change(
        &self,
        user: &UserId,
        group: &GroupId,
        operation: MembershipOperation,
    ) -> DirectoryResult<(String, Modification)> {
        let attribute = self.config.member_association.member_attribute(operation)?;
        let group_dn = self.identity.require_group_dn(group).await?;

        let value = match attribute.value {
            MemberValueKind::UserName => user.as_str().to_string(),
            MemberValueKind::UserDn => self.identity.require_user_dn(user).await?,
        };

        let modification = match operation {
            MembershipOperation::Add => Modification::add(attribute.name, value),
            MembershipOperation::Remove => Modification::delete(attribute.name, value),
        };

        Ok((group_dn, modification))
    }

    async fn change_membership(
        &self,
        user: &UserId,
        group: &GroupId,
        operation: MembershipOperation,
    ) -> DirectoryResult<bool> {
        let (group_dn, modification) = self.membership_change(user, group, operation).await?;

        match self.directory.modify(&group_dn, vec![modification]).await {
            Ok(()) => {
                info!(app = APP_ID, uid = %user, gid = %group, "Group membership updated ({operation})");
                Ok(true)
            }
            Err(e @ DirectoryError::Rejected { .. }) => {
                error!(app = APP_ID, uid = %user, gid = %group, error = %e, "Unable to {operation}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl GroupPlugin for LdapGroupManager {
    fn respond_to_actions(&self) -> GroupActions {
        if !self.config.groups_enabled {
            return GroupActions::NONE;
        }
        GroupActions::DELETE_GROUP | GroupActions::ADD_TO_GROUP | GroupActions::REMOVE_FROM_GROUP
    }

    async fn create_group(&self, group: &GroupId) -> DirectoryResult<Option<GroupId>> {
        info!(app = APP_ID, gid = %group, "LDAP group creation is disabled");
        Ok(None)
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group: &GroupId) -> DirectoryResult<bool> {
        let dn = self.identity.require_group_dn(group).await?;

        match self.directory.delete(&dn).await {
            Ok(()) => {
                info!(app = APP_ID, gid = %group, dn = %dn, "Deleted LDAP group");
                Ok(true)
            }
            Err(e @ DirectoryError::Rejected { .. }) => {
                error!(app = APP_ID, gid = %group, dn = %dn, error = %e, "Unable to delete LDAP group");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn add_to_group(&self, user: &UserId, group: &GroupId) -> DirectoryResult<bool> {
        self.change_membership(user, group, MembershipOperation::Add)
            .await
    }

    #[instrument(skip(self))]
    async fn remove_from_group(&self, user: &UserId, group: &GroupId) -> DirectoryResult<bool> {
        self.change_membership(user, group, MembershipOperation::Remove)
            .await
    }

    async fn is_directory_group(&self, group: &GroupId) -> bool {
        match self.identity.group_dn_by_name(group).await {
            Ok(dn) => dn.is_some(),
            Err(e) => {
                debug!(app = APP_ID, gid = %group, error = %e, "Group lookup failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for LdapGroupManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapGroupManager")
            .field("endpoint", &self.directory.endpoint())
            .field("member_association", &self.config.member_association)
            .finish()
    }
}
