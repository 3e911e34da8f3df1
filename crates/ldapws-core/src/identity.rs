//! Identity resolution between local names and directory DNs.

use async_trait::async_trait;

use crate::error::{DirectoryError, DirectoryResult};
use crate::ids::{GroupId, UserId};

/// Bidirectional lookup between local identifiers and distinguished names.
///
/// Lookups return `Ok(None)` when the name or DN is unknown; errors are
/// reserved for failures talking to the backing store.
#[async_trait]
pub trait IdentityMapper: Send + Sync {
    /// Name of the user stored at `dn`.
    async fn user_name_by_dn(&self, dn: &str) -> DirectoryResult<Option<UserId>>;

    /// DN of the user called `user`.
    async fn user_dn_by_name(&self, user: &UserId) -> DirectoryResult<Option<String>>;

    /// DN of the group called `group`.
    async fn group_dn_by_name(&self, group: &GroupId) -> DirectoryResult<Option<String>>;

    /// Like [`IdentityMapper::user_dn_by_name`], failing with `NotFound` for unknown users.
    async fn require_user_dn(&self, user: &UserId) -> DirectoryResult<String> {
        self.user_dn_by_name(user)
            .await?
            .ok_or_else(|| DirectoryError::not_found("user", user.as_str()))
    }

    /// Like [`IdentityMapper::group_dn_by_name`], failing with `NotFound` for unknown groups.
    async fn require_group_dn(&self, group: &GroupId) -> DirectoryResult<String> {
        self.group_dn_by_name(group)
            .await?
            .ok_or_else(|| DirectoryError::not_found("group", group.as_str()))
    }
}
