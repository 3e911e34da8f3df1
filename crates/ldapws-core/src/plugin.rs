//! Write capabilities a host can register next to its read-only directory backend.

use async_trait::async_trait;

use crate::actions::{GroupActions, UserActions};
use crate::error::DirectoryResult;
use crate::ids::{GroupId, UserId};

/// A change to a local user that should be mirrored to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    /// The avatar changed; `None` means it was removed.
    Avatar(Option<Vec<u8>>),
    /// The email address changed.
    Email { new: String, old: Option<String> },
    /// Any other feature; not mirrored.
    Other(String),
}

/// Marks a local user record as deleted once its directory entry is gone.
#[async_trait]
pub trait DeletionFlag: Send + Sync {
    async fn flag_record(&self, user: &UserId) -> DirectoryResult<()>;
}

/// User write plugin.
#[async_trait]
pub trait UserPlugin: Send + Sync {
    /// Actions this plugin implements.
    fn respond_to_actions(&self) -> UserActions;

    /// Set the display name. Returns the name that was stored.
    async fn set_display_name(&self, user: &UserId, display_name: &str) -> DirectoryResult<String>;

    /// Whether `user` may change their avatar.
    fn can_change_avatar(&self, user: &UserId) -> bool;

    /// Store or remove the avatar image.
    async fn change_avatar(&self, user: &UserId, image: Option<&[u8]>) -> DirectoryResult<()>;

    /// Store a new email address.
    async fn change_email(&self, user: &UserId, email: &str) -> DirectoryResult<()>;

    /// Create a user. Returns whether a user was created.
    async fn create_user(&self, user: &UserId, password: &str) -> DirectoryResult<bool>;

    /// Delete a user. Returns whether the user is gone.
    async fn delete_user(&self, user: &UserId) -> DirectoryResult<bool>;

    /// Whether passwords may be changed through this plugin.
    fn can_set_password(&self) -> bool;

    /// Set a new password. Returns whether the directory accepted it.
    async fn set_password(&self, user: &UserId, password: &str) -> DirectoryResult<bool>;

    /// Mirror a local user change to the directory.
    async fn handle_user_change(&self, user: &UserId, change: UserChange) -> DirectoryResult<()> {
        match change {
            UserChange::Avatar(image) => self.change_avatar(user, image.as_deref()).await,
            UserChange::Email { new, .. } => self.change_email(user, &new).await,
            UserChange::Other(_) => Ok(()),
        }
    }
}

/// Group write plugin.
#[async_trait]
pub trait GroupPlugin: Send + Sync {
    /// Actions this plugin implements.
    fn respond_to_actions(&self) -> GroupActions;

    /// Create a group. Returns the new group id, if one was created.
    async fn create_group(&self, group: &GroupId) -> DirectoryResult<Option<GroupId>>;

    /// Delete a group. Returns whether the directory accepted it.
    async fn delete_group(&self, group: &GroupId) -> DirectoryResult<bool>;

    /// Add `user` to `group`. Returns whether the directory accepted it.
    async fn add_to_group(&self, user: &UserId, group: &GroupId) -> DirectoryResult<bool>;

    /// Remove `user` from `group`. Returns whether the directory accepted it.
    async fn remove_from_group(&self, user: &UserId, group: &GroupId) -> DirectoryResult<bool>;

    /// Whether `group` lives in the directory.
    async fn is_directory_group(&self, group: &GroupId) -> bool;
}
