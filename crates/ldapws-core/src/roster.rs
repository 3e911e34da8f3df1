//! Local role assignments
//!
//! The authorization roster lists which users hold which role for which
//! group. Only the administrator role matters to the owner sync.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{DirectoryError, DirectoryResult};
use crate::ids::{GroupId, UserId};

/// Role a user holds for a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Group administrator (sub-admin).
    Admin,
    /// Any other role; ignored by the owner sync.
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => "admin".to_string(),
            Role::Other(name) => name,
        }
    }
}

/// One (group, user, role) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub group: GroupId,
    pub user: UserId,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Admin
}

impl RoleAssignment {
    /// Create an administrator assignment.
    pub fn admin(group: impl Into<GroupId>, user: impl Into<UserId>) -> Self {
        Self {
            group: group.into(),
            user: user.into(),
            role: Role::Admin,
        }
    }

    /// Whether the assignment grants the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Source of the full roster of role assignments.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Every assignment known to the local authorization store.
    async fn role_assignments(&self) -> DirectoryResult<Vec<RoleAssignment>>;
}

/// Roster stored as a JSON array of `{ "group", "user", "role" }` objects.
#[derive(Debug, Clone)]
pub struct FileRoster {
    path: PathBuf,
}

impl FileRoster {
    /// Read the roster from `path` on every call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the roster file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RosterProvider for FileRoster {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn role_assignments(&self) -> DirectoryResult<Vec<RoleAssignment>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DirectoryError::roster_with_source(
                format!("cannot read roster file {}", self.path.display()),
                e,
            )
        })?;

        let assignments: Vec<RoleAssignment> = serde_json::from_str(&content).map_err(|e| {
            DirectoryError::roster_with_source(
                format!("invalid roster file {}", self.path.display()),
                e,
            )
        })?;

        debug!(count = assignments.len(), "Loaded role assignments");
        Ok(assignments)
    }
}

/// In-memory roster, handy for embedding hosts and tests.
#[async_trait]
impl RosterProvider for Vec<RoleAssignment> {
    async fn role_assignments(&self) -> DirectoryResult<Vec<RoleAssignment>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_role_parsing() {
        let assignment: RoleAssignment =
            serde_json::from_str(r#"{"group": "eng", "user": "alice", "role": "Admin"}"#).unwrap();
        assert!(assignment.is_admin());

        let assignment: RoleAssignment =
            serde_json::from_str(r#"{"group": "eng", "user": "bob", "role": "member"}"#).unwrap();
        assert_eq!(assignment.role, Role::Other("member".to_string()));
        assert!(!assignment.is_admin());
    }

    #[test]
    fn test_role_defaults_to_admin() {
        let assignment: RoleAssignment =
            serde_json::from_str(r#"{"group": "eng", "user": "alice"}"#).unwrap();
        assert!(assignment.is_admin());
    }

    #[tokio::test]
    async fn test_file_roster_reads_assignments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"group": "eng", "user": "alice", "role": "admin"}},
                {{"group": "sales", "user": "dave", "role": "admin"}}]"#
        )
        .unwrap();

        let roster = FileRoster::new(file.path());
        let assignments = roster.role_assignments().await.unwrap();

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[1], RoleAssignment::admin("sales", "dave"));
    }

    #[tokio::test]
    async fn test_file_roster_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let roster = FileRoster::new(dir.path().join("absent.json"));

        let err = roster.role_assignments().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Roster { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_file_roster_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = FileRoster::new(file.path())
            .role_assignments()
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Roster { .. }));
    }
}
