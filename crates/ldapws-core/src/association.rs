//! Group member association modes
//!
//! Directory servers record group membership in different ways. Each mode
//! knows which attribute to write and whether the value is the user's name
//! or the user's DN. Numeric gid linkage cannot be expressed as a single
//! attribute write on the group entry and is rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// How a group entry refers to its members.
///
/// Deserialized case-insensitively through [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MemberAssociation {
    /// `memberUid` holding user names (posixGroup).
    #[serde(rename = "memberUid")]
    MemberUid,
    /// `uniqueMember` holding user DNs (groupOfUniqueNames).
    #[serde(rename = "uniqueMember")]
    UniqueMember,
    /// `member` holding user DNs (groupOfNames, AD groups).
    #[default]
    #[serde(rename = "member")]
    Member,
    /// Users carry the group's `gidNumber`; read-only for this crate.
    #[serde(rename = "gidNumber")]
    GidNumber,
}

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOperation {
    Add,
    Remove,
}

impl fmt::Display for MembershipOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipOperation::Add => f.write_str("add to group"),
            MembershipOperation::Remove => f.write_str("remove from group"),
        }
    }
}

/// What kind of value goes into the member attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberValueKind {
    /// The user's name.
    UserName,
    /// The user's distinguished name.
    UserDn,
}

/// Attribute and value kind to write for a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberAttribute {
    pub name: &'static str,
    pub value: MemberValueKind,
}

impl MemberAssociation {
    /// Canonical attribute-style name of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberAssociation::MemberUid => "memberUid",
            MemberAssociation::UniqueMember => "uniqueMember",
            MemberAssociation::Member => "member",
            MemberAssociation::GidNumber => "gidNumber",
        }
    }

    /// Attribute to modify on the group entry for `operation`.
    ///
    /// # Errors
    /// [`DirectoryError::UnsupportedAssociation`] for [`MemberAssociation::GidNumber`].
    pub fn member_attribute(
        &self,
        operation: MembershipOperation,
    ) -> DirectoryResult<MemberAttribute> {
        match self {
            MemberAssociation::MemberUid => Ok(MemberAttribute {
                name: "memberuid",
                value: MemberValueKind::UserName,
            }),
            MemberAssociation::UniqueMember => Ok(MemberAttribute {
                name: "uniquemember",
                value: MemberValueKind::UserDn,
            }),
            MemberAssociation::Member => Ok(MemberAttribute {
                name: "member",
                value: MemberValueKind::UserDn,
            }),
            MemberAssociation::GidNumber => Err(DirectoryError::UnsupportedAssociation {
                mode: self.as_str().to_string(),
                operation: operation.to_string(),
            }),
        }
    }
}

impl fmt::Display for MemberAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberAssociation {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memberuid" => Ok(MemberAssociation::MemberUid),
            "uniquemember" => Ok(MemberAssociation::UniqueMember),
            "member" => Ok(MemberAssociation::Member),
            "gidnumber" => Ok(MemberAssociation::GidNumber),
            _ => Err(DirectoryError::invalid_configuration(format!(
                "unknown group member association '{s}'"
            ))),
        }
    }
}

impl TryFrom<String> for MemberAssociation {
    type Error = DirectoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
