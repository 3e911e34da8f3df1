//! Low-level directory operations
//!
//! The narrow set of LDAP requests the write plugins and the group admin
//! sync issue. `ldapws-ldap` implements [`DirectoryOps`] over `ldap3`;
//! tests implement it in memory.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::DirectoryResult;

/// OID of the LDAP Password Modify extended operation (RFC 3062).
pub const PASSWORD_MODIFY_OID: &str = "1.3.6.1.4.1.4203.1.11.1";

/// Search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Base,
    OneLevel,
    Subtree,
}

/// A single entry returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Distinguished name of the entry.
    pub dn: String,
    /// Text attributes as returned by the server.
    pub attrs: HashMap<String, Vec<String>>,
    /// Binary attributes as returned by the server.
    pub bin_attrs: HashMap<String, Vec<Vec<u8>>>,
}

impl DirectoryEntry {
    /// Create an entry with no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    /// Builder: set a text attribute.
    #[must_use]
    pub fn with_attr<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Values of a text attribute. Attribute names match case-insensitively.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value of a text attribute.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Whether the attribute is present with at least one value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }
}

/// One change within a modify request.
///
/// Values are raw bytes so binary attributes (`jpegPhoto`, `unicodePwd`)
/// travel unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
    /// Add values to the attribute.
    Add {
        attribute: String,
        values: Vec<Vec<u8>>,
    },
    /// Delete the listed values, or the whole attribute when `values` is empty.
    Delete {
        attribute: String,
        values: Vec<Vec<u8>>,
    },
    /// Replace all values of the attribute.
    Replace {
        attribute: String,
        values: Vec<Vec<u8>>,
    },
}

impl Modification {
    /// Add a single value.
    pub fn add(attribute: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Modification::Add {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Delete a single value.
    pub fn delete(attribute: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Modification::Delete {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Delete every value of the attribute.
    pub fn delete_all(attribute: impl Into<String>) -> Self {
        Modification::Delete {
            attribute: attribute.into(),
            values: Vec::new(),
        }
    }

    /// Replace the attribute with a single value.
    pub fn replace(attribute: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Modification::Replace {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Attribute the modification targets.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Modification::Add { attribute, .. }
            | Modification::Delete { attribute, .. }
            | Modification::Replace { attribute, .. } => attribute,
        }
    }

    /// Values carried by the modification.
    #[must_use]
    pub fn values(&self) -> &[Vec<u8>] {
        match self {
            Modification::Add { values, .. }
            | Modification::Delete { values, .. }
            | Modification::Replace { values, .. } => values,
        }
    }
}

/// Requests against one bound directory endpoint.
///
/// Non-success LDAP results surface as [`crate::DirectoryError::Rejected`]
/// carrying the result code.
#[async_trait]
pub trait DirectoryOps: Send + Sync {
    /// Human-readable endpoint name for logs.
    fn endpoint(&self) -> &str;

    /// Search `base` with `filter`, projecting `attributes`.
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>>;

    /// Apply modifications to one entry.
    async fn modify(&self, dn: &str, modifications: Vec<Modification>) -> DirectoryResult<()>;

    /// Delete one entry.
    async fn delete(&self, dn: &str) -> DirectoryResult<()>;

    /// Whether the server advertises the Password Modify extended operation.
    async fn supports_password_modify(&self) -> DirectoryResult<bool>;

    /// Set a password through the Password Modify extended operation.
    async fn password_modify(&self, dn: &str, new_password: &str) -> DirectoryResult<()>;

    /// Add one value to one attribute.
    async fn add_attribute_value(
        &self,
        dn: &str,
        attribute: &str,
        value: &str,
    ) -> DirectoryResult<()> {
        self.modify(dn, vec![Modification::add(attribute, value)])
            .await
    }

    /// Delete one value from one attribute.
    async fn delete_attribute_value(
        &self,
        dn: &str,
        attribute: &str,
        value: &str,
    ) -> DirectoryResult<()> {
        self.modify(dn, vec![Modification::delete(attribute, value)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lookup_ignores_case() {
        let entry = DirectoryEntry::new("cn=eng,ou=groups,dc=example,dc=com")
            .with_attr("cn", ["eng"])
            .with_attr("owner", ["uid=alice,ou=people,dc=example,dc=com"]);

        assert_eq!(entry.first("CN"), Some("eng"));
        assert_eq!(entry.values("Owner").len(), 1);
        assert!(entry.values("member").is_empty());
        assert!(!entry.has("member"));
    }

    #[test]
    fn test_modification_constructors() {
        let m = Modification::add("owner", "uid=alice,dc=example,dc=com");
        assert_eq!(m.attribute(), "owner");
        assert_eq!(m.values(), &[b"uid=alice,dc=example,dc=com".to_vec()]);

        let m = Modification::delete_all("jpegPhoto");
        assert!(m.values().is_empty());
        assert!(matches!(m, Modification::Delete { .. }));
    }
}
