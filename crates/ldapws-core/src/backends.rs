//! Ordered backend registry
//!
//! Hosts consult user and group backends in order. The directory backend
//! must answer first so that writes reach the directory before any local
//! backend claims the user.

use std::fmt;

/// Priority class of a registered backend. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackendPriority {
    /// LDAP-backed user or group backend.
    Directory,
    /// Any other backend.
    Default,
}

/// A backend together with its name and priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredBackend<B> {
    pub name: String,
    pub priority: BackendPriority,
    pub backend: B,
}

impl<B> RegisteredBackend<B> {
    /// Whether this is a directory backend.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.priority == BackendPriority::Directory
    }
}

/// Priority-ordered list of backends owned by the host.
#[derive(Debug, Clone)]
pub struct BackendRegistry<B> {
    entries: Vec<RegisteredBackend<B>>,
}

impl<B> Default for BackendRegistry<B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<B> BackendRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend.
    ///
    /// The entry is placed after every backend of the same or higher
    /// priority, so registration order is kept within a priority class.
    pub fn register(&mut self, name: impl Into<String>, priority: BackendPriority, backend: B) {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.priority > priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            position,
            RegisteredBackend {
                name: name.into(),
                priority,
                backend,
            },
        );
    }

    /// Move every directory backend ahead of the others.
    ///
    /// Stable: relative order inside each class is unchanged. Useful when
    /// entries were appended through [`BackendRegistry::push`].
    pub fn promote_directory_backends(&mut self) {
        self.entries.sort_by_key(|entry| entry.priority);
    }

    /// Append a backend without reordering.
    pub fn push(&mut self, name: impl Into<String>, priority: BackendPriority, backend: B) {
        self.entries.push(RegisteredBackend {
            name: name.into(),
            priority,
            backend,
        });
    }

    /// Backends in consultation order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredBackend<B>> {
        self.entries.iter()
    }

    /// Names in consultation order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// First backend consulted, if any.
    pub fn first(&self) -> Option<&RegisteredBackend<B>> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for BackendPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendPriority::Directory => f.write_str("directory"),
            BackendPriority::Default => f.write_str("default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_puts_directory_first() {
        let mut registry = BackendRegistry::new();
        registry.register("database", BackendPriority::Default, 1);
        registry.register("saml", BackendPriority::Default, 2);
        registry.register("ldap", BackendPriority::Directory, 3);

        assert_eq!(registry.names(), vec!["ldap", "database", "saml"]);
        assert!(registry.first().unwrap().is_directory());
    }

    #[test]
    fn test_register_keeps_order_within_class() {
        let mut registry = BackendRegistry::new();
        registry.register("ldap-a", BackendPriority::Directory, ());
        registry.register("database", BackendPriority::Default, ());
        registry.register("ldap-b", BackendPriority::Directory, ());

        assert_eq!(registry.names(), vec!["ldap-a", "ldap-b", "database"]);
    }

    #[test]
    fn test_promote_is_stable_partition() {
        let mut registry = BackendRegistry::new();
        registry.push("database", BackendPriority::Default, ());
        registry.push("ldap-a", BackendPriority::Directory, ());
        registry.push("saml", BackendPriority::Default, ());
        registry.push("ldap-b", BackendPriority::Directory, ());

        registry.promote_directory_backends();

        assert_eq!(registry.names(), vec!["ldap-a", "ldap-b", "database", "saml"]);
    }

    #[test]
    fn test_promote_without_directory_backend_is_noop() {
        let mut registry = BackendRegistry::new();
        registry.push("database", BackendPriority::Default, ());
        registry.push("saml", BackendPriority::Default, ());

        registry.promote_directory_backends();

        assert_eq!(registry.names(), vec!["database", "saml"]);
        assert_eq!(registry.len(), 2);
    }
}
