//! Identifier newtypes
//!
//! Group and user identifiers are opaque strings that both the local store
//! and the directory agree on.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a group, e.g. the group's display name in the directory.
    GroupId
);

string_id!(
    /// Identifier of a user, e.g. the user's login name.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(GroupId::new("engineering").to_string(), "engineering");
        assert_eq!(UserId::from("alice").as_str(), "alice");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&UserId::new("bob")).unwrap();
        assert_eq!(json, "\"bob\"");

        let parsed: GroupId = serde_json::from_str("\"sales\"").unwrap();
        assert_eq!(parsed, GroupId::new("sales"));
    }

    #[test]
    fn test_ids_order_lexically() {
        let mut ids = vec![UserId::new("carol"), UserId::new("alice"), UserId::new("bob")];
        ids.sort();
        assert_eq!(ids, vec![UserId::new("alice"), UserId::new("bob"), UserId::new("carol")]);
    }
}
