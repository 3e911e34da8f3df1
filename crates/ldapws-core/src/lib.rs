//! # LDAP Write Support Core
//!
//! Domain types and capability traits for writing back to an LDAP directory
//! that is otherwise consumed read-only.
//!
//! This crate has no LDAP client of its own. It defines the seams that the
//! `ldapws-ldap` crate implements and that tests fake:
//!
//! - [`DirectoryOps`] - low-level search/modify/delete against one endpoint
//! - [`IdentityMapper`] - DN to user/group name resolution
//! - [`RosterProvider`] - local group administrator assignments
//! - [`UserPlugin`], [`GroupPlugin`] - write capabilities exposed to a host
//!
//! It also holds the pure owner reconciler used by the group admin sync:
//!
//! ```
//! use ldapws_core::prelude::*;
//!
//! let local: MembershipMap = [("engineering", "alice"), ("engineering", "bob")]
//!     .into_iter()
//!     .collect();
//! let directory: MembershipMap = [("engineering", "bob"), ("engineering", "carol")]
//!     .into_iter()
//!     .collect();
//!
//! let plan = reconcile(&local, &directory);
//! assert!(plan.to_add.contains(&GroupId::new("engineering"), &UserId::new("alice")));
//! assert!(plan.to_remove.contains(&GroupId::new("engineering"), &UserId::new("carol")));
//! ```

pub mod actions;
pub mod activation;
pub mod association;
pub mod backends;
pub mod directory;
pub mod error;
pub mod identity;
pub mod ids;
pub mod membership;
pub mod plugin;
pub mod reconcile;
pub mod roster;
pub mod settings;

/// Application identifier attached to every log event.
pub const APP_ID: &str = "ldap_user_write_support";

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::actions::{GroupActions, UserActions};
    pub use crate::activation::{activate, ActivationOutcome, HostReadiness, PluginHost};
    pub use crate::association::{MemberAssociation, MemberValueKind, MembershipOperation};
    pub use crate::backends::{BackendPriority, BackendRegistry, RegisteredBackend};
    pub use crate::directory::{DirectoryEntry, DirectoryOps, Modification};
    pub use crate::error::{result_code, DirectoryError, DirectoryResult};
    pub use crate::identity::IdentityMapper;
    pub use crate::ids::{GroupId, UserId};
    pub use crate::membership::MembershipMap;
    pub use crate::plugin::{DeletionFlag, GroupPlugin, UserChange, UserPlugin};
    pub use crate::reconcile::{reconcile, Reconciliation};
    pub use crate::roster::{FileRoster, Role, RoleAssignment, RosterProvider};
    pub use crate::settings::{SettingKey, WriteSettings};
    pub use crate::APP_ID;
}

pub use async_trait::async_trait;
pub use directory::{DirectoryEntry, DirectoryOps, Modification};
pub use error::{DirectoryError, DirectoryResult};
pub use identity::IdentityMapper;
pub use ids::{GroupId, UserId};
pub use membership::MembershipMap;
pub use plugin::{GroupPlugin, UserPlugin};
pub use reconcile::{reconcile, Reconciliation};
pub use roster::RosterProvider;
