//! # LDAP Write Support
//!
//! `ldap3`-backed implementation of the write plugins and the group
//! administrator synchronisation.
//!
//! ## Example
//!
//! ```ignore
//! use ldapws_ldap::{EndpointConfig, LdapConfig, LdapConnectionProvider, LdapProvider};
//! use ldapws_core::prelude::*;
//!
//! let config = LdapConfig::new(
//!     "ldap.example.com",
//!     "dc=example,dc=com",
//!     "cn=admin,dc=example,dc=com",
//! )
//! .with_password("secret")
//! .with_group_container("ou=groups");
//!
//! let endpoints = vec![EndpointConfig::new("s01", config)];
//! let provider = LdapProvider::connect(&endpoints, &LdapConnectionProvider).await?;
//! provider
//!     .group_manager()
//!     .add_to_group(&UserId::new("alice"), &GroupId::new("engineering"))
//!     .await?;
//! ```

pub mod config;
pub mod connector;
pub mod escape;
pub mod group_admins;
pub mod group_manager;
pub mod identity;
pub mod password;
pub mod provider;
pub mod user_manager;

// Re-exports
pub use config::{select_single_endpoint, EndpointConfig, LdapConfig};
pub use connector::{ConnectionProvider, LdapConnectionProvider, LdapDirectory};
pub use group_admins::{GroupAdminSync, SyncOptions, SyncOutcome};
pub use group_manager::LdapGroupManager;
pub use identity::LdapIdentityMapper;
pub use password::PasswordStrategy;
pub use provider::LdapProvider;
pub use user_manager::LdapUserManager;
