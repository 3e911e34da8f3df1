//! CLI command implementations

pub mod group;
pub mod settings;
pub mod sync_group_admins;
pub mod user;

use std::path::Path;

use ldapws_ldap::{LdapConnectionProvider, LdapProvider};

use crate::config::AppConfig;
use crate::error::CliResult;

/// Load the configuration and bind to its single active endpoint.
pub(crate) async fn connect(config_path: &Path) -> CliResult<(AppConfig, LdapProvider)> {
    let config = AppConfig::load(config_path)?;
    let provider = LdapProvider::connect(&config.endpoints, &LdapConnectionProvider).await?;
    Ok((config, provider))
}
