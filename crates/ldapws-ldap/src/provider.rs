//! One bound endpoint with everything built on top of it.

use std::sync::Arc;

use ldapws_core::directory::DirectoryOps;
use ldapws_core::error::DirectoryResult;
use ldapws_core::identity::IdentityMapper;
use ldapws_core::settings::WriteSettings;
use tracing::info;

use crate::config::{select_single_endpoint, EndpointConfig, LdapConfig};
use crate::connector::ConnectionProvider;
use crate::group_manager::LdapGroupManager;
use crate::identity::LdapIdentityMapper;
use crate::user_manager::LdapUserManager;

/// Directory connection, identity mapper and configuration of one endpoint.
#[derive(Clone)]
pub struct LdapProvider {
    directory: Arc<dyn DirectoryOps>,
    identity: Arc<dyn IdentityMapper>,
    config: Arc<LdapConfig>,
}

impl LdapProvider {
    /// Wrap an open directory connection.
    pub fn new(directory: Arc<dyn DirectoryOps>, config: LdapConfig) -> Self {
        let config = Arc::new(config);
        let identity: Arc<dyn IdentityMapper> =
            Arc::new(LdapIdentityMapper::new(directory.clone(), config.clone()));
        Self {
            directory,
            identity,
            config,
        }
    }

    /// Select the single active endpoint and connect to it.
    ///
    /// Endpoint selection fails before any connection is attempted.
    pub async fn connect(
        endpoints: &[EndpointConfig],
        connector: &dyn ConnectionProvider,
    ) -> DirectoryResult<Self> {
        let endpoint = select_single_endpoint(endpoints)?;
        let directory = connector.connect(endpoint).await?;

        info!(prefix = %endpoint.prefix, endpoint = %directory.endpoint(), "Using LDAP endpoint");

        Ok(Self::new(directory, endpoint.ldap.clone()))
    }

    pub fn directory(&self) -> &dyn DirectoryOps {
        self.directory.as_ref()
    }

    pub fn identity(&self) -> &dyn IdentityMapper {
        self.identity.as_ref()
    }

    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    /// User write plugin for this endpoint.
    pub fn user_manager(&self, settings: WriteSettings) -> LdapUserManager {
        LdapUserManager::new(
            self.directory.clone(),
            self.identity.clone(),
            self.config.clone(),
            settings,
        )
    }

    /// Group write plugin for this endpoint.
    pub fn group_manager(&self) -> LdapGroupManager {
        LdapGroupManager::new(
            self.directory.clone(),
            self.identity.clone(),
            self.config.clone(),
        )
    }
}

impl std::fmt::Debug for LdapProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapProvider")
            .field("endpoint", &self.directory.endpoint())
            .field("config", &self.config.redacted())
            .finish()
    }
}
