//! `ldap3`-backed directory connection
//!
//! [`LdapDirectory`] implements [`DirectoryOps`] for one endpoint. The bound
//! connection is created lazily and reused for every request of a run.

use std::sync::Arc;

use async_trait::async_trait;
use ldap3::exop::PasswordModify;
use ldap3::result::ExopResult;
use ldap3::{
    Ldap, LdapConnAsync, LdapConnSettings, LdapResult, Mod, Scope, SearchEntry, SearchResult,
};
use ldapws_core::directory::{
    DirectoryEntry, DirectoryOps, Modification, SearchScope, PASSWORD_MODIFY_OID,
};
use ldapws_core::error::{result_code, DirectoryError, DirectoryResult};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::{EndpointConfig, LdapConfig};

/// Connection to one LDAP endpoint.
pub struct LdapDirectory {
    /// Configuration.
    config: LdapConfig,

    /// Name used in logs.
    endpoint: String,

    /// Cached LDAP connection (lazily initialized).
    connection: Arc<RwLock<Option<Ldap>>>,

    /// Cached root DSE answer for the password modify extension.
    password_modify_supported: RwLock<Option<bool>>,
}

impl LdapDirectory {
    /// Create a directory handle; no connection is made yet.
    pub fn new(config: LdapConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let endpoint = config.url();

        Ok(Self {
            config,
            endpoint,
            connection: Arc::new(RwLock::new(None)),
            password_modify_supported: RwLock::new(None),
        })
    }

    /// Configuration of this endpoint.
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    /// Connect and bind now instead of on the first request.
    pub async fn connect(&self) -> DirectoryResult<()> {
        self.get_connection().await.map(|_| ())
    }

    /// Get an LDAP connection, creating one if necessary.
    async fn get_connection(&self) -> DirectoryResult<Ldap> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let conn = self.create_connection().await?;

        {
            let mut conn_guard = self.connection.write().await;
            *conn_guard = Some(conn.clone());
        }

        Ok(conn)
    }

    /// Create a new LDAP connection.
    async fn create_connection(&self) -> DirectoryResult<Ldap> {
        let url = self.config.url();

        debug!(url = %url, "Connecting to LDAP server");

        let settings = LdapConnSettings::new()
            .set_conn_timeout(std::time::Duration::from_secs(
                self.config.connection_timeout_secs,
            ))
            .set_starttls(self.config.use_starttls);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("Failed to connect to LDAP server at {url}"),
                    e,
                )
            })?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_dn = &self.config.bind_dn;
        let bind_password = self.config.bind_password.as_deref().unwrap_or("");

        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        let result = ldap
            .simple_bind(bind_dn, bind_password)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("LDAP bind failed for {bind_dn}"),
                    e,
                )
            })?;

        if result.rc != result_code::SUCCESS {
            if result.rc == result_code::INVALID_CREDENTIALS {
                return Err(DirectoryError::AuthenticationFailed);
            }
            return Err(DirectoryError::connection_failed(format!(
                "LDAP bind failed with code {}: {}",
                result.rc, result.text
            )));
        }

        info!(host = %self.config.host, "LDAP connection established successfully");

        Ok(ldap)
    }

    fn check(dn: &str, result: LdapResult) -> DirectoryResult<()> {
        if result.rc == result_code::SUCCESS {
            Ok(())
        } else {
            Err(DirectoryError::rejected(dn, result.rc, result.text))
        }
    }
}

fn to_ldap_scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Base => Scope::Base,
        SearchScope::OneLevel => Scope::OneLevel,
        SearchScope::Subtree => Scope::Subtree,
    }
}

fn to_ldap_mod(modification: Modification) -> Mod<Vec<u8>> {
    match modification {
        Modification::Add { attribute, values } => {
            Mod::Add(attribute.into_bytes(), values.into_iter().collect())
        }
        Modification::Delete { attribute, values } => {
            Mod::Delete(attribute.into_bytes(), values.into_iter().collect())
        }
        Modification::Replace { attribute, values } => {
            Mod::Replace(attribute.into_bytes(), values.into_iter().collect())
        }
    }
}

fn to_directory_entry(entry: SearchEntry) -> DirectoryEntry {
    DirectoryEntry {
        dn: entry.dn,
        attrs: entry.attrs,
        bin_attrs: entry.bin_attrs,
    }
}

#[async_trait]
impl DirectoryOps for LdapDirectory {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, attributes))]
    async fn search(
        &self,
        base: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        let mut ldap = self.get_connection().await?;

        let SearchResult(entries, result) = ldap
            .search(base, to_ldap_scope(scope), filter, attributes.to_vec())
            .await
            .map_err(|e| DirectoryError::operation_failed_with_source("LDAP search failed", e))?;

        Self::check(base, result)?;

        let entries: Vec<DirectoryEntry> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(to_directory_entry)
            .collect();

        debug!(total_found = entries.len(), "LDAP search completed");

        Ok(entries)
    }

    #[instrument(skip(self, modifications), fields(count = modifications.len()))]
    async fn modify(&self, dn: &str, modifications: Vec<Modification>) -> DirectoryResult<()> {
        if modifications.is_empty() {
            return Ok(());
        }

        let mut ldap = self.get_connection().await?;
        let mods: Vec<Mod<Vec<u8>>> = modifications.into_iter().map(to_ldap_mod).collect();

        let result = ldap.modify(dn, mods).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(format!("Failed to modify entry: {dn}"), e)
        })?;

        Self::check(dn, result)?;

        debug!(dn = %dn, "LDAP entry modified");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, dn: &str) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        let result = ldap.delete(dn).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(format!("Failed to delete entry: {dn}"), e)
        })?;

        Self::check(dn, result)?;

        info!(dn = %dn, "LDAP entry deleted");
        Ok(())
    }

    async fn supports_password_modify(&self) -> DirectoryResult<bool> {
        if let Some(supported) = *self.password_modify_supported.read().await {
            return Ok(supported);
        }

        let root_dse = self
            .search("", SearchScope::Base, "(objectClass=*)", &["supportedExtension"])
            .await?;

        let supported = root_dse.iter().any(|entry| {
            entry
                .values("supportedExtension")
                .iter()
                .any(|oid| oid == PASSWORD_MODIFY_OID)
        });

        debug!(supported, "Checked password modify extended operation");
        *self.password_modify_supported.write().await = Some(supported);

        Ok(supported)
    }

    #[instrument(skip(self, new_password))]
    async fn password_modify(&self, dn: &str, new_password: &str) -> DirectoryResult<()> {
        let mut ldap = self.get_connection().await?;

        let exop = PasswordModify {
            user_id: Some(dn),
            old_pass: None,
            new_pass: Some(new_password),
        };

        let ExopResult(_, result) = ldap.extended(exop).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(
                format!("Password modify failed for {dn}"),
                e,
            )
        })?;

        Self::check(dn, result)
    }
}

impl std::fmt::Debug for LdapDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapDirectory")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config.redacted())
            .finish()
    }
}

/// Opens bound connections for configured endpoints.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connect(&self, endpoint: &EndpointConfig) -> DirectoryResult<Arc<dyn DirectoryOps>>;
}

/// [`ConnectionProvider`] that binds an [`LdapDirectory`] eagerly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LdapConnectionProvider;

#[async_trait]
impl ConnectionProvider for LdapConnectionProvider {
    #[instrument(skip(self, endpoint), fields(prefix = %endpoint.prefix))]
    async fn connect(&self, endpoint: &EndpointConfig) -> DirectoryResult<Arc<dyn DirectoryOps>> {
        let directory = LdapDirectory::new(endpoint.ldap.clone())?;
        directory.connect().await?;
        Ok(Arc::new(directory))
    }
}
