//! LDAP endpoint configuration
//!
//! Connection settings plus the attribute names and filters the write
//! plugins need to locate users and groups on one server.

use ldapws_core::association::MemberAssociation;
use ldapws_core::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};

/// Configuration for one LDAP server.
#[derive(Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// LDAP server hostname or IP address.
    pub host: String,

    /// LDAP server port (389 for LDAP, 636 for LDAPS).
    #[serde(default = "default_ldap_port")]
    pub port: u16,

    /// Use SSL/TLS (LDAPS).
    #[serde(default)]
    pub use_ssl: bool,

    /// Use STARTTLS upgrade on plain LDAP connection.
    #[serde(default)]
    pub use_starttls: bool,

    /// Base DN for all operations (e.g., "dc=example,dc=com").
    pub base_dn: String,

    /// Bind DN for authentication (e.g., "cn=admin,dc=example,dc=com").
    pub bind_dn: String,

    /// Bind password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// User container (e.g., "ou=people" - relative to `base_dn`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_container: Option<String>,

    /// Group container (e.g., "ou=groups" - relative to `base_dn`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_container: Option<String>,

    /// LDAP filter matching user entries.
    #[serde(default = "default_user_filter")]
    pub user_filter: String,

    /// LDAP filter matching group entries.
    #[serde(default = "default_group_filter")]
    pub group_filter: String,

    /// Attribute holding the user's login name.
    #[serde(default = "default_user_name_attribute")]
    pub user_name_attribute: String,

    /// Attribute holding the user's display name.
    #[serde(default = "default_display_name_attribute")]
    pub display_name_attribute: String,

    /// Attribute holding the user's email address.
    #[serde(default = "default_email_attribute")]
    pub email_attribute: String,

    /// Attribute naming a group; its value is the group id.
    #[serde(default = "default_group_display_name_attribute")]
    pub group_display_name_attribute: String,

    /// How group entries refer to their members.
    #[serde(default)]
    pub member_association: MemberAssociation,

    /// Attribute listing a group's owners.
    #[serde(default = "default_owner_attribute")]
    pub owner_attribute: String,

    /// Whether groups are served from this directory.
    #[serde(default = "default_true")]
    pub groups_enabled: bool,

    /// Whether the server enforces a password policy; password changes are
    /// then left to the policy-aware backend.
    #[serde(default)]
    pub has_password_policy: bool,
}

impl std::fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_ssl", &self.use_ssl)
            .field("use_starttls", &self.use_starttls)
            .field("base_dn", &self.base_dn)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("connection_timeout_secs", &self.connection_timeout_secs)
            .field("user_container", &self.user_container)
            .field("group_container", &self.group_container)
            .field("user_filter", &self.user_filter)
            .field("group_filter", &self.group_filter)
            .field("user_name_attribute", &self.user_name_attribute)
            .field("display_name_attribute", &self.display_name_attribute)
            .field("email_attribute", &self.email_attribute)
            .field(
                "group_display_name_attribute",
                &self.group_display_name_attribute,
            )
            .field("member_association", &self.member_association)
            .field("owner_attribute", &self.owner_attribute)
            .field("groups_enabled", &self.groups_enabled)
            .field("has_password_policy", &self.has_password_policy)
            .finish()
    }
}

fn default_ldap_port() -> u16 {
    389
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_user_filter() -> String {
    "(objectClass=inetOrgPerson)".to_string()
}

fn default_group_filter() -> String {
    "(objectClass=groupOfNames)".to_string()
}

fn default_user_name_attribute() -> String {
    "uid".to_string()
}

fn default_display_name_attribute() -> String {
    "displayName".to_string()
}

fn default_email_attribute() -> String {
    "mail".to_string()
}

fn default_group_display_name_attribute() -> String {
    "cn".to_string()
}

fn default_owner_attribute() -> String {
    "owner".to_string()
}

fn default_true() -> bool {
    true
}

impl LdapConfig {
    /// Create a new LDAP config with required fields.
    pub fn new(
        host: impl Into<String>,
        base_dn: impl Into<String>,
        bind_dn: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: default_ldap_port(),
            use_ssl: false,
            use_starttls: false,
            base_dn: base_dn.into(),
            bind_dn: bind_dn.into(),
            bind_password: None,
            connection_timeout_secs: default_connection_timeout(),
            user_container: None,
            group_container: None,
            user_filter: default_user_filter(),
            group_filter: default_group_filter(),
            user_name_attribute: default_user_name_attribute(),
            display_name_attribute: default_display_name_attribute(),
            email_attribute: default_email_attribute(),
            group_display_name_attribute: default_group_display_name_attribute(),
            member_association: MemberAssociation::default(),
            owner_attribute: default_owner_attribute(),
            groups_enabled: true,
            has_password_policy: false,
        }
    }

    /// Set bind password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    /// Enable SSL (LDAPS).
    #[must_use]
    pub fn with_ssl(mut self) -> Self {
        self.use_ssl = true;
        self.port = 636;
        self
    }

    /// Enable STARTTLS.
    #[must_use]
    pub fn with_starttls(mut self) -> Self {
        self.use_starttls = true;
        self
    }

    /// Set user container.
    pub fn with_user_container(mut self, container: impl Into<String>) -> Self {
        self.user_container = Some(container.into());
        self
    }

    /// Set group container.
    pub fn with_group_container(mut self, container: impl Into<String>) -> Self {
        self.group_container = Some(container.into());
        self
    }

    /// Set the member association mode.
    #[must_use]
    pub fn with_member_association(mut self, association: MemberAssociation) -> Self {
        self.member_association = association;
        self
    }

    /// Get the full user container DN.
    #[must_use]
    pub fn user_dn(&self) -> String {
        match &self.user_container {
            Some(container) => format!("{},{}", container, self.base_dn),
            None => self.base_dn.clone(),
        }
    }

    /// Get the full group container DN.
    #[must_use]
    pub fn group_dn(&self) -> String {
        match &self.group_container {
            Some(container) => format!("{},{}", container, self.base_dn),
            None => self.base_dn.clone(),
        }
    }

    /// Get the LDAP URL.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.use_ssl { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Check required fields.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.host.is_empty() {
            return Err(DirectoryError::invalid_configuration("host is required"));
        }

        if self.base_dn.is_empty() {
            return Err(DirectoryError::invalid_configuration("base_dn is required"));
        }

        if self.bind_dn.is_empty() {
            return Err(DirectoryError::invalid_configuration("bind_dn is required"));
        }

        if self.use_ssl && self.use_starttls {
            return Err(DirectoryError::invalid_configuration(
                "cannot use both SSL and STARTTLS",
            ));
        }

        for (name, value) in [
            ("user_name_attribute", &self.user_name_attribute),
            ("group_display_name_attribute", &self.group_display_name_attribute),
            ("owner_attribute", &self.owner_attribute),
        ] {
            if value.is_empty() {
                return Err(DirectoryError::invalid_configuration(format!(
                    "{name} must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Copy with the bind password masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.bind_password.is_some() {
            config.bind_password = Some("***REDACTED***".to_string());
        }
        config
    }
}

/// A named LDAP server entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Configuration prefix identifying the endpoint (e.g., "s01").
    pub prefix: String,

    /// Inactive endpoints are ignored.
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(flatten)]
    pub ldap: LdapConfig,
}

impl EndpointConfig {
    pub fn new(prefix: impl Into<String>, ldap: LdapConfig) -> Self {
        Self {
            prefix: prefix.into(),
            active: true,
            ldap,
        }
    }
}

/// Pick the only active endpoint.
///
/// # Errors
/// [`DirectoryError::MultipleEndpoints`] when more than one endpoint is
/// active and [`DirectoryError::NoEndpoint`] when none is.
pub fn select_single_endpoint(endpoints: &[EndpointConfig]) -> DirectoryResult<&EndpointConfig> {
    let mut active = endpoints.iter().filter(|endpoint| endpoint.active);
    match (active.next(), active.next()) {
        (Some(endpoint), None) => Ok(endpoint),
        (None, _) => Err(DirectoryError::NoEndpoint),
        (Some(_), Some(_)) => Err(DirectoryError::MultipleEndpoints {
            count: endpoints.iter().filter(|endpoint| endpoint.active).count(),
        }),
    }
}
