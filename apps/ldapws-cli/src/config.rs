//! Configuration file for the `ldapws` binary
//!
//! A single JSON document holding the LDAP endpoints, the write-support
//! switches and the location of the administrator roster:
//!
//! ```json
//! {
//!   "endpoints": [{ "prefix": "s01", "host": "ldap.example.com", ... }],
//!   "settings": { "hasAvatarPermission": true },
//!   "roster": "roster.json"
//! }
//! ```

use std::path::{Path, PathBuf};

use ldapws_core::roster::FileRoster;
use ldapws_core::settings::WriteSettings;
use ldapws_ldap::EndpointConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Environment variable overriding every endpoint's bind password.
pub const BIND_PASSWORD_ENV: &str = "LDAPWS_BIND_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    #[serde(default)]
    pub settings: WriteSettings,

    /// Roster file; relative paths are resolved against the config file.
    #[serde(default = "default_roster")]
    pub roster: PathBuf,
}

fn default_roster() -> PathBuf {
    PathBuf::from("roster.json")
}

impl AppConfig {
    /// Load the file as written, without environment overrides.
    pub fn load_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("invalid {}: {}", path.display(), e)))?;

        if config.roster.is_relative() {
            if let Some(parent) = path.parent() {
                config.roster = parent.join(&config.roster);
            }
        }

        debug!(
            path = %path.display(),
            endpoints = config.endpoints.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load the file and apply environment overrides.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = Self::load_file(path)?;
        config.apply_bind_password(std::env::var(BIND_PASSWORD_ENV).ok());
        Ok(config)
    }

    /// Replace every endpoint's bind password when `password` is set.
    pub fn apply_bind_password(&mut self, password: Option<String>) {
        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return;
        };
        for endpoint in &mut self.endpoints {
            endpoint.ldap.bind_password = Some(password.clone());
        }
    }

    /// Write the settings back, leaving the rest of the file untouched.
    pub fn save_settings(path: &Path, settings: WriteSettings) -> CliResult<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut document: serde_json::Value = serde_json::from_str(&content)?;
        let Some(object) = document.as_object_mut() else {
            return Err(CliError::Config(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        };
        object.insert("settings".to_string(), serde_json::to_value(settings)?);

        std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    pub fn roster(&self) -> FileRoster {
        FileRoster::new(&self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "endpoints": [{
            "prefix": "s01",
            "host": "ldap.example.com",
            "base_dn": "dc=example,dc=com",
            "bind_dn": "cn=admin,dc=example,dc=com",
            "bind_password": "from-file"
        }],
        "settings": { "useUnicodePassword": true }
    }"#;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("ldapws.json");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());

        let config = AppConfig::load_file(&path).unwrap();

        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].ldap.port, 389);
        assert!(config.settings.use_unicode_password);
        assert!(config.settings.has_avatar_permission);
        assert_eq!(config.roster, dir.path().join("roster.json"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bind_password_override() {
        let mut config: AppConfig = serde_json::from_str(SAMPLE).unwrap();

        config.apply_bind_password(Some(String::new()));
        assert_eq!(
            config.endpoints[0].ldap.bind_password.as_deref(),
            Some("from-file")
        );

        config.apply_bind_password(Some("from-env".to_string()));
        assert_eq!(
            config.endpoints[0].ldap.bind_password.as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_save_settings_keeps_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());

        let settings = WriteSettings {
            has_avatar_permission: false,
            ..WriteSettings::default()
        };
        AppConfig::save_settings(&path, settings).unwrap();

        let config = AppConfig::load_file(&path).unwrap();
        assert!(!config.settings.has_avatar_permission);
        assert!(!config.settings.use_unicode_password);
        assert_eq!(
            config.endpoints[0].ldap.bind_password.as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn test_absolute_roster_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("elsewhere").join("roster.json");
        let path = dir.path().join("ldapws.json");
        std::fs::write(
            &path,
            serde_json::json!({ "roster": roster }).to_string(),
        )
        .unwrap();

        let config = AppConfig::load_file(&path).unwrap();
        assert_eq!(config.roster, roster);
        assert!(config.endpoints.is_empty());
    }
}
