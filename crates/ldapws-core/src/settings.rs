//! Write-support switches
//!
//! Administrator toggles deciding which write operations the plugins offer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Switches controlling the write plugins.
///
/// Serialized with the camelCase keys the admin form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteSettings {
    /// Users may update their directory avatar (`jpegPhoto`).
    #[serde(default = "default_true")]
    pub has_avatar_permission: bool,

    /// Users may change their directory password.
    #[serde(default = "default_true")]
    pub has_password_permission: bool,

    /// Write passwords to Active Directory's `unicodePwd` instead of `userPassword`.
    #[serde(default)]
    pub use_unicode_password: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            has_avatar_permission: true,
            has_password_permission: true,
            use_unicode_password: false,
        }
    }
}

impl WriteSettings {
    /// Read one switch.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::HasAvatarPermission => self.has_avatar_permission,
            SettingKey::HasPasswordPermission => self.has_password_permission,
            SettingKey::UseUnicodePassword => self.use_unicode_password,
        }
    }

    /// Update one switch.
    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::HasAvatarPermission => self.has_avatar_permission = value,
            SettingKey::HasPasswordPermission => self.has_password_permission = value,
            SettingKey::UseUnicodePassword => self.use_unicode_password = value,
        }
    }
}

/// Name of a single switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    HasAvatarPermission,
    HasPasswordPermission,
    UseUnicodePassword,
}

impl SettingKey {
    /// All switches, in display order.
    #[must_use]
    pub fn all() -> &'static [SettingKey] {
        &[
            SettingKey::HasAvatarPermission,
            SettingKey::HasPasswordPermission,
            SettingKey::UseUnicodePassword,
        ]
    }

    /// Canonical (camelCase) name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::HasAvatarPermission => "hasAvatarPermission",
            SettingKey::HasPasswordPermission => "hasPasswordPermission",
            SettingKey::UseUnicodePassword => "useUnicodePassword",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = DirectoryError;

    /// Accepts the camelCase name as well as snake_case and kebab-case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "hasavatarpermission" => Ok(SettingKey::HasAvatarPermission),
            "haspasswordpermission" => Ok(SettingKey::HasPasswordPermission),
            "useunicodepassword" => Ok(SettingKey::UseUnicodePassword),
            _ => Err(DirectoryError::Settings {
                message: format!("unknown setting '{s}'"),
                source: None,
            }),
        }
    }
}
