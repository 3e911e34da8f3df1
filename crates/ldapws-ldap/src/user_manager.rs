//! User write plugin backed by LDAP.

use std::sync::Arc;

use async_trait::async_trait;
use ldapws_core::actions::UserActions;
use ldapws_core::directory::{DirectoryOps, Modification};
use ldapws_core::error::{result_code, DirectoryError, DirectoryResult};
use ldapws_core::identity::IdentityMapper;
use ldapws_core::ids::UserId;
use ldapws_core::plugin::{DeletionFlag, UserPlugin};
use ldapws_core::settings::WriteSettings;
use ldapws_core::APP_ID;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LdapConfig;
use crate::password::PasswordStrategy;

const AVATAR_ATTRIBUTE: &str = "jpegPhoto";
const SURNAME_ATTRIBUTE: &str = "sn";

/// Writes user attributes back to the directory.
pub struct LdapUserManager {
    directory: Arc<dyn DirectoryOps>,
    identity: Arc<dyn IdentityMapper>,
    config: Arc<LdapConfig>,
    settings: WriteSettings,
    deletion_flag: Option<Arc<dyn DeletionFlag>>,
}

impl LdapUserManager {
    pub fn new(
        directory: Arc<dyn DirectoryOps>,
        identity: Arc<dyn IdentityMapper>,
        config: Arc<LdapConfig>,
        settings: WriteSettings,
    ) -> Self {
        Self {
            directory,
            identity,
            config,
            settings,
            deletion_flag: None,
        }
    }

    /// Flag local records of deleted users through `flag`.
    #[must_use]
    pub fn with_deletion_flag(mut self, flag: Arc<dyn DeletionFlag>) -> Self {
        self.deletion_flag = Some(flag);
        self
    }

    /// DN of `user`, or `None` when it cannot be resolved for any reason.
    async fn lookup_dn(&self, user: &UserId) -> Option<String> {
        match self.identity.user_dn_by_name(user).await {
            Ok(dn) => dn,
            Err(e) => {
                debug!(app = APP_ID, uid = %user, error = %e, "Could not resolve user DN");
                None
            }
        }
    }

    async fn write_password(&self, dn: &str, password: &str) -> DirectoryResult<()> {
        let exop_supported = self.directory.supports_password_modify().await?;
        let strategy = PasswordStrategy::choose(exop_supported, self.settings.use_unicode_password);

        debug!(app = APP_ID, dn = %dn, strategy = ?strategy, "Setting password");

        match strategy.modification(password) {
            None => self.directory.password_modify(dn, password).await,
            Some(modification) => self.directory.modify(dn, vec![modification]).await,
        }
    }
}

#[async_trait]
impl UserPlugin for LdapUserManager {
    fn respond_to_actions(&self) -> UserActions {
        let mut actions = UserActions::SET_DISPLAYNAME | UserActions::PROVIDE_AVATAR;
        if self.can_set_password() && !self.config.has_password_policy {
            actions |= UserActions::SET_PASSWORD;
        }
        actions
    }

    #[instrument(skip(self))]
    async fn set_display_name(&self, user: &UserId, display_name: &str) -> DirectoryResult<String> {
        let dn = self.identity.user_dn_by_name(user).await?.ok_or_else(|| {
            DirectoryError::hint(
                "Corresponding LDAP User not found",
                "Could not find related LDAP entry",
            )
        })?;

        let mut modifications = vec![Modification::replace(
            self.config.display_name_attribute.as_str(),
            display_name,
        )];
        if !self
            .config
            .display_name_attribute
            .eq_ignore_ascii_case(SURNAME_ATTRIBUTE)
        {
            modifications.push(Modification::replace(SURNAME_ATTRIBUTE, display_name));
        }

        match self.directory.modify(&dn, modifications).await {
            Ok(()) => {
                info!(app = APP_ID, uid = %user, "Display name updated");
                Ok(display_name.to_string())
            }
            Err(DirectoryError::Rejected { rc, text, .. })
                if rc == result_code::CONSTRAINT_VIOLATION =>
            {
                Err(DirectoryError::hint(text, "DisplayName change rejected"))
            }
            Err(DirectoryError::Rejected { text, .. }) => {
                Err(DirectoryError::hint(text, "Failed to set display name"))
            }
            Err(e) => Err(e),
        }
    }

    fn can_change_avatar(&self, _user: &UserId) -> bool {
        self.settings.has_avatar_permission
    }

    #[instrument(skip(self, image), fields(has_image = image.is_some()))]
    async fn change_avatar(&self, user: &UserId, image: Option<&[u8]>) -> DirectoryResult<()> {
        let Some(dn) = self.lookup_dn(user).await else {
            return Ok(());
        };

        let modification = match image {
            Some(data) => Modification::replace(AVATAR_ATTRIBUTE, data),
            None => Modification::delete_all(AVATAR_ATTRIBUTE),
        };

        self.directory.modify(&dn, vec![modification]).await
    }

    #[instrument(skip(self))]
    async fn change_email(&self, user: &UserId, email: &str) -> DirectoryResult<()> {
        let Some(dn) = self.lookup_dn(user).await else {
            return Ok(());
        };

        self.directory
            .modify(
                &dn,
                vec![Modification::replace(
                    self.config.email_attribute.as_str(),
                    email,
                )],
            )
            .await
    }

    async fn create_user(&self, user: &UserId, _password: &str) -> DirectoryResult<bool> {
        info!(app = APP_ID, uid = %user, "LDAP user creation is disabled");
        Ok(false)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user: &UserId) -> DirectoryResult<bool> {
        let dn = self.identity.require_user_dn(user).await?;

        match self.directory.delete(&dn).await {
            Ok(()) => {
                info!(app = APP_ID, uid = %user, dn = %dn, "Deleted LDAP user");
                match &self.deletion_flag {
                    Some(flag) => {
                        if let Err(e) = flag.flag_record(user).await {
                            warn!(app = APP_ID, uid = %user, error = %e, "Could not flag deleted user");
                        }
                    }
                    None => {
                        warn!(app = APP_ID, uid = %user, "Could not run delete process");
                    }
                }
                Ok(true)
            }
            Err(e) if e.result_code() == Some(result_code::NO_SUCH_OBJECT) => {
                info!(
                    app = APP_ID,
                    uid = %user,
                    "LDAP user object not found, assuming it is already deleted"
                );
                Ok(true)
            }
            Err(e @ DirectoryError::Rejected { .. }) => {
                info!(app = APP_ID, uid = %user, error = %e, "Unable to delete LDAP user");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn can_set_password(&self) -> bool {
        self.settings.has_password_permission
    }

    #[instrument(skip(self, password))]
    async fn set_password(&self, user: &UserId, password: &str) -> DirectoryResult<bool> {
        let dn = match self.identity.require_user_dn(user).await {
            Ok(dn) => dn,
            Err(e) => {
                error!(app = APP_ID, uid = %user, error = %e, "Failed to set password");
                return Ok(false);
            }
        };

        match self.write_password(&dn, password).await {
            Ok(()) => {
                info!(app = APP_ID, uid = %user, "Password updated");
                Ok(true)
            }
            Err(e) => {
                error!(app = APP_ID, dn = %dn, error = %e, "Failed to set password");
                Ok(false)
            }
        }
    }
}

impl std::fmt::Debug for LdapUserManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapUserManager")
            .field("endpoint", &self.directory.endpoint())
            .field("settings", &self.settings)
            .field("deletion_flag", &self.deletion_flag.is_some())
            .finish()
    }
}
