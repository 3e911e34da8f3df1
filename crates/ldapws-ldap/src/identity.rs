//! Attribute-based identity mapping.

use std::sync::Arc;

use async_trait::async_trait;
use ldapws_core::directory::{DirectoryOps, SearchScope};
use ldapws_core::error::{result_code, DirectoryResult};
use ldapws_core::identity::IdentityMapper;
use ldapws_core::ids::{GroupId, UserId};
use tracing::{debug, instrument};

use crate::config::LdapConfig;
use crate::escape::and_equals;

/// Resolves names through the configured naming attributes.
///
/// A user's name is the value of `user_name_attribute` on its entry; a
/// group's name is the value of `group_display_name_attribute`.
pub struct LdapIdentityMapper {
    directory: Arc<dyn DirectoryOps>,
    config: Arc<LdapConfig>,
}

impl LdapIdentityMapper {
    pub fn new(directory: Arc<dyn DirectoryOps>, config: Arc<LdapConfig>) -> Self {
        Self { directory, config }
    }

    async fn find_dn(&self, base: &str, filter: String) -> DirectoryResult<Option<String>> {
        let entries = self
            .directory
            .search(base, SearchScope::Subtree, &filter, &["dn"])
            .await?;

        if entries.len() > 1 {
            debug!(filter = %filter, count = entries.len(), "Ambiguous lookup, using first entry");
        }

        Ok(entries.into_iter().next().map(|entry| entry.dn))
    }
}

#[async_trait]
impl IdentityMapper for LdapIdentityMapper {
    #[instrument(skip(self))]
    async fn user_name_by_dn(&self, dn: &str) -> DirectoryResult<Option<UserId>> {
        let attribute = self.config.user_name_attribute.as_str();

        let entries = match self
            .directory
            .search(dn, SearchScope::Base, &self.config.user_filter, &[attribute])
            .await
        {
            Ok(entries) => entries,
            Err(e) if e.result_code() == Some(result_code::NO_SUCH_OBJECT) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(entries
            .first()
            .and_then(|entry| entry.first(attribute))
            .map(UserId::new))
    }

    #[instrument(skip(self))]
    async fn user_dn_by_name(&self, user: &UserId) -> DirectoryResult<Option<String>> {
        let filter = and_equals(
            &self.config.user_filter,
            &self.config.user_name_attribute,
            user.as_str(),
        );
        self.find_dn(&self.config.user_dn(), filter).await
    }

    #[instrument(skip(self))]
    async fn group_dn_by_name(&self, group: &GroupId) -> DirectoryResult<Option<String>> {
        let filter = and_equals(
            &self.config.group_filter,
            &self.config.group_display_name_attribute,
            group.as_str(),
        );
        self.find_dn(&self.config.group_dn(), filter).await
    }
}
