//! Plugin activation
//!
//! The host reports which backends are ready; plugins are registered only
//! once their backend exists and the directory app is enabled.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::plugin::{GroupPlugin, UserPlugin};
use crate::APP_ID;

/// What the host reports at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostReadiness {
    /// The core read-only directory app is installed and enabled.
    pub directory_app_enabled: bool,
    /// The directory user backend has been registered.
    pub user_backend_ready: bool,
    /// The directory group backend has been registered.
    pub group_backend_ready: bool,
}

impl HostReadiness {
    /// Everything ready.
    pub fn ready() -> Self {
        Self {
            directory_app_enabled: true,
            user_backend_ready: true,
            group_backend_ready: true,
        }
    }
}

/// A host that accepts write plugins.
pub trait PluginHost {
    fn register_user_plugin(&mut self, plugin: Arc<dyn UserPlugin>);

    fn register_group_plugin(&mut self, plugin: Arc<dyn GroupPlugin>);

    /// Called after the user plugin is registered so the directory user
    /// backend is consulted first.
    fn promote_directory_backends(&mut self) {}
}

/// What [`activate`] registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivationOutcome {
    pub user_plugin: bool,
    pub group_plugin: bool,
}

impl ActivationOutcome {
    /// Whether nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.user_plugin && !self.group_plugin
    }
}

/// Register the write plugins with `host` according to `readiness`.
pub fn activate<H: PluginHost + ?Sized>(
    host: &mut H,
    readiness: HostReadiness,
    user_plugin: Arc<dyn UserPlugin>,
    group_plugin: Arc<dyn GroupPlugin>,
) -> ActivationOutcome {
    let mut outcome = ActivationOutcome::default();

    if !readiness.directory_app_enabled {
        debug!(app = APP_ID, "Directory app disabled, not registering plugins");
        return outcome;
    }

    if readiness.user_backend_ready {
        host.register_user_plugin(user_plugin);
        host.promote_directory_backends();
        outcome.user_plugin = true;
        info!(app = APP_ID, "Registered user write plugin");
    }

    if readiness.group_backend_ready {
        host.register_group_plugin(group_plugin);
        outcome.group_plugin = true;
        info!(app = APP_ID, "Registered group write plugin");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{GroupActions, UserActions};
    use crate::error::DirectoryResult;
    use crate::ids::{GroupId, UserId};
    use async_trait::async_trait;

    struct NoopUser;

    #[async_trait]
    impl UserPlugin for NoopUser {
        fn respond_to_actions(&self) -> UserActions {
            UserActions::NONE
        }
        async fn set_display_name(&self, _: &UserId, name: &str) -> DirectoryResult<String> {
            Ok(name.to_string())
        }
        fn can_change_avatar(&self, _: &UserId) -> bool {
            false
        }
        async fn change_avatar(&self, _: &UserId, _: Option<&[u8]>) -> DirectoryResult<()> {
            Ok(())
        }
        async fn change_email(&self, _: &UserId, _: &str) -> DirectoryResult<()> {
            Ok(())
        }
        async fn create_user(&self, _: &UserId, _: &str) -> DirectoryResult<bool> {
            Ok(false)
        }
        async fn delete_user(&self, _: &UserId) -> DirectoryResult<bool> {
            Ok(false)
        }
        fn can_set_password(&self) -> bool {
            false
        }
        async fn set_password(&self, _: &UserId, _: &str) -> DirectoryResult<bool> {
            Ok(false)
        }
    }

    struct NoopGroup;

    #[async_trait]
    impl GroupPlugin for NoopGroup {
        fn respond_to_actions(&self) -> GroupActions {
            GroupActions::NONE
        }
        async fn create_group(&self, _: &GroupId) -> DirectoryResult<Option<GroupId>> {
            Ok(None)
        }
        async fn delete_group(&self, _: &GroupId) -> DirectoryResult<bool> {
            Ok(false)
        }
        async fn add_to_group(&self, _: &UserId, _: &GroupId) -> DirectoryResult<bool> {
            Ok(false)
        }
        async fn remove_from_group(&self, _: &UserId, _: &GroupId) -> DirectoryResult<bool> {
            Ok(false)
        }
        async fn is_directory_group(&self, _: &GroupId) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        users: usize,
        groups: usize,
        promotions: usize,
    }

    impl PluginHost for RecordingHost {
        fn register_user_plugin(&mut self, _: Arc<dyn UserPlugin>) {
            self.users += 1;
        }
        fn register_group_plugin(&mut self, _: Arc<dyn GroupPlugin>) {
            self.groups += 1;
        }
        fn promote_directory_backends(&mut self) {
            self.promotions += 1;
        }
    }

    fn run(readiness: HostReadiness) -> (RecordingHost, ActivationOutcome) {
        let mut host = RecordingHost::default();
        let outcome = activate(&mut host, readiness, Arc::new(NoopUser), Arc::new(NoopGroup));
        (host, outcome)
    }

    #[test]
    fn test_registers_both_when_ready() {
        let (host, outcome) = run(HostReadiness::ready());
        assert_eq!(host.users, 1);
        assert_eq!(host.groups, 1);
        assert_eq!(host.promotions, 1);
        assert!(outcome.user_plugin && outcome.group_plugin);
    }

    #[test]
    fn test_disabled_directory_app_registers_nothing() {
        let (host, outcome) = run(HostReadiness {
            directory_app_enabled: false,
            ..HostReadiness::ready()
        });
        assert_eq!(host.users + host.groups, 0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_waits_for_each_backend() {
        let (host, outcome) = run(HostReadiness {
            directory_app_enabled: true,
            user_backend_ready: false,
            group_backend_ready: true,
        });
        assert_eq!(host.users, 0);
        assert_eq!(host.promotions, 0);
        assert_eq!(host.groups, 1);
        assert!(!outcome.user_plugin);
        assert!(outcome.group_plugin);
    }
}
