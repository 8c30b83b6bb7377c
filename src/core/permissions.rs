//! Who may reorder a product

use crate::core::config::{Config, PROJECT_CONFIG_FILE};
use crate::core::error::{ReorderError, Result};

/// Logon name of the current session, lower case
pub fn current_logon() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .map(|logon| logon.to_lowercase())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Permission checks against the configured users and editors
#[derive(Debug)]
pub struct Permissions<'c> {
    config: &'c Config,
    logon: String,
}

impl<'c> Permissions<'c> {
    pub fn new(config: &'c Config, logon: impl Into<String>) -> Self {
        Self {
            config,
            logon: logon.into(),
        }
    }

    /// The logon must be a known user unless all users are allowed
    pub fn check_user_permissions(&self) -> Result<()> {
        if !self.config.restrictions.allow_all_users && !self.config.user_exists(&self.logon) {
            return Err(ReorderError::PermissionDenied {
                reason: format!(
                    "Your logon name ({}) doesn't exist in the user configuration.",
                    self.logon
                ),
            });
        }
        Ok(())
    }

    /// If editors are configured the logon must be one of them, unless all
    /// editors are allowed
    pub fn check_editor_permissions(&self) -> Result<()> {
        let editors = &self.config.editors;
        if !editors.is_empty()
            && !editors.iter().any(|e| e.eq_ignore_ascii_case(&self.logon))
            && !self.config.restrictions.allow_all_editors
        {
            return Err(ReorderError::PermissionDenied {
                reason: format!(
                    "Your logon name ({}) isn't listed as an editor of this project.",
                    self.logon
                ),
            });
        }
        Ok(())
    }

    /// The project must be active, and a project config must exist unless
    /// runs outside a workspace are allowed
    pub fn check_workspace_permissions(&self) -> Result<()> {
        if self.config.workspace.is_none() && !self.config.restrictions.allow_outside_workspace {
            return Err(ReorderError::PermissionDenied {
                reason: format!(
                    "No workspace configuration ({}) found for this document.",
                    PROJECT_CONFIG_FILE
                ),
            });
        }
        if !self.config.active {
            return Err(ReorderError::PermissionDenied {
                reason: "This workspace is disabled. You cannot make changes in this document.".to_string(),
            });
        }
        Ok(())
    }

    pub fn check_all(&self) -> Result<()> {
        self.check_user_permissions()?;
        self.check_editor_permissions()?;
        self.check_workspace_permissions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restricted() -> Config {
        Config::from_yaml(
            "restrictions:\n  allow_all_users: false\n  allow_all_editors: false\nusers:\n  - logon: alice\neditors: [alice, bob]\n",
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_allow_everyone() {
        let config = Config::default();
        assert!(Permissions::new(&config, "anyone").check_all().is_ok());
    }

    #[test]
    fn test_unknown_user_denied() {
        let config = restricted();
        let err = Permissions::new(&config, "mallory").check_user_permissions().unwrap_err();
        assert!(matches!(err, ReorderError::PermissionDenied { .. }));
        assert!(err.to_string().contains("mallory"));
    }

    #[test]
    fn test_known_user_allowed() {
        let config = restricted();
        assert!(Permissions::new(&config, "alice").check_all().is_ok());
    }

    #[test]
    fn test_editor_check() {
        let config = restricted();
        // bob is an editor but not a known user
        let permissions = Permissions::new(&config, "bob");
        assert!(permissions.check_editor_permissions().is_ok());
        assert!(permissions.check_user_permissions().is_err());

        let mut config = restricted();
        config.restrictions.allow_all_users = true;
        assert!(Permissions::new(&config, "carol").check_editor_permissions().is_err());
    }

    #[test]
    fn test_disabled_workspace_denied() {
        let mut config = Config::default();
        config.active = false;
        let err = Permissions::new(&config, "alice").check_all().unwrap_err();
        assert!(matches!(err, ReorderError::PermissionDenied { .. }));
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_outside_workspace() {
        let mut config = Config::default();
        assert!(Permissions::new(&config, "alice").check_workspace_permissions().is_ok());

        config.restrictions.allow_outside_workspace = false;
        let err = Permissions::new(&config, "alice").check_workspace_permissions().unwrap_err();
        assert!(err.to_string().contains(PROJECT_CONFIG_FILE));

        config.workspace = Some(std::path::PathBuf::from("/work").join(PROJECT_CONFIG_FILE));
        assert!(Permissions::new(&config, "alice").check_workspace_permissions().is_ok());
    }

    #[test]
    fn test_current_logon_is_lowercase() {
        let logon = current_logon();
        assert_eq!(logon, logon.to_lowercase());
    }
}
