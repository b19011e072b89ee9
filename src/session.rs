use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(default, deserialize_with = "crate::api::de::optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AdminUser {
    /// Super admins and `*` hold everything. Otherwise `<resource>.manage`
    /// covers every permission under that resource.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_super_admin || self.permissions.iter().any(|p| p == "*") {
            return true;
        }
        if self.permissions.iter().any(|p| p == permission) {
            return true;
        }
        match permission.split_once('.') {
            Some((resource, _)) => {
                let manage = format!("{}.manage", resource);
                self.permissions.contains(&manage)
            }
            None => false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<AdminUser>,
}

impl Session {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_permission(permission))
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_super_admin)
    }
}

/// The session file on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session).filter(|s| !s.token.is_empty()))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        tracing::info!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Removes the stored session. Returns false when there was none.
    pub fn logout(&self) -> Result<bool, SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Session removed from {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn user(permissions: &[&str]) -> AdminUser {
        AdminUser {
            email: "ed@example.com".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..AdminUser::default()
        }
    }

    #[test]
    fn exact_permission_is_granted() {
        assert!(user(&["comments.moderate"]).has_permission("comments.moderate"));
        assert!(!user(&["comments.moderate"]).has_permission("comments.delete"));
    }

    #[test]
    fn manage_covers_the_whole_resource() {
        let u = user(&["subscribers.manage"]);

        assert!(u.has_permission("subscribers.export"));
        assert!(!u.has_permission("security.view"));
    }

    #[test]
    fn wildcard_and_super_admin_grant_everything() {
        assert!(user(&["*"]).has_permission("security.edit"));
        let admin = AdminUser { is_super_admin: true, ..user(&[]) };
        assert!(admin.has_permission("anything"));
    }

    #[test]
    fn session_without_user_has_no_permissions() {
        let session = Session { token: "t".to_string(), user: None };
        assert!(!session.has_permission("comments.moderate"));
        assert!(!session.is_super_admin());
    }

    #[test]
    fn missing_session_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.logout().unwrap());
    }

    #[test]
    fn saved_session_round_trips_and_logout_removes_it() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        let session = Session { token: "abc".to_string(), user: Some(user(&["*"])) };

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.logout().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn user_profile_reads_camel_case_fields() {
        let u: AdminUser = serde_json::from_str(
            r#"{"id": 9, "email": "a@b.c", "fullName": "Ari", "isSuperAdmin": true}"#,
        )
        .unwrap();

        assert_eq!(u.id.as_deref(), Some("9"));
        assert_eq!(u.display_name(), "Ari");
        assert!(u.is_super_admin);
    }
}
