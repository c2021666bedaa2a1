//! Persisted session state.
//!
//! The console keeps two values between runs: the bearer token and the sidebar collapse
//! preference. They live in a small YAML file owned by [`SessionStore`]. A missing file is an
//! empty session, not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lab_types::NonEmptyText;
use serde::{Deserialize, Serialize};

use crate::{WorklistError, WorklistResult};

/// Values persisted between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: Option<NonEmptyText>,
    pub sidebar_collapsed: bool,
}

impl PersistedSession {
    /// Parse a session from YAML text.
    ///
    /// Unknown keys are rejected. The error names the path of the failing field.
    pub fn parse(yaml_text: &str) -> WorklistResult<Self> {
        if yaml_text.trim().is_empty() {
            return Ok(Self::default());
        }

        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire = serde_path_to_error::deserialize::<_, SessionWire>(deserializer).map_err(
            |err| {
                let path = err.path().to_string();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                WorklistError::SessionParse {
                    path,
                    message: err.into_inner().to_string(),
                }
            },
        )?;

        Ok(Self {
            token: wire.token,
            sidebar_collapsed: wire.sidebar_collapsed,
        })
    }

    pub fn render(&self) -> WorklistResult<String> {
        let wire = SessionWire {
            token: self.token.clone(),
            sidebar_collapsed: self.sidebar_collapsed,
        };
        serde_yaml::to_string(&wire).map_err(WorklistError::SessionRender)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SessionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<NonEmptyText>,
    #[serde(default)]
    sidebar_collapsed: bool,
}

/// File-backed store for [`PersistedSession`].
#[derive(Clone, Debug)]
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

    pub fn load(&self) -> WorklistResult<PersistedSession> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => PersistedSession::parse(&contents),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(err) => Err(WorklistError::SessionRead(err)),
        }
    }

    pub fn save(&self, session: &PersistedSession) -> WorklistResult<()> {
        let yaml = session.render()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(WorklistError::SessionWrite)?;
        }
        fs::write(&self.path, yaml).map_err(WorklistError::SessionWrite)?;
        tracing::debug!("saved session to {}", self.path.display());
        Ok(())
    }

    /// Load, apply `change`, save. Returns the saved session.
    pub fn update(
        &self,
        change: impl FnOnce(&mut PersistedSession),
    ) -> WorklistResult<PersistedSession> {
        let mut session = self.load()?;
        change(&mut session);
        self.save(&session)?;
        Ok(session)
    }

    /// Remove the session file. Removing a missing file is not an error.
    pub fn clear(&self) -> WorklistResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WorklistError::SessionRemove(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_session() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::new(dir.path().join("session.yaml"));
        assert_eq!(store.load().expect("load"), PersistedSession::default());
    }

    #[test]
    fn save_then_load_keeps_token_and_preference() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::new(dir.path().join("nested").join("session.yaml"));

        let session = PersistedSession {
            token: Some(NonEmptyText::new("abc.def.ghi").unwrap()),
            sidebar_collapsed: true,
        };
        store.save(&session).expect("save");
        assert_eq!(store.load().expect("load"), session);
    }

    #[test]
    fn update_preserves_other_fields() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::new(dir.path().join("session.yaml"));
        store
            .update(|s| s.token = Some(NonEmptyText::new("t1").unwrap()))
            .expect("set token");
        let session = store
            .update(|s| s.sidebar_collapsed = true)
            .expect("set collapsed");
        assert_eq!(session.token.map(NonEmptyText::into_string), Some("t1".into()));
        assert!(session.sidebar_collapsed);
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::new(dir.path().join("session.yaml"));
        store.save(&PersistedSession::default()).expect("save");
        store.clear().expect("first clear");
        assert!(!store.path().exists());
        store.clear().expect("second clear");
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let err = PersistedSession::parse("token: abc\ntheme: dark\n").expect_err("should reject");
        match err {
            WorklistError::SessionParse { message, .. } => assert!(message.contains("theme")),
            other => panic!("expected SessionParse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_types_with_path() {
        let err = PersistedSession::parse("sidebar_collapsed: sometimes\n")
            .expect_err("should reject");
        match err {
            WorklistError::SessionParse { path, .. } => assert_eq!(path, "sidebar_collapsed"),
            other => panic!("expected SessionParse error, got {other:?}"),
        }
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(PersistedSession::parse("token: '  '\n").is_err());
    }
}
