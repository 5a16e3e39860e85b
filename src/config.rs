//! Versioner configuration.
//!
//! The repository-acquisition mode and the auto-push behavior are
//! independent settings: cloning from a remote does not by itself imply
//! pushing after every recorded version.

use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, VersionerError};

/// How the repository at `local_path` is obtained when none exists yet.
#[derive(Debug, Clone)]
pub enum Acquisition {
    /// Create a brand-new empty repository (`git init` equivalent).
    CreateLocal,
    /// Clone from a remote; also enables pull-on-open when the repository
    /// already exists locally.
    CloneFromRemote(RemoteConfig),
}

/// Remote endpoint plus username/password credentials.
#[derive(Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct VersionerConfig {
    /// Root of the working tree the repository lives under.
    pub local_path: PathBuf,
    pub acquisition: Acquisition,
    /// Whether `record_version` pushes after committing.
    pub auto_push: bool,
    pub author_name: String,
    pub author_email: String,
}

impl VersionerConfig {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            acquisition: Acquisition::CreateLocal,
            auto_push: false,
            author_name: "file-versioner".to_string(),
            author_email: "file-versioner@localhost".to_string(),
        }
    }

    pub fn clone_from(mut self, remote: RemoteConfig) -> Self {
        self.acquisition = Acquisition::CloneFromRemote(remote);
        self
    }

    pub fn auto_push(mut self, enabled: bool) -> Self {
        self.auto_push = enabled;
        self
    }

    pub fn author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = name.into();
        self.author_email = email.into();
        self
    }

    /// Remote settings, if a remote-capable mode was requested.
    pub fn remote(&self) -> Option<&RemoteConfig> {
        match &self.acquisition {
            Acquisition::CloneFromRemote(remote) => Some(remote),
            Acquisition::CreateLocal => None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.local_path.as_os_str().is_empty() {
            return Err(VersionerError::EmptyArgument("local_path"));
        }
        if let Some(remote) = self.remote() {
            if remote.url.is_empty() {
                return Err(VersionerError::EmptyArgument("remote url"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let remote = RemoteConfig {
            url: "https://example.com/repo.git".to_string(),
            username: "user".to_string(),
            password: "hunter2".to_string(),
        };

        let rendered = format!("{remote:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn clone_mode_requires_url() {
        let config = VersionerConfig::new("/tmp/repo").clone_from(RemoteConfig {
            url: String::new(),
            username: String::new(),
            password: String::new(),
        });

        assert!(matches!(
            config.validate(),
            Err(VersionerError::EmptyArgument("remote url"))
        ));
    }
}
