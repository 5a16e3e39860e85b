//! Repository acquisition and the `FileVersioner` handle.
//!
//! A `FileVersioner` owns exactly one `git2::Repository` rooted at the
//! configured local path. The handle is acquired once in `open` and released
//! on drop. Concurrent instances pointed at the same local path are not
//! supported.

use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, PushOptions, RemoteCallbacks, Repository, Signature};
use std::path::Path;

use crate::config::{Acquisition, RemoteConfig, VersionerConfig};
use crate::error::{Result, VersionerError};

pub struct FileVersioner {
    pub(crate) repo: Repository,
    pub(crate) config: VersionerConfig,
}

impl FileVersioner {
    /// Acquire the repository described by `config`.
    ///
    /// Probes the local path first; a failed probe means "no repository
    /// here", never an error. A missing repository is then created or cloned
    /// depending on the acquisition mode. In clone mode an already-present
    /// repository gets its `origin` URL configured (if absent) and is pulled
    /// before the handle is returned.
    pub fn open(config: VersionerConfig) -> Result<Self> {
        config.validate()?;

        let existing = match Repository::open(&config.local_path) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!(
                    "No valid repository at {}: {}",
                    config.local_path.display(),
                    e.message()
                );
                None
            }
        };

        let acquisition = config.acquisition.clone();
        let repo = match (existing, &acquisition) {
            (Some(repo), Acquisition::CreateLocal) => repo,
            (Some(repo), Acquisition::CloneFromRemote(remote)) => {
                ensure_origin(&repo, &remote.url)?;
                let versioner = Self { repo, config };
                versioner.pull()?;
                return Ok(versioner);
            }
            (None, Acquisition::CreateLocal) => create_repo(&config.local_path)?,
            (None, Acquisition::CloneFromRemote(remote)) => {
                // Clone configures origin and checks out the default branch,
                // so no further setup or pull is needed.
                clone_repo(remote, &config.local_path)?
            }
        };

        Ok(Self { repo, config })
    }

    /// Root of the working tree.
    pub fn local_path(&self) -> &Path {
        &self.config.local_path
    }

    pub(crate) fn signature(&self) -> Result<Signature<'_>> {
        Ok(Signature::now(
            &self.config.author_name,
            &self.config.author_email,
        )?)
    }

    /// Remote settings, or a typed error when the versioner was opened
    /// without a remote-capable mode.
    pub(crate) fn require_remote(&self, operation: &'static str) -> Result<&RemoteConfig> {
        self.config.remote().ok_or(VersionerError::Transport {
            operation,
            reason: "no remote configured (opened in create-local mode)".to_string(),
        })
    }
}

fn create_repo(path: &Path) -> Result<Repository> {
    let repo = Repository::init(path).map_err(|e| VersionerError::RepositoryUnavailable {
        path: path.to_path_buf(),
        reason: e.message().to_string(),
    })?;
    tracing::info!("Created empty repository at {}", path.display());
    Ok(repo)
}

fn clone_repo(remote: &RemoteConfig, path: &Path) -> Result<Repository> {
    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options(remote));

    let repo = builder
        .clone(&remote.url, path)
        .map_err(|e| VersionerError::Transport {
            operation: "clone",
            reason: e.message().to_string(),
        })?;
    tracing::info!("Cloned {} into {}", remote.url, path.display());
    Ok(repo)
}

/// Set the `origin` URL if no origin remote exists yet. An existing origin
/// is left untouched.
fn ensure_origin(repo: &Repository, url: &str) -> Result<()> {
    if repo.find_remote("origin").is_err() {
        repo.remote("origin", url)?;
        tracing::info!("Configured origin as {}", url);
    }
    Ok(())
}

/// Username/password credential callbacks for clone/fetch/push.
fn remote_callbacks(remote: &RemoteConfig) -> RemoteCallbacks<'static> {
    let username = remote.username.clone();
    let password = remote.password.clone();

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, _username_from_url, _allowed| {
        Cred::userpass_plaintext(&username, &password)
    });
    callbacks
}

pub(crate) fn fetch_options(remote: &RemoteConfig) -> FetchOptions<'static> {
    let mut options = FetchOptions::new();
    options.remote_callbacks(remote_callbacks(remote));
    options
}

pub(crate) fn push_options(remote: &RemoteConfig) -> PushOptions<'static> {
    let mut options = PushOptions::new();
    options.remote_callbacks(remote_callbacks(remote));
    options
}
