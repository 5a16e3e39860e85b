//! Staging, commits, and remote synchronization.

use git2::build::CheckoutBuilder;
use git2::{AnnotatedCommit, MergeOptions, Oid};
use std::fs;
use std::path::Path;

use crate::error::{Result, VersionerError};
use crate::models::RecordOutcome;
use crate::versioner::repository::{FileVersioner, fetch_options, push_options};

impl FileVersioner {
    /// Stage a file, creating it empty under the working tree if absent.
    ///
    /// The name must be a path relative to the repository root.
    pub fn add(&self, file: &str) -> Result<()> {
        if file.is_empty() {
            return Err(VersionerError::EmptyArgument("file name"));
        }

        let on_disk = self.local_path().join(file);
        if !on_disk.exists() {
            if let Some(parent) = on_disk.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&on_disk)?;
        }

        let mut index = self.repo.index()?;
        index.add_path(Path::new(file))?;
        index.write()?;

        tracing::info!("Staged {}", file);
        Ok(())
    }

    /// Remove a file from the index, and from the working tree too unless
    /// `only_index` is set.
    pub fn remove(&self, file: &str, only_index: bool) -> Result<()> {
        if file.is_empty() {
            return Err(VersionerError::EmptyArgument("file name"));
        }

        let mut index = self.repo.index()?;
        index.remove_path(Path::new(file))?;
        index.write()?;

        if !only_index {
            let on_disk = self.local_path().join(file);
            if on_disk.exists() {
                fs::remove_file(&on_disk)?;
            }
        }

        tracing::info!("Removed {} (index only: {})", file, only_index);
        Ok(())
    }

    /// Commit staged changes under the configured author identity.
    ///
    /// Works on an unborn HEAD (first commit). A staged tree identical to
    /// the parent's is rejected with `NothingToCommit` so empty commits
    /// never grow history.
    pub fn commit(&self, message: &str) -> Result<Oid> {
        if message.is_empty() {
            return Err(VersionerError::EmptyArgument("commit message"));
        }

        let signature = self.signature()?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };

        match &parent {
            Some(parent) if parent.tree_id() == tree_id => {
                return Err(VersionerError::NothingToCommit);
            }
            None if tree.is_empty() => {
                return Err(VersionerError::NothingToCommit);
            }
            _ => {}
        }

        let parents: Vec<&git2::Commit> = parent.iter().collect();
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        tracing::info!("Committed {} with message: {}", oid, message);
        Ok(oid)
    }

    /// Push the current branch to origin with the stored credentials.
    pub fn push(&self) -> Result<()> {
        let remote_config = self.require_remote("push")?;

        let head = self.repo.head().map_err(|_| VersionerError::NoHistory)?;
        let branch_ref = head
            .name()
            .ok_or(VersionerError::NoHistory)?
            .to_string();
        let refspec = format!("{branch_ref}:{branch_ref}");

        let mut remote = self.repo.find_remote("origin")?;
        remote
            .push(&[&refspec], Some(&mut push_options(remote_config)))
            .map_err(|e| VersionerError::Transport {
                operation: "push",
                reason: e.message().to_string(),
            })?;

        tracing::info!("Pushed {} to origin", branch_ref);
        Ok(())
    }

    /// Commit, then push. A failed commit aborts; the push never runs on
    /// unrecorded state.
    pub fn commit_and_push(&self, message: &str) -> Result<Oid> {
        let oid = self.commit(message)?;
        self.push()?;
        Ok(oid)
    }

    /// Fetch from origin and merge conservatively: up-to-date is a no-op,
    /// a fast-forward is applied, a clean non-ff merge is committed, and
    /// conflicts abort with `MergeConflicts`.
    pub fn pull(&self) -> Result<()> {
        let remote_config = self.require_remote("pull")?;

        let mut remote = self.repo.find_remote("origin")?;
        remote
            .fetch(
                &["refs/heads/*:refs/remotes/origin/*"],
                Some(&mut fetch_options(remote_config)),
                None,
            )
            .map_err(|e| VersionerError::Transport {
                operation: "pull",
                reason: e.message().to_string(),
            })?;

        let fetch_head = self.repo.find_reference("FETCH_HEAD")?;
        let fetched = self.repo.reference_to_annotated_commit(&fetch_head)?;

        let (analysis, _preference) = self.repo.merge_analysis(&[&fetched])?;

        if analysis.is_up_to_date() {
            tracing::info!("Already up to date");
            return Ok(());
        }

        if analysis.is_unborn() || analysis.is_fast_forward() {
            return self.fast_forward(&fetched);
        }

        self.merge_fetched(&fetched)
    }

    /// Point the current branch at the fetched commit and refresh the
    /// working tree. Also handles the unborn-HEAD case after a fetch into a
    /// fresh repository.
    fn fast_forward(&self, fetched: &AnnotatedCommit<'_>) -> Result<()> {
        let head_ref_name = match self.repo.head() {
            Ok(head) => head.name().ok_or(VersionerError::NoHistory)?.to_string(),
            Err(_) => {
                // Unborn HEAD: resolve the symbolic target (e.g. refs/heads/main).
                let head = self.repo.find_reference("HEAD")?;
                head.symbolic_target()
                    .ok_or(VersionerError::NoHistory)?
                    .to_string()
            }
        };

        self.repo.reference(
            &head_ref_name,
            fetched.id(),
            true,
            &format!("pull: fast-forward to {}", fetched.id()),
        )?;
        self.repo.set_head(&head_ref_name)?;
        self.repo
            .checkout_head(Some(CheckoutBuilder::new().force()))?;

        tracing::info!("Fast-forwarded to {}", fetched.id());
        Ok(())
    }

    /// Non-fast-forward merge of the fetched commit into HEAD. Conflicts
    /// are surfaced, never auto-resolved.
    fn merge_fetched(&self, fetched: &AnnotatedCommit<'_>) -> Result<()> {
        let mut merge_opts = MergeOptions::new();
        let mut checkout_opts = CheckoutBuilder::new();
        checkout_opts.safe();

        self.repo
            .merge(&[fetched], Some(&mut merge_opts), Some(&mut checkout_opts))?;

        let mut index = self.repo.index()?;
        if index.has_conflicts() {
            let mut conflict_files = Vec::new();
            for conflict in index.conflicts()?.flatten() {
                if let Some(entry) = conflict.our.or(conflict.their).or(conflict.ancestor) {
                    conflict_files.push(String::from_utf8_lossy(&entry.path).to_string());
                }
            }
            self.repo.cleanup_state()?;
            tracing::warn!("Pull produced conflicts: {:?}", conflict_files);
            return Err(VersionerError::MergeConflicts(conflict_files));
        }

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let head_commit = self.repo.head()?.peel_to_commit()?;
        let fetched_commit = self.repo.find_commit(fetched.id())?;
        let signature = self.signature()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &format!("Merge {} from origin", fetched.id()),
            &tree,
            &[&head_commit, &fetched_commit],
        )?;
        self.repo.cleanup_state()?;

        tracing::info!("Merged {} from origin", fetched.id());
        Ok(())
    }

    /// Record a full version of one file: stage it, commit, and push when
    /// auto-push is enabled. The outcome reports what actually happened;
    /// the first failing step propagates.
    pub fn record_version(&self, file: &str, message: &str) -> Result<RecordOutcome> {
        self.add(file)?;

        let push = self.config.auto_push && self.config.remote().is_some();
        let oid = if push {
            self.commit_and_push(message)?
        } else {
            self.commit(message)?
        };

        Ok(RecordOutcome {
            commit_id: oid.to_string(),
            pushed: push,
        })
    }
}
