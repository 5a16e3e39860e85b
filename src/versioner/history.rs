//! Per-file history walks and revision restore.

use git2::{DiffOptions, ObjectType, Sort};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VersionerError};
use crate::models::VersionRecord;
use crate::versioner::repository::FileVersioner;

impl FileVersioner {
    /// History of the commits that changed `file`, newest first.
    ///
    /// Fails with `NoHistory` when HEAD is unresolved (empty repository).
    pub fn list_versions(&self, file: &str) -> Result<Vec<VersionRecord>> {
        if file.is_empty() {
            return Err(VersionerError::EmptyArgument("file name"));
        }

        if self.repo.head().is_err() {
            return Err(VersionerError::NoHistory);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut versions = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            if self.commit_touches_path(&commit, file)? {
                versions.push(VersionRecord::from_commit(&commit));
            }
        }

        Ok(versions)
    }

    /// Write the content `file` had at `commit_id` to
    /// `<local_path>/<stem>/<commit_id>[.<ext>]` and return that path.
    ///
    /// A commit that exists but has no entry for the file fails with
    /// `RevisionNotFound` and produces no output file.
    pub fn materialize_revision(&self, commit_id: &str, file: &str) -> Result<PathBuf> {
        if commit_id.is_empty() {
            return Err(VersionerError::EmptyArgument("commit id"));
        }
        if file.is_empty() {
            return Err(VersionerError::EmptyArgument("file name"));
        }

        let not_found = || VersionerError::RevisionNotFound {
            commit: commit_id.to_string(),
            path: file.to_string(),
        };

        let commit = self
            .repo
            .revparse_single(commit_id)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|_| not_found())?;
        let tree = commit.tree()?;

        let entry = tree.get_path(Path::new(file)).map_err(|_| {
            tracing::error!("No revision {} of file {}", commit_id, file);
            not_found()
        })?;
        if entry.kind() != Some(ObjectType::Blob) {
            tracing::error!("No revision {} of file {}", commit_id, file);
            return Err(not_found());
        }
        let blob = self.repo.find_blob(entry.id())?;

        let output = self.revision_output_path(&commit.id().to_string(), file);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output, blob.content())?;

        tracing::info!("Restored {} @ {} to {}", file, commit_id, output.display());
        Ok(output)
    }

    /// Restored revisions land in a side directory named after the file
    /// with its extension stripped, one file per commit id.
    fn revision_output_path(&self, commit_id: &str, file: &str) -> PathBuf {
        let file = Path::new(file);
        let dir = file.parent().unwrap_or(Path::new(""));
        let stem = file.file_stem().unwrap_or(file.as_os_str());

        let file_name = match file.extension() {
            Some(ext) => format!("{}.{}", commit_id, ext.to_string_lossy()),
            None => commit_id.to_string(),
        };

        self.local_path().join(dir).join(stem).join(file_name)
    }

    /// Whether the commit's diff against its first parent (or the empty
    /// tree for root commits) touches `path`.
    fn commit_touches_path(&self, commit: &git2::Commit, path: &str) -> Result<bool> {
        let tree = commit.tree()?;

        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.pathspec(path);

        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        Ok(diff.deltas().len() > 0)
    }
}
