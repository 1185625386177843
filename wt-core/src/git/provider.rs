use super::repo::Worktree;
use crate::error::WtError;
use std::path::{Path, PathBuf};

/// Typed access to the version-control binary. Each call spawns a fresh process
/// rooted at the path it is given; implementations hold no state between calls.
pub trait GitProvider: Send + Sync {
    /// Top-level directory of the repository enclosing `cwd`
    fn repo_root(&self, cwd: &Path) -> Result<PathBuf, WtError>;
    fn list_branches(&self, repo_path: &Path) -> Result<Vec<String>, WtError>;
    fn branch_exists(&self, repo_path: &Path, name: &str) -> Result<bool, WtError>;
    fn list_worktrees(&self, repo_path: &Path) -> Result<Vec<Worktree>, WtError>;
    fn worktree_clean(&self, worktree_path: &Path) -> Result<bool, WtError>;
    /// Committer timestamp of `rev`, or 0 when it cannot be determined
    fn commit_time(&self, repo_path: &Path, rev: &str) -> i64;
    /// Committer timestamp of HEAD in `worktree_path`, or 0 when it cannot be determined
    fn commit_time_at(&self, worktree_path: &Path) -> i64;
    /// Check out an existing branch into a new worktree
    fn add_worktree(
        &self,
        repo_path: &Path,
        worktree_path: &Path,
        branch: &str,
    ) -> Result<(), WtError>;
    /// Create `new_branch` (from `base`, or HEAD when `None`) checked out in a new worktree
    fn create_branch_and_worktree(
        &self,
        repo_path: &Path,
        worktree_path: &Path,
        new_branch: &str,
        base: Option<&str>,
    ) -> Result<(), WtError>;
    fn remove_worktree(&self, repo_path: &Path, worktree_path: &Path) -> Result<(), WtError>;
}
