//! Worktree lifecycle: where new worktrees go and how they are populated.

use crate::{
    constants::{CONFIG_ITEMS, CONFIG_RECURSIVE_BASENAMES, LIB_ITEMS, WORKTREES_DIR_SUFFIX},
    copy::Filesystem,
    error::WtError,
    git::GitProvider,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Repository paths resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub repo_root: PathBuf,
    /// First worktree git enumerates; copies are always sourced from here
    pub main_worktree: PathBuf,
}

impl RepoContext {
    pub fn resolve(git: &dyn GitProvider, cwd: &Path) -> Result<Self, WtError> {
        let repo_root = git.repo_root(cwd)?;
        let main_worktree = git
            .list_worktrees(&repo_root)?
            .into_iter()
            .next()
            .map_or_else(|| repo_root.clone(), |wt| wt.path);
        Ok(Self {
            repo_root,
            main_worktree,
        })
    }
}

/// Parameters for [`add_worktree`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct NewWorktree {
    pub branch: String,
    /// Create `branch` from this ref instead of checking out / branching from HEAD
    pub base: Option<String>,
    pub copy_config: bool,
    pub copy_libs: bool,
}

/// `<parent>/<name>-worktrees/<branch>` for a main worktree at `<parent>/<name>`.
/// Slashes in `branch` become nested directories.
pub fn destination_for(main_worktree: &Path, branch: &str) -> Result<PathBuf, WtError> {
    let (Some(parent), Some(name)) = (main_worktree.parent(), main_worktree.file_name()) else {
        return Err(WtError::NoParentDir(main_worktree.to_path_buf()));
    };
    let root = parent.join(format!("{}{WORKTREES_DIR_SUFFIX}", name.to_string_lossy()));
    Ok(branch.split('/').fold(root, |path, part| path.join(part)))
}

/// Create a worktree for `request.branch` and populate it from the main worktree.
///
/// A copy failure after git has created the worktree leaves the worktree on disk
/// for the user to inspect.
pub fn add_worktree(
    git: &dyn GitProvider,
    fs: &dyn Filesystem,
    ctx: &RepoContext,
    request: &NewWorktree,
) -> Result<PathBuf> {
    let branch = request.branch.trim();
    if branch.is_empty() {
        return Err(WtError::BranchRequired.into());
    }

    let destination = destination_for(&ctx.main_worktree, branch)?;
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    match request.base.as_deref().filter(|b| !b.is_empty()) {
        Some(base) => {
            log::info!("creating branch {branch} from {base} at {}", destination.display());
            git.create_branch_and_worktree(&ctx.repo_root, &destination, branch, Some(base))?;
        }
        None if git.branch_exists(&ctx.repo_root, branch)? => {
            log::info!("checking out {branch} at {}", destination.display());
            git.add_worktree(&ctx.repo_root, &destination, branch)?;
        }
        None => {
            log::info!("creating branch {branch} from HEAD at {}", destination.display());
            git.create_branch_and_worktree(&ctx.repo_root, &destination, branch, None)?;
        }
    }

    if request.copy_config {
        fs.copy_named_items(&ctx.main_worktree, &destination, CONFIG_ITEMS)?;
        fs.copy_matching_basenames(&ctx.main_worktree, &destination, CONFIG_RECURSIVE_BASENAMES)?;
    }
    if request.copy_libs {
        fs.copy_named_items(&ctx.main_worktree, &destination, LIB_ITEMS)?;
    }

    Ok(destination)
}
