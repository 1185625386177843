use crate::git::Worktree;
use std::path::PathBuf;

/// Results of background work, fed back into [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Local branches, newest commit first
    BranchesLoaded { branches: Vec<String> },

    /// Cleanliness of the worktree the user asked to delete
    CleanChecked { worktree_path: PathBuf, clean: bool },

    /// `worktrees` is the reloaded list, or `None` if reloading failed
    WorktreeCreated {
        path: PathBuf,
        worktrees: Option<Vec<Worktree>>,
    },

    WorktreeRemoved {
        worktree_path: PathBuf,
        worktrees: Option<Vec<Worktree>>,
    },

    /// A background git or filesystem operation failed
    GitError(String),
}
