use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    /// `None` for a detached HEAD
    pub branch: Option<String>,
    /// The first worktree git enumerates
    pub is_main: bool,
}

impl Worktree {
    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or_default()
    }

    /// Final path component, used as the tmux session name and for `go` lookups
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
