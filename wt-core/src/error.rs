use std::path::PathBuf;

/// Failures callers need to tell apart. Everything else travels as `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
pub enum WtError {
    #[error("not inside a git repository")]
    NotInRepo,
    #[error("branch required")]
    BranchRequired,
    #[error("worktree has uncommitted changes")]
    DirtyWorktree,
    #[error("no worktree matches '{0}'")]
    WorktreeNotFound(String),
    #[error("cannot determine the parent directory of {}", .0.display())]
    NoParentDir(PathBuf),
    #[error("{command} failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error("{command} failed: {stderr}")]
    Tmux { command: String, stderr: String },
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}
