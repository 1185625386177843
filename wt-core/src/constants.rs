/// Suffix appended to the main worktree directory name to form the worktree root:
/// `~/src/app` keeps its worktrees under `~/src/app-worktrees/`.
pub const WORKTREES_DIR_SUFFIX: &str = "-worktrees";

/// Items copied from the main worktree root when config copying is enabled.
pub const CONFIG_ITEMS: &[&str] = &[".env", "AGENTS.md", "CLAUDE.md"];

/// Basenames copied at every depth when config copying is enabled.
pub const CONFIG_RECURSIVE_BASENAMES: &[&str] = &[".env"];

/// Library directories copied from the main worktree root when lib copying is enabled.
pub const LIB_ITEMS: &[&str] = &["node_modules"];

/// Mode for directories created while copying.
pub const DIR_MODE: u32 = 0o755;

pub const GIT_BINARY: &str = "git";
pub const TMUX_BINARY: &str = "tmux";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const TMUX_ENV: &str = "TMUX";
pub const SHELL_ENV: &str = "SHELL";
