pub mod action;
pub mod config;
pub mod constants;
pub mod copy;
pub mod error;
pub mod event;
pub mod git;
pub mod launch;
pub mod ordering;
pub mod resolve;
pub mod service;
pub mod state;
pub mod tmux;
pub mod update;

// Re-export commonly used types at crate root
pub use action::Action;
pub use config::Config;
pub use copy::{Filesystem, OsFilesystem};
pub use error::WtError;
pub use event::AppEvent;
pub use git::{GitProvider, Worktree};
pub use launch::ProcessLauncher;
pub use service::RepoContext;
pub use state::{AppState, ExitAction, Mode};
pub use tmux::TmuxProvider;
pub use update::{Effect, Input, update};
