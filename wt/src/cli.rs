use serde::Serialize;
use std::{
    fmt::Write,
    path::{Path, PathBuf},
};
use wt_core::{
    config::NewConfig,
    copy::Filesystem,
    error::WtError,
    git::{GitProvider, Worktree},
    launch::ProcessLauncher,
    resolve::resolve_worktree,
    service::{self, NewWorktree, RepoContext},
    tmux::{self, TmuxProvider},
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: u8,
}

impl CliError {
    /// Runtime failure: not in a repository, git or tmux failed, IO error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    /// Bad invocation or unusable configuration
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u8 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        Self::runtime(format!("{value:#}"))
    }
}

impl From<WtError> for CliError {
    fn from(value: WtError) -> Self {
        Self::runtime(value.to_string())
    }
}

pub fn print_error(error: &CliError) {
    eprintln!("error: {}", error.message());
}

#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub branch: Option<String>,
    pub copy_config: Option<bool>,
    pub copy_libs: Option<bool>,
    pub from: Option<String>,
}

impl NewArgs {
    /// Explicit flags win over the `[new]` defaults
    fn into_request(self, defaults: NewConfig) -> CliResult<NewWorktree> {
        let branch = self.branch.unwrap_or_default().trim().to_string();
        if branch.is_empty() {
            return Err(WtError::BranchRequired.into());
        }
        Ok(NewWorktree {
            branch,
            base: self.from.filter(|b| !b.trim().is_empty()),
            copy_config: self.copy_config.unwrap_or(defaults.copy_config),
            copy_libs: self.copy_libs.unwrap_or(defaults.copy_libs),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct WorktreeOutput {
    branch: Option<String>,
    path: PathBuf,
}

impl From<&Worktree> for WorktreeOutput {
    fn from(worktree: &Worktree) -> Self {
        Self {
            branch: worktree.branch.clone(),
            path: worktree.path.clone(),
        }
    }
}

fn repo_context(git: &dyn GitProvider, cwd: &Path) -> CliResult<RepoContext> {
    Ok(RepoContext::resolve(git, cwd)?)
}

fn find_worktree(git: &dyn GitProvider, cwd: &Path, name: &str) -> CliResult<PathBuf> {
    let repo = repo_context(git, cwd)?;
    let worktrees = git.list_worktrees(&repo.repo_root)?;
    let found = resolve_worktree(&worktrees, name)?;
    Ok(found.path.clone())
}

pub fn cmd_new(
    git: &dyn GitProvider,
    fs: &dyn Filesystem,
    cwd: &Path,
    defaults: NewConfig,
    args: NewArgs,
) -> CliResult<()> {
    let request = args.into_request(defaults)?;
    let repo = repo_context(git, cwd)?;
    let path = service::add_worktree(git, fs, &repo, &request)?;
    println!("{}", path.display());
    Ok(())
}

pub fn cmd_list(git: &dyn GitProvider, cwd: &Path, json: bool) -> CliResult<()> {
    let repo = repo_context(git, cwd)?;
    let worktrees = git.list_worktrees(&repo.repo_root)?;

    if json {
        let output: Vec<WorktreeOutput> = worktrees.iter().map(WorktreeOutput::from).collect();
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::runtime(format!("failed to serialize output: {e}")))?;
        println!("{rendered}");
    } else {
        print!("{}", format_worktree_lines(&worktrees));
    }
    Ok(())
}

/// `<branch>\t<path>` per worktree, or just `<path>` for a detached HEAD
fn format_worktree_lines(worktrees: &[Worktree]) -> String {
    let mut out = String::new();
    for worktree in worktrees {
        match &worktree.branch {
            Some(branch) => {
                let _ = writeln!(out, "{branch}\t{}", worktree.path.display());
            }
            None => {
                let _ = writeln!(out, "{}", worktree.path.display());
            }
        }
    }
    out
}

pub fn cmd_go(
    git: &dyn GitProvider,
    launcher: &dyn ProcessLauncher,
    cwd: &Path,
    name: &str,
) -> CliResult<()> {
    let path = find_worktree(git, cwd, name)?;
    launcher.shell(&path)?;
    Ok(())
}

pub fn cmd_tmux(
    git: &dyn GitProvider,
    tmux: &dyn TmuxProvider,
    cwd: &Path,
    name: &str,
) -> CliResult<()> {
    let path = find_worktree(git, cwd, name)?;
    tmux::open_session(tmux, &path)?;
    Ok(())
}
