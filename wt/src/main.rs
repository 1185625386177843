mod cli;
mod logging;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use wt_core::{
    config::{self, Config},
    copy::{Filesystem, OsFilesystem},
    git::{CliGitProvider, GitProvider},
    launch::{CliProcessLauncher, ProcessLauncher},
    ordering::order_worktrees,
    service::RepoContext,
    state::{AppState, ExitAction},
    tmux::{self, CliTmuxProvider},
};
use wt_tui::Theme;

use crate::cli::{CliError, CliResult, NewArgs};

#[derive(Parser)]
#[command(
    version,
    about = "Git worktree manager with an interactive picker and tmux support",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree for a branch, creating the branch when it does not exist
    New {
        branch: Option<String>,
        /// Copy .env, AGENTS.md and CLAUDE.md from the main worktree (default)
        #[arg(short = 'c', long, overrides_with = "no_copy_config")]
        copy_config: bool,
        #[arg(short = 'C', long, overrides_with = "copy_config")]
        no_copy_config: bool,
        /// Copy node_modules from the main worktree
        #[arg(short = 'l', long, overrides_with = "no_copy_libs")]
        copy_libs: bool,
        #[arg(short = 'L', long, overrides_with = "copy_libs")]
        no_copy_libs: bool,
        /// Create the branch from this base instead of HEAD
        #[arg(short = 'f', long = "from", value_name = "BASE")]
        from: Option<String>,
    },
    /// List worktrees of the current repository
    List {
        #[arg(long)]
        json: bool,
    },
    /// Open a shell in a worktree (matched by branch, directory name, then path)
    Go { name: String },
    /// Open or attach a tmux session for a worktree
    T { name: String },
    /// Print usage
    Help,
}

/// `Some(true)` / `Some(false)` for an explicit flag pair, `None` when neither was given
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = logging::level_from_env(std::env::var(logging::LOG_LEVEL_ENV).ok().as_deref());
    if let Err(e) = logging::setup_logging(level) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let config = match config::load_config(None) {
        Ok(config) => config,
        Err(error) => {
            cli::print_error(&CliError::usage(format!("{error:#}")));
            return ExitCode::from(2);
        }
    };

    let result = dispatch(cli.command, &config);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            cli::print_error(&error);
            ExitCode::from(error.code())
        }
    }
}

fn dispatch(command: Option<Commands>, config: &Config) -> CliResult<()> {
    let git = CliGitProvider;
    match command {
        Some(Commands::New {
            branch,
            copy_config,
            no_copy_config,
            copy_libs,
            no_copy_libs,
            from,
        }) => {
            let args = NewArgs {
                branch,
                copy_config: flag_pair(copy_config, no_copy_config),
                copy_libs: flag_pair(copy_libs, no_copy_libs),
                from,
            };
            let fs = OsFilesystem::new(true);
            cli::cmd_new(&git, &fs, &current_dir()?, config.new, args)
        }
        Some(Commands::List { json }) => cli::cmd_list(&git, &current_dir()?, json),
        Some(Commands::Go { name }) => {
            cli::cmd_go(&git, &CliProcessLauncher, &current_dir()?, &name)
        }
        Some(Commands::T { name }) => cli::cmd_tmux(&git, &CliTmuxProvider, &current_dir()?, &name),
        Some(Commands::Help) => {
            cmd_help();
            Ok(())
        }
        None => run_tui(config).map_err(CliError::from),
    }
}

fn cmd_help() {
    eprintln!("{}", Cli::command().render_help());
}

fn current_dir() -> CliResult<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::runtime(format!("cannot read current directory: {e}")))?;
    Ok(dunce::canonicalize(&cwd).unwrap_or(cwd))
}

fn run_tui(config: &Config) -> Result<()> {
    let git: Arc<dyn GitProvider> = Arc::new(CliGitProvider);
    let fs: Arc<dyn Filesystem> = Arc::new(OsFilesystem::new(false));

    let cwd = current_dir().map_err(|e| anyhow::anyhow!(e))?;
    let repo = RepoContext::resolve(git.as_ref(), &cwd)?;
    let worktrees = order_worktrees(git.as_ref(), git.list_worktrees(&repo.repo_root)?);
    let mut state = AppState::new(repo, &worktrees, config.new);
    let theme = Theme::from_config(&config.theme);

    log::info!("starting tui in {}", cwd.display());
    let mut terminal = ratatui::init();
    let result = wt_tui::run(&mut terminal, &mut state, &git, &fs, &theme);
    ratatui::restore();

    match result? {
        ExitAction::None => {}
        ExitAction::Go(path) => CliProcessLauncher.shell(&path)?,
        ExitAction::Tmux(path) => tmux::open_session(&CliTmuxProvider, &path)?,
    }
    Ok(())
}
