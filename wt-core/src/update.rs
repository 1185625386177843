//! The TUI state machine. [`update`] applies one input to the state and returns
//! the side effect the host should run; [`perform`] runs the side effects that
//! talk to git or the filesystem and turns their outcome into the next input.

use crate::{
    action::Action,
    copy::Filesystem,
    error::WtError,
    event::AppEvent,
    git::{GitProvider, Worktree},
    ordering::{RecencyKind, order_by_recent, order_worktrees},
    service::{self, NewWorktree, RepoContext},
    state::{
        AppState, BranchItem, ExitAction, FilterState, ListItem, Mode, SearchableList, StatusKind,
    },
};
use std::path::PathBuf;

pub const LOADING_BRANCHES: &str = "loading branches…";
pub const CREATING_WORKTREE: &str = "creating worktree…";
pub const REMOVING_WORKTREE: &str = "removing worktree…";
pub const NO_BRANCHES: &str = "no branches found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    Event(AppEvent),
    Resize { width: u16, height: u16 },
    Tick,
}

/// Side effects requested by [`update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit(ExitAction),
    LoadBranches,
    CheckClean(PathBuf),
    CreateWorktree(NewWorktree),
    RemoveWorktree(PathBuf),
}

impl Effect {
    /// Effects [`perform`] handles; the rest are the host's business
    pub fn is_task(&self) -> bool {
        matches!(
            self,
            Self::LoadBranches
                | Self::CheckClean(_)
                | Self::CreateWorktree(_)
                | Self::RemoveWorktree(_)
        )
    }
}

pub fn update(state: &mut AppState, input: Input) -> Effect {
    let effect = match input {
        Input::Action(action) => handle_action(state, action),
        Input::Event(event) => {
            handle_event(state, event);
            Effect::None
        }
        Input::Resize { width, height } => {
            state.width = width;
            state.height = height;
            Effect::None
        }
        Input::Tick => {
            if matches!(state.mode, Mode::Busy(_)) {
                state.spinner.tick();
            }
            Effect::None
        }
    };
    state.refresh_scroll();
    effect
}

fn handle_action(state: &mut AppState, action: Action) -> Effect {
    if action == Action::ForceQuit {
        return Effect::Quit(ExitAction::None);
    }
    if matches!(state.mode, Mode::Busy(_)) {
        return Effect::None;
    }
    state.status = None;

    let mode = state.mode.clone();
    match mode {
        Mode::List => list_action(state, action),
        Mode::PickBranch => {
            pick_branch_action(state, action);
            Effect::None
        }
        Mode::InputBranchName => {
            input_branch_action(state, action);
            Effect::None
        }
        Mode::ConfirmNewBranch => {
            confirm_new_branch_action(state, action);
            Effect::None
        }
        Mode::PromptConfig => {
            prompt_config_action(state, action);
            Effect::None
        }
        Mode::PromptLibs => prompt_libs_action(state, action),
        Mode::ConfirmDelete => confirm_delete_action(state, action),
        Mode::Help => {
            state.mode = Mode::List;
            Effect::None
        }
        Mode::Busy(_) => Effect::None,
    }
}

/// Selection movement and opening the filter, shared by both lists
fn movement<T: ListItem>(list: &mut SearchableList<T>, action: Action) -> bool {
    match action {
        Action::MoveSelection(delta) => list.move_selection(delta),
        Action::MoveTop => list.move_to_top(),
        Action::MoveBottom => list.move_to_bottom(),
        Action::StartFilter => list.start_filtering(),
        _ => return false,
    }
    true
}

/// Keys while the filter input has focus: enter commits, esc discards
fn filtering<T: ListItem>(list: &mut SearchableList<T>, action: Action) {
    match action {
        Action::Edit(edit) => list.edit_filter(edit),
        Action::Submit => list.apply_filter(),
        Action::Cancel => list.clear_filter(),
        other => {
            movement(list, other);
        }
    }
}

fn list_action(state: &mut AppState, action: Action) -> Effect {
    if state.worktrees.is_filtering() {
        filtering(&mut state.worktrees, action);
        return Effect::None;
    }
    if movement(&mut state.worktrees, action) {
        return Effect::None;
    }

    let selected = state.worktrees.selected_item().map(|item| item.path.clone());
    match action {
        Action::Submit => selected.map_or(Effect::None, |path| Effect::Quit(ExitAction::Go(path))),
        Action::OpenTmux => {
            selected.map_or(Effect::None, |path| Effect::Quit(ExitAction::Tmux(path)))
        }
        Action::NewWorktree => {
            state.mode = Mode::Busy(LOADING_BRANCHES.to_string());
            Effect::LoadBranches
        }
        Action::DeleteWorktree => match selected {
            Some(path) => {
                state.pending_delete = Some(path.clone());
                Effect::CheckClean(path)
            }
            None => Effect::None,
        },
        Action::ShowHelp => {
            state.mode = Mode::Help;
            Effect::None
        }
        Action::Quit => Effect::Quit(ExitAction::None),
        Action::Cancel if state.worktrees.filter_state == FilterState::Applied => {
            state.worktrees.clear_filter();
            Effect::None
        }
        _ => Effect::None,
    }
}

fn selected_branch(state: &AppState) -> Option<String> {
    state.branches.selected_item().map(|b| b.name.clone())
}

fn enter_prompt_config(state: &mut AppState) {
    state.copy_config = state.defaults.copy_config;
    state.copy_libs = state.defaults.copy_libs;
    state.mode = Mode::PromptConfig;
}

fn pick_branch_action(state: &mut AppState, action: Action) {
    if state.branches.is_filtering() {
        filtering(&mut state.branches, action);
        return;
    }
    if movement(&mut state.branches, action) {
        return;
    }

    match action {
        Action::Submit => {
            if let Some(name) = selected_branch(state) {
                state.pending_branch = Some(name);
                state.base_branch = None;
                enter_prompt_config(state);
            }
        }
        Action::BranchFromBase => {
            if let Some(name) = selected_branch(state) {
                state.base_branch = Some(name);
                state.branch_input.clear();
                state.mode = Mode::InputBranchName;
            }
        }
        Action::Cancel => {
            if state.branches.filter_state == FilterState::Applied {
                state.branches.clear_filter();
            } else {
                state.mode = Mode::List;
            }
        }
        _ => {}
    }
}

fn input_branch_action(state: &mut AppState, action: Action) {
    match action {
        Action::Edit(edit) => {
            state.branch_input.apply(edit);
        }
        Action::Submit => {
            let name = state.branch_input.text.trim();
            if !name.is_empty() {
                state.pending_branch = Some(name.to_string());
                state.mode = Mode::ConfirmNewBranch;
            }
        }
        Action::Cancel => {
            state.base_branch = None;
            state.mode = Mode::PickBranch;
        }
        _ => {}
    }
}

fn confirm_new_branch_action(state: &mut AppState, action: Action) {
    match action {
        Action::Answer(true) | Action::Submit => enter_prompt_config(state),
        Action::Answer(false) | Action::Cancel => {
            state.base_branch = None;
            state.pending_branch = None;
            state.mode = Mode::PickBranch;
        }
        _ => {}
    }
}

fn prompt_config_action(state: &mut AppState, action: Action) {
    match action {
        Action::Answer(yes) => {
            state.copy_config = yes;
            state.mode = Mode::PromptLibs;
        }
        Action::Submit => {
            state.copy_config = state.defaults.copy_config;
            state.mode = Mode::PromptLibs;
        }
        Action::Cancel => {
            state.clear_pending();
            state.mode = Mode::List;
        }
        _ => {}
    }
}

fn prompt_libs_action(state: &mut AppState, action: Action) -> Effect {
    match action {
        Action::Answer(yes) => {
            state.copy_libs = yes;
            start_create(state)
        }
        Action::Submit => {
            state.copy_libs = state.defaults.copy_libs;
            start_create(state)
        }
        Action::Cancel => {
            state.clear_pending();
            state.mode = Mode::List;
            Effect::None
        }
        _ => Effect::None,
    }
}

fn start_create(state: &mut AppState) -> Effect {
    let Some(branch) = state.pending_branch.take() else {
        state.mode = Mode::List;
        return Effect::None;
    };
    let request = NewWorktree {
        branch,
        base: state.base_branch.take(),
        copy_config: state.copy_config,
        copy_libs: state.copy_libs,
    };
    state.mode = Mode::Busy(CREATING_WORKTREE.to_string());
    Effect::CreateWorktree(request)
}

fn confirm_delete_action(state: &mut AppState, action: Action) -> Effect {
    if action == Action::Answer(true)
        && let Some(path) = state.pending_delete.clone()
    {
        state.mode = Mode::Busy(REMOVING_WORKTREE.to_string());
        return Effect::RemoveWorktree(path);
    }
    state.pending_delete = None;
    state.mode = Mode::List;
    Effect::None
}

fn finish(state: &mut AppState, worktrees: Option<Vec<Worktree>>) {
    state.clear_pending();
    state.mode = Mode::List;
    if let Some(worktrees) = worktrees {
        state.reload_worktrees(&worktrees);
    }
}

fn handle_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::BranchesLoaded { branches } => {
            if !matches!(state.mode, Mode::Busy(_)) {
                return;
            }
            if branches.is_empty() {
                state.mode = Mode::List;
                state.set_status(StatusKind::Info, NO_BRANCHES);
            } else {
                let items = branches.into_iter().map(|name| BranchItem { name }).collect();
                state.branches = SearchableList::new(items);
                state.mode = Mode::PickBranch;
            }
        }
        AppEvent::CleanChecked {
            worktree_path,
            clean,
        } => {
            if state.mode != Mode::List || state.pending_delete.as_ref() != Some(&worktree_path) {
                return;
            }
            if clean {
                state.mode = Mode::ConfirmDelete;
            } else {
                state.pending_delete = None;
                state.set_status(StatusKind::Error, WtError::DirtyWorktree.to_string());
            }
        }
        AppEvent::WorktreeCreated { path, worktrees } => {
            finish(state, worktrees);
            state.set_status(
                StatusKind::Success,
                format!("created worktree at {}", path.display()),
            );
        }
        AppEvent::WorktreeRemoved {
            worktree_path,
            worktrees,
        } => {
            finish(state, worktrees);
            state.set_status(
                StatusKind::Success,
                format!("removed worktree {}", worktree_path.display()),
            );
        }
        AppEvent::GitError(message) => {
            state.clear_pending();
            state.mode = Mode::List;
            state.set_status(StatusKind::Error, message);
        }
    }
}

/// Re-enumerate worktrees newest first. A failure keeps the current list.
pub fn reload_worktrees(git: &dyn GitProvider, repo: &RepoContext) -> Option<Vec<Worktree>> {
    match git.list_worktrees(&repo.repo_root) {
        Ok(worktrees) => Some(order_worktrees(git, worktrees)),
        Err(e) => {
            log::warn!("failed to reload worktrees: {e}");
            None
        }
    }
}

/// Run a task effect to completion. Blocks; the host decides which thread.
pub fn perform(
    git: &dyn GitProvider,
    fs: &dyn Filesystem,
    repo: &RepoContext,
    effect: &Effect,
) -> Option<AppEvent> {
    let event = match effect {
        Effect::None | Effect::Quit(_) => return None,
        Effect::LoadBranches => match git.list_branches(&repo.repo_root) {
            Ok(branches) => AppEvent::BranchesLoaded {
                branches: order_by_recent(git, &repo.repo_root, branches, RecencyKind::Branches),
            },
            Err(e) => AppEvent::GitError(e.to_string()),
        },
        Effect::CheckClean(path) => match git.worktree_clean(path) {
            Ok(clean) => AppEvent::CleanChecked {
                worktree_path: path.clone(),
                clean,
            },
            Err(e) => AppEvent::GitError(e.to_string()),
        },
        Effect::CreateWorktree(request) => match service::add_worktree(git, fs, repo, request) {
            Ok(path) => AppEvent::WorktreeCreated {
                path,
                worktrees: reload_worktrees(git, repo),
            },
            Err(e) => AppEvent::GitError(format!("{e:#}")),
        },
        Effect::RemoveWorktree(path) => match git.remove_worktree(&repo.repo_root, path) {
            Ok(()) => {
                log::info!("removed worktree {}", path.display());
                AppEvent::WorktreeRemoved {
                    worktree_path: path.clone(),
                    worktrees: reload_worktrees(git, repo),
                }
            }
            Err(e) => AppEvent::GitError(e.to_string()),
        },
    };
    Some(event)
}
