mod spawn;

use crate::{components, keymap, theme::Theme};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use spawn::spawn_task;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::Duration,
};
use wt_core::{
    copy::Filesystem,
    event::AppEvent,
    git::GitProvider,
    state::{AppState, ExitAction, Mode},
    update::{Effect, Input, perform, update},
};

/// Spinner frame interval and the longest the loop waits for a key
const POLL_INTERVAL: Duration = Duration::from_millis(80);

/// Handle for dispatching background work
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    /// Send an event from a background thread to the main loop
    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

/// Run the interactive session until the user quits or picks a worktree
pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    fs: &Arc<dyn Filesystem>,
    theme: &Theme,
) -> anyhow::Result<ExitAction> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let cancel = Arc::new(AtomicBool::new(false));
    let sender = EventSender {
        tx,
        cancel: Arc::clone(&cancel),
    };

    let size = terminal.size()?;
    update(
        state,
        Input::Resize {
            width: size.width,
            height: size.height,
        },
    );

    loop {
        terminal.draw(|f| draw(f, state, theme))?;

        // Finished work is applied before any further key input
        let input = if let Ok(app_event) = rx.try_recv() {
            Input::Event(app_event)
        } else if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match keymap::resolve_action(key, state) {
                        Some(action) => Input::Action(action),
                        None => continue,
                    }
                }
                Event::Resize(width, height) => Input::Resize { width, height },
                _ => continue,
            }
        } else {
            Input::Tick
        };

        let effect = update(state, input);
        if let Some(exit) = execute_effect(effect, state, git, fs, &sender) {
            // Signal cancellation to background threads
            cancel.store(true, Ordering::Relaxed);
            return Ok(exit);
        }
    }
}

/// Carry out what [`update`] asked for. The cleanliness check runs inline so the
/// confirmation appears on the very next frame; other tasks go to a thread.
pub fn execute_effect(
    mut effect: Effect,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    fs: &Arc<dyn Filesystem>,
    sender: &EventSender,
) -> Option<ExitAction> {
    loop {
        match effect {
            Effect::None => return None,
            Effect::Quit(exit) => return Some(exit),
            Effect::CheckClean(_) => {
                let event = perform(git.as_ref(), fs.as_ref(), &state.repo, &effect)?;
                effect = update(state, Input::Event(event));
            }
            task => {
                spawn_task(git, fs, &state.repo, task, sender);
                return None;
            }
        }
    }
}

fn draw(f: &mut Frame, state: &AppState, theme: &Theme) {
    let area = f.area();

    if let Mode::Busy(message) = &state.mode {
        components::busy::draw(f, area, message, state.spinner.current(), theme);
        return;
    }

    let showing_branches = matches!(
        state.mode,
        Mode::PickBranch | Mode::InputBranchName | Mode::ConfirmNewBranch
    ) || (matches!(state.mode, Mode::PromptConfig | Mode::PromptLibs)
        && !state.branches.items().is_empty());
    let list_rows = if showing_branches {
        state.branch_rows()
    } else {
        state.worktree_rows()
    };
    let frame_height = u16::try_from(list_rows)
        .unwrap_or(u16::MAX)
        .saturating_add(components::list::FRAME_ROWS);

    let [frame_area, footer_area, status_area, _] = Layout::vertical([
        Constraint::Length(frame_height),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    if showing_branches {
        components::list::draw_branches(f, frame_area, state, theme);
    } else {
        components::list::draw_worktrees(f, frame_area, state, theme);
    }
    components::footer::draw(f, footer_area, state, theme);
    components::status::draw(f, status_area, state, theme);

    match state.mode {
        Mode::Help => components::help::draw(f, area, theme),
        _ => components::prompt::draw(f, area, state, theme),
    }
}
