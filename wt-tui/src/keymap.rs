use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use wt_core::{
    action::{Action, TextEdit},
    state::{AppState, Mode},
};

/// Resolve a key event into an Action based on the current mode and filter focus
pub fn resolve_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    // Global quit, honoured even while busy
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::ForceQuit);
    }

    match state.mode {
        Mode::Busy(_) => None,
        Mode::Help => Some(Action::DismissHelp),
        Mode::List if state.worktrees.is_filtering() => resolve_text_key(key),
        Mode::List => resolve_list_key(key),
        Mode::PickBranch if state.branches.is_filtering() => resolve_text_key(key),
        Mode::PickBranch => resolve_picker_key(key),
        Mode::InputBranchName => resolve_text_key(key),
        Mode::ConfirmNewBranch | Mode::PromptConfig | Mode::PromptLibs => {
            resolve_prompt_key(key.code)
        }
        // Default no: anything but y cancels
        Mode::ConfirmDelete => Some(Action::Answer(matches!(
            key.code,
            KeyCode::Char('y' | 'Y')
        ))),
    }
}

fn resolve_movement_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveSelection(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveSelection(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::MoveTop),
        KeyCode::End | KeyCode::Char('G') => Some(Action::MoveBottom),
        _ => None,
    }
}

fn resolve_list_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('t') => Some(Action::OpenTmux),
        KeyCode::Char('n') => Some(Action::NewWorktree),
        KeyCode::Char('d') => Some(Action::DeleteWorktree),
        KeyCode::Char('?') => Some(Action::ShowHelp),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('/') => Some(Action::StartFilter),
        _ => resolve_movement_key(key),
    }
}

fn resolve_picker_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('c') => Some(Action::BranchFromBase),
        KeyCode::Char('/') => Some(Action::StartFilter),
        _ => resolve_movement_key(key),
    }
}

/// Filter input and branch-name entry: printable keys are text
fn resolve_text_key(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let edit = match key.code {
        KeyCode::Enter => return Some(Action::Submit),
        KeyCode::Esc => return Some(Action::Cancel),
        KeyCode::Up => return Some(Action::MoveSelection(-1)),
        KeyCode::Down => return Some(Action::MoveSelection(1)),
        KeyCode::Char('w') if ctrl => TextEdit::DeleteWord,
        KeyCode::Backspace if alt || ctrl => TextEdit::DeleteWord,
        KeyCode::Char('a') if ctrl => TextEdit::Home,
        KeyCode::Char('e') if ctrl => TextEdit::End,
        KeyCode::Char(c) if !ctrl => TextEdit::Insert(c),
        KeyCode::Backspace => TextEdit::Backspace,
        KeyCode::Delete => TextEdit::Delete,
        KeyCode::Left => TextEdit::Left,
        KeyCode::Right => TextEdit::Right,
        KeyCode::Home => TextEdit::Home,
        KeyCode::End => TextEdit::End,
        _ => return None,
    };
    Some(Action::Edit(edit))
}

fn resolve_prompt_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('y' | 'Y') => Some(Action::Answer(true)),
        KeyCode::Char('n' | 'N') => Some(Action::Answer(false)),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Esc => Some(Action::Cancel),
        _ => None,
    }
}
