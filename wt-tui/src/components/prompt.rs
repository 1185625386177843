use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;
use wt_core::{
    constants::{CONFIG_ITEMS, LIB_ITEMS},
    state::{AppState, Mode},
};

const DIALOG_WIDTH: u16 = 64;

fn choices(default_yes: bool) -> &'static str {
    if default_yes { "[Y/n]" } else { "[y/N]" }
}

/// Question shown for a prompt mode, `None` for modes without a dialog
pub fn question(state: &AppState) -> Option<String> {
    let base = state.base_branch.as_deref().unwrap_or("HEAD");
    let pending = state.pending_branch.as_deref().unwrap_or_default();
    let text = match state.mode {
        Mode::InputBranchName => format!("New branch from {base}:"),
        Mode::ConfirmNewBranch => format!("Create {pending} from {base}? {}", choices(true)),
        Mode::PromptConfig => format!(
            "Copy config files ({})? {}",
            CONFIG_ITEMS.join(", "),
            choices(state.defaults.copy_config)
        ),
        Mode::PromptLibs => format!(
            "Copy libs ({})? {}",
            LIB_ITEMS.join(", "),
            choices(state.defaults.copy_libs)
        ),
        Mode::ConfirmDelete => {
            let path = state
                .pending_delete
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!("Remove worktree {path}? {}", choices(false))
        }
        _ => return None,
    };
    Some(text)
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(question) = question(state) else {
        return;
    };
    let editing = state.mode == Mode::InputBranchName;
    let popup = super::centered_rect(DIALOG_WIDTH, if editing { 6 } else { 5 }, area);
    let title = match state.mode {
        Mode::ConfirmDelete => " Remove ",
        _ => " New worktree ",
    };
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(title)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(popup);

    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let [question_area, input_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(u16::from(editing)),
    ])
    .areas(inner);
    f.render_widget(
        Paragraph::new(Line::styled(
            question,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true }),
        question_area,
    );

    if editing {
        let input = &state.branch_input;
        f.render_widget(
            Paragraph::new(Line::styled(
                input.text.as_str(),
                Style::default().fg(theme.secondary),
            )),
            input_area,
        );
        let offset = u16::try_from(input.text[..input.cursor].width()).unwrap_or(u16::MAX);
        let x = input_area
            .x
            .saturating_add(offset)
            .min(input_area.right().saturating_sub(1));
        f.set_cursor_position((x, input_area.y));
    }
}
