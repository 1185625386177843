use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;
use wt_core::state::{AppState, Mode};

/// Full and narrow key hints for the current mode
pub fn hints(state: &AppState) -> (&'static str, &'static str) {
    match state.mode {
        Mode::List if state.worktrees.is_filtering() => filter_hints(),
        Mode::PickBranch if state.branches.is_filtering() => filter_hints(),
        Mode::List => (
            "enter: shell  t: tmux  n: new  d: delete  /: filter  ?: help  q: quit",
            "↵ shell  t tmux  n new  d del  ? help  q quit",
        ),
        Mode::PickBranch => (
            "enter: use branch  c: new branch from selected  /: filter  esc: back",
            "↵ use  c new from  / filter  esc back",
        ),
        Mode::InputBranchName => ("enter: confirm  esc: back", "↵ ok  esc back"),
        Mode::ConfirmNewBranch | Mode::PromptConfig | Mode::PromptLibs => (
            "y: yes  n: no  enter: default  esc: cancel",
            "y/n  ↵ default  esc cancel",
        ),
        Mode::ConfirmDelete => ("y: remove  any other key: keep", "y remove  * keep"),
        Mode::Help => ("any key: close", "any key: close"),
        Mode::Busy(_) => ("ctrl+c: quit", "ctrl+c: quit"),
    }
}

fn filter_hints() -> (&'static str, &'static str) {
    (
        "type to filter  enter: apply  esc: clear",
        "↵ apply  esc clear",
    )
}

/// The full hint unless the terminal is too narrow to fit it with a margin
pub fn footer_hint<'a>(width: u16, full: &'a str, short: &'a str) -> &'a str {
    if usize::from(width) < full.width() + 2 {
        short
    } else {
        full
    }
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (full, short) = hints(state);
    let text = footer_hint(area.width, full, short);
    let line = Line::styled(format!(" {text}"), Style::default().fg(theme.muted));
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn list_state() -> AppState {
        AppState::new(
            wt_core::service::RepoContext {
                repo_root: "/r".into(),
                main_worktree: "/r".into(),
            },
            &[],
            wt_core::config::NewConfig::default(),
        )
    }

    fn render_footer(state: &AppState, width: u16) -> String {
        let theme = Theme::default();
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                draw(f, f.area(), state, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol().to_string())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_footer_renders_short_form_when_narrow() {
        let state = list_state();
        let (full, short) = hints(&state);
        let wide = u16::try_from(full.width() + 2).unwrap();

        assert_eq!(render_footer(&state, wide), format!(" {full}"));
        assert_eq!(render_footer(&state, wide - 1), format!(" {short}"));
    }

    #[test]
    fn test_footer_hint_switches_at_margin() {
        let full = "enter: go  q: quit";
        assert_eq!(footer_hint(20, full, "short"), full);
        assert_eq!(footer_hint(19, full, "short"), "short");
        assert_eq!(footer_hint(0, full, "short"), "short");
    }

    #[test]
    fn test_footer_hint_measures_display_width() {
        // "↵" is one column but three bytes
        assert_eq!(footer_hint(4, "↵ a", "s"), "s");
        assert_eq!(footer_hint(5, "↵ a", "s"), "↵ a");
    }

    #[test]
    fn test_short_hints_fit_narrower() {
        let state = wt_core::state::AppState::new(
            wt_core::service::RepoContext {
                repo_root: "/r".into(),
                main_worktree: "/r".into(),
            },
            &[],
            wt_core::config::NewConfig::default(),
        );
        let (full, short) = hints(&state);
        assert!(short.width() < full.width());
    }
}
