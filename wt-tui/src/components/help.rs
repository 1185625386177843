use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph},
};

const BINDINGS: &[(&str, &str)] = &[
    ("enter", "open a shell in the worktree"),
    ("t", "open the worktree in tmux"),
    ("n", "new worktree"),
    ("d", "remove worktree (must be clean)"),
    ("/", "filter; enter applies, esc clears"),
    ("j / k, ↑ / ↓", "move"),
    ("g / G", "first / last"),
    ("c", "in the branch picker: new branch from the selection"),
    ("?", "this help"),
    ("q, ctrl+c", "quit"),
];

const KEY_COLUMN: usize = 14;

/// Help overlay listing key bindings
pub fn draw(f: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<KEY_COLUMN$}"),
                    Style::default()
                        .fg(theme.secondary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*desc),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        " press any key to close",
        Style::default().fg(theme.muted),
    ));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let popup = super::centered_rect(70, height, area);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" Help ")
        .border_style(Style::default().fg(theme.accent));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
