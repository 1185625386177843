//! The framed list: title line, column header, and the visible window of rows.

use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};
use unicode_width::UnicodeWidthStr;
use wt_core::state::{
    AppState, FilterState, ListItem, SearchableList, TextInput, branch_column_width,
};

/// Frame borders plus the title and header lines
pub const FRAME_ROWS: u16 = 4;

const SELECTED_MARKER: &str = "> ";
const UNSELECTED_MARKER: &str = "  ";

/// Split `text` into spans, styling the chars at `positions` with `highlight`.
/// Positions are a single contiguous run.
pub fn highlighted<'a>(
    text: &'a str,
    positions: &[usize],
    base: Style,
    highlight: Style,
) -> Vec<Span<'a>> {
    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return vec![Span::styled(text, base)];
    };
    let byte_at = |char_idx: usize| {
        text.char_indices()
            .nth(char_idx)
            .map_or(text.len(), |(i, _)| i)
    };
    let (start, end) = (byte_at(first), byte_at(last + 1));
    [
        (&text[..start], base),
        (&text[start..end], highlight),
        (&text[end..], base),
    ]
    .into_iter()
    .filter(|(s, _)| !s.is_empty())
    .map(|(s, style)| Span::styled(s, style))
    .collect()
}

fn title_line<'a, T>(label: &'a str, list: &'a SearchableList<T>, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(
        label,
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if list.filter_state != FilterState::Unfiltered {
        spans.push(Span::styled("  /", Style::default().fg(theme.secondary)));
        spans.push(Span::raw(list.filter.text.as_str()));
    }
    Line::from(spans)
}

/// Column where the filter cursor sits on the title line
fn filter_cursor_x(label: &str, input: &TextInput) -> u16 {
    let cols = label.width() + "  /".width() + input.text[..input.cursor].width();
    u16::try_from(cols).unwrap_or(u16::MAX)
}

fn rows<'a, T: ListItem>(
    list: &'a SearchableList<T>,
    height: usize,
    theme: &Theme,
    suffix: impl Fn(&T) -> Option<&'static str>,
) -> Vec<Line<'a>> {
    let hl = Style::default()
        .fg(theme.secondary)
        .add_modifier(Modifier::BOLD);
    list.visible()
        .enumerate()
        .skip(list.scroll_offset)
        .take(height)
        .map(|(row, (item, m))| {
            let selected = list.selected == Some(row);
            let base = if selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if selected { SELECTED_MARKER } else { UNSELECTED_MARKER };
            let mut spans = vec![Span::styled(marker, base)];
            spans.extend(highlighted(item.title(), &m.positions, base, hl));
            if let Some(suffix) = suffix(item) {
                spans.push(Span::styled(suffix, Style::default().fg(theme.muted)));
            }
            Line::from(spans)
        })
        .collect()
}

fn draw_frame(
    f: &mut Frame,
    area: Rect,
    title: Line,
    header: Line,
    body: Vec<Line>,
    theme: &Theme,
) -> Rect {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [title_area, header_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(Paragraph::new(title), title_area);
    f.render_widget(Paragraph::new(header), header_area);
    f.render_widget(Paragraph::new(body), list_area);
    title_area
}

fn place_filter_cursor<T>(f: &mut Frame, title_area: Rect, label: &str, list: &SearchableList<T>) {
    if list.filter_state == FilterState::Filtering {
        let x = title_area.x.saturating_add(filter_cursor_x(label, &list.filter));
        f.set_cursor_position((x.min(title_area.right().saturating_sub(1)), title_area.y));
    }
}

pub fn draw_worktrees(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    const LABEL: &str = "Worktrees";
    let list = &state.worktrees;
    let width = branch_column_width(list.items());
    let header = Line::styled(
        format!("{UNSELECTED_MARKER}{:<width$}  Path", "Branch"),
        Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED),
    );
    let body = rows(list, state.worktree_rows(), theme, |item| {
        item.is_main.then_some("  (main)")
    });
    let title_area = draw_frame(f, area, title_line(LABEL, list, theme), header, body, theme);
    place_filter_cursor(f, title_area, LABEL, list);
}

pub fn draw_branches(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    const LABEL: &str = "New worktree: pick a branch";
    let list = &state.branches;
    let header = Line::styled(
        format!("{UNSELECTED_MARKER}Branch (newest first)"),
        Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED),
    );
    let body = rows(list, state.branch_rows(), theme, |_| None);
    let title_area = draw_frame(f, area, title_line(LABEL, list, theme), header, body, theme);
    place_filter_cursor(f, title_area, LABEL, list);
}
