use crate::theme::Theme;
use ratatui::{Frame, layout::Rect, style::Style, text::Line, widgets::Paragraph};
use wt_core::state::{AppState, StatusKind};

/// One-line message from the last operation; cleared on the next key press
pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(status) = &state.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Info => theme.secondary,
        StatusKind::Success => theme.success,
        StatusKind::Error => theme.error,
    };
    let line = Line::styled(format!(" {}", status.text), Style::default().fg(color));
    f.render_widget(Paragraph::new(line), area);
}
