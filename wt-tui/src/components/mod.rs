use ratatui::layout::{Constraint, Layout, Rect};

pub mod busy;
pub mod footer;
pub mod help;
pub mod list;
pub mod prompt;
pub mod status;

/// Center a rect of fixed size within another rect, shrinking it to fit
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(r.height)),
        Constraint::Fill(1),
    ])
    .areas(r);

    let [_, area, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(r.width)),
        Constraint::Fill(1),
    ])
    .areas(row);
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = centered_rect(20, 4, Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(40, 18, 20, 4));
    }

    #[test]
    fn test_centered_rect_clamps_to_parent() {
        let area = centered_rect(200, 50, Rect::new(0, 0, 30, 10));
        assert_eq!(area, Rect::new(0, 0, 30, 10));
    }
}
