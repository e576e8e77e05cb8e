//! Layout helpers for the terminal user interface.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle of `percent_x` by `percent_y` centred inside `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Screen column for a text cursor `offset + cursor` cells into `area`, or
/// `None` when it would land outside the area.
pub fn cursor_column(area: Rect, offset: u16, cursor: usize) -> Option<u16> {
    let x = area
        .x
        .saturating_add(offset)
        .saturating_add(u16::try_from(cursor).unwrap_or(u16::MAX));
    (x < area.x.saturating_add(area.width)).then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 15);
    }

    #[test]
    fn test_cursor_column_bounds() {
        let area = Rect::new(2, 0, 20, 1);
        assert_eq!(cursor_column(area, 0, 0), Some(2));
        assert_eq!(cursor_column(area, 13, 4), Some(19));
        assert_eq!(cursor_column(area, 13, 7), None);
        assert_eq!(cursor_column(area, 0, 70_000), None);
        assert_eq!(cursor_column(Rect::new(u16::MAX - 1, 0, 1, 1), 13, usize::MAX), None);
    }
}
