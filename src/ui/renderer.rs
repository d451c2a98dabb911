use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::constants::HIDDEN_ROWS;
use crate::game::{Cell, Jewel, Phase, Session};

const CELL_WIDTH: u16 = 3; // border, jewel, border

pub fn jewel_color(jewel: Jewel) -> Color {
    match jewel {
        Jewel::Red => Color::Rgb(255, 0, 0),
        Jewel::Orange => Color::Rgb(255, 165, 0),
        Jewel::Yellow => Color::Rgb(255, 255, 0),
        Jewel::Green => Color::Rgb(0, 128, 0),
        Jewel::Blue => Color::Rgb(0, 0, 255),
        Jewel::Indigo => Color::Rgb(75, 0, 130),
        Jewel::Violet => Color::Rgb(238, 130, 238),
    }
}

/// Border style by cell state. `None` means no visible border (landed).
pub fn border_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Frozen(_) => Some(Color::Rgb(128, 128, 128)),
        Cell::Falling(_) => Some(Color::Rgb(255, 255, 255)),
        Cell::Signaled(_) => Some(Color::Rgb(255, 215, 0)),
        Cell::Landed(_) | Cell::Empty => None,
    }
}

fn cell_spans(cell: Cell) -> [Span<'static>; 3] {
    let Some(jewel) = cell.jewel() else {
        return [Span::raw(" "), Span::raw(" "), Span::raw(" ")];
    };
    let (border, left, right) = match border_color(cell) {
        Some(color) => (Style::default().fg(color), "[", "]"),
        None => (Style::default(), " ", " "),
    };
    [
        Span::styled(left, border),
        Span::styled("█", Style::default().fg(jewel_color(jewel))),
        Span::styled(right, border),
    ]
}

pub fn ui(f: &mut Frame, session: &Session) {
    let size = f.size();
    let board = session.state().board();

    let board_height = board.visible_rows() as u16 + 2;
    let board_width = board.columns() as u16 * CELL_WIDTH + 2;

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_height),
            Constraint::Min(1),
        ])
        .split(size);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(board_width),
            Constraint::Length(18),
            Constraint::Min(1),
        ])
        .split(vertical_chunks[1]);

    let board_area = horizontal_chunks[1];
    render_board(f, session, board_area);
    render_info(f, session, horizontal_chunks[2]);

    if session.state().phase() == Phase::GameOver {
        render_game_over_overlay(f, board_area);
    }
}

fn render_board(f: &mut Frame, session: &Session, area: Rect) {
    let board = session.state().board();

    // Hidden spawn rows are skipped
    let board_lines: Vec<Line> = (HIDDEN_ROWS..board.rows())
        .map(|row| {
            let spans: Vec<Span> = (0..board.columns())
                .flat_map(|column| cell_spans(board.get(column, row).unwrap_or(Cell::Empty)))
                .collect();
            Line::from(spans)
        })
        .collect();

    let board_widget = Paragraph::new(board_lines)
        .block(Block::default().borders(Borders::ALL).title("tcolumns"));

    f.render_widget(board_widget, area);
}

fn phase_label(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::Spawning | Phase::Falling => ("Falling", Color::White),
        Phase::Landed => ("Landed", Color::Gray),
        Phase::Matching => ("Matching", Color::Rgb(255, 215, 0)),
        Phase::GameOver => ("Game over", Color::Red),
    }
}

fn render_info(f: &mut Frame, session: &Session, area: Rect) {
    let (label, color) = phase_label(session.state().phase());

    let info_text = vec![
        Line::from(vec![Span::styled(label, Style::default().fg(color))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("←/→  move")]),
        Line::from(vec![Span::raw("↑/␣  rotate")]),
        Line::from(vec![Span::raw("r    restart")]),
        Line::from(vec![Span::raw("q    quit")]),
    ];

    let info_widget = Paragraph::new(info_text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(info_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

fn render_game_over_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(90, 40, area);
    f.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(vec![Span::styled("GAME OVER", Style::default().fg(Color::White))]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::raw("r: restart")]),
        Line::from(vec![Span::raw("q: quit")]),
    ];

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(widget, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_by_state() {
        assert_eq!(border_color(Cell::Frozen(Jewel::Red)), Some(Color::Rgb(128, 128, 128)));
        assert_eq!(border_color(Cell::Falling(Jewel::Red)), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(border_color(Cell::Signaled(Jewel::Red)), Some(Color::Rgb(255, 215, 0)));
        assert_eq!(border_color(Cell::Landed(Jewel::Red)), None);
    }

    #[test]
    fn test_empty_cell_is_blank() {
        let spans = cell_spans(Cell::Empty);
        assert!(spans.iter().all(|span| span.content == " "));
    }
}
