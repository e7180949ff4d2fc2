use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::game::{GAME_LENGTH, GameSession, format_prize, is_milestone, prize_at};

/// Money ladder, top prize first, with the current rung highlighted.
pub fn render(frame: &mut Frame, area: Rect, session: &GameSession) {
    let current = session.index();
    let completed = session.completed();

    let lines: Vec<Line> = (0..GAME_LENGTH)
        .rev()
        .map(|rung| {
            let style = if rung == current && !session.is_finished() {
                Style::default().fg(Color::Black).bg(Color::Yellow).bold()
            } else if rung < completed {
                Style::default().fg(Color::Green)
            } else if is_milestone(rung) {
                Style::default().fg(Color::White).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };

            Line::from(Span::styled(
                format!("{:>2}  {:>11}", rung + 1, format_prize(prize_at(rung))),
                style,
            ))
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
