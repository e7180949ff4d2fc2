use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::game::{GAME_LENGTH, LADDER, format_prize};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .split(area);

    let top_prize = format_prize(LADDER[GAME_LENGTH - 1]);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "WHO WANTS TO BE A MILLIONAIRE?",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Questions · 3 Lifelines · {}", GAME_LENGTH, top_prize),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from("Milestones after questions 5 and 10".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start  ·  q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .fg(Color::Red);
        frame.render_widget(widget, chunks[2]);
    }
}
