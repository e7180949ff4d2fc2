use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::ladder;
use crate::app::{App, OPTION_LABELS};
use crate::game::{GameSession, Outcome, format_prize};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };
    let Some(outcome) = session.outcome() else {
        return;
    };

    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(22)])
        .margin(1)
        .split(area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .split(columns[0]);

    render_summary(frame, chunks[1], outcome);
    render_details(frame, chunks[2], session, outcome);
    render_controls(frame, chunks[3]);

    ladder::render(frame, columns[1], session);
}

fn outcome_headline(outcome: Outcome) -> (&'static str, Color) {
    match outcome {
        Outcome::Millionaire => ("YOU ARE A MILLIONAIRE!", Color::Yellow),
        Outcome::WalkedAway { .. } => ("YOU WALKED AWAY", Color::Cyan),
        Outcome::Wrong { .. } => ("GAME OVER", Color::Red),
    }
}

fn render_summary(frame: &mut Frame, area: Rect, outcome: Outcome) {
    let (headline, color) = outcome_headline(outcome);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(color).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("You take home {}", format_prize(outcome.winnings())),
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_details(frame: &mut Frame, area: Rect, session: &GameSession, outcome: Outcome) {
    let mut lines = vec![Line::from(Span::styled(
        format!("Questions answered: {}", session.completed()),
        Style::default().fg(Color::Gray),
    ))];

    if let Outcome::Wrong { choice, .. } = outcome {
        let question = session.current_question();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            question.text.as_str(),
            Style::default().fg(Color::White).bold(),
        )));
        lines.push(Line::from(vec![
            Span::styled("Your answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}. {}", OPTION_LABELS[choice], question.options[choice]),
                Style::default().fg(Color::Red),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Correct answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "{}. {}",
                    OPTION_LABELS[question.correct_answer],
                    question.correct_option()
                ),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::new(1, 1, 1, 0)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r play again  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
