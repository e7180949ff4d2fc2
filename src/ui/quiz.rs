use ratatui::{
    prelude::*,
    widgets::{Block, Padding, Paragraph, Wrap},
};

use super::ladder;
use crate::app::{App, OPTION_LABELS};
use crate::game::{GameSession, Lifeline, Turn};

const LADDER_WIDTH: u16 = 22;
const POLL_BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.session() else {
        return;
    };

    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Length(LADDER_WIDTH)])
        .margin(1)
        .split(area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .horizontal_margin(1)
    .split(columns[0]);

    render_header(frame, chunks[0], app, session);
    render_question_text(frame, chunks[1], &session.current_question().text);
    render_options(frame, chunks[2], session, app.selected_option());
    render_lifeline_results(frame, chunks[3], session);
    render_notice(frame, chunks[4], app, session);
    render_controls(frame, chunks[5], session.turn());

    ladder::render(frame, columns[1], session);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, session: &GameSession) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let lifelines: Vec<Span> = Lifeline::ALL
        .iter()
        .enumerate()
        .flat_map(|(index, &lifeline)| {
            let style = if session.lifeline_available(lifeline) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray).crossed_out()
            };
            [
                Span::styled(format!("[{}] {}", index + 1, lifeline.label()), style),
                Span::raw("  "),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(lifelines)), halves[0]);

    let question = session.current_question();
    let mut progress = format!(
        "{}  ·  {}  ·  {}/{}",
        question.category,
        question.difficulty,
        session.question_number(),
        session.total_questions()
    );
    if let Some(origin) = app.origin() {
        progress.push_str(&format!("  ·  {}", origin.label()));
    }
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &GameSession, selected: usize) {
    let question = session.current_question();
    let turn = session.turn();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let hidden = session.is_hidden(index);
        let style = option_style(turn, index, selected, question.correct_answer, hidden);
        let marker = if index == selected && !hidden { ">" } else { " " };
        let text = if hidden { "" } else { option.as_str() };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(text, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn option_style(turn: Turn, index: usize, selected: usize, correct: usize, hidden: bool) -> Style {
    if hidden {
        return Style::default().fg(Color::DarkGray);
    }

    match turn {
        Turn::Revealed { .. } if index == correct => Style::default().fg(Color::Green).bold(),
        Turn::Confirming { choice } if index == choice => {
            Style::default().fg(Color::Black).bg(Color::Yellow).bold()
        }
        Turn::Selecting if index == selected => Style::default().fg(Color::Cyan).bold(),
        _ => Style::default().fg(Color::Gray),
    }
}

fn render_lifeline_results(frame: &mut Frame, area: Rect, session: &GameSession) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(poll) = session.poll() {
        lines.push(Line::from(Span::styled(
            "Audience",
            Style::default().fg(Color::Cyan).bold(),
        )));
        for (index, &votes) in poll.votes.iter().enumerate() {
            let filled = usize::from(votes) * POLL_BAR_WIDTH / 100;
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", OPTION_LABELS[index]),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
                Span::styled(
                    "░".repeat(POLL_BAR_WIDTH - filled),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!(" {:>3}%", votes), Style::default().fg(Color::Gray)),
            ]));
        }
    }

    if let Some(advice) = session.advice() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled("Friend  ", Style::default().fg(Color::Cyan).bold()),
            Span::styled(
                format!("{} ({}% sure)", OPTION_LABELS[advice.choice], advice.confidence),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App, session: &GameSession) {
    let (text, color) = match session.turn() {
        Turn::Confirming { choice } => (
            format!("Final answer {}? enter to confirm · esc to change", OPTION_LABELS[choice]),
            Color::Yellow,
        ),
        _ => match app.notice() {
            Some(notice) => (notice.to_string(), Color::Yellow),
            None => return,
        },
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .fg(color);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, turn: Turn) {
    let text = match turn {
        Turn::Selecting => "j/k navigate  ·  enter lock in  ·  1-3 lifelines  ·  w walk away  ·  q quit",
        Turn::Confirming { .. } => "enter confirm  ·  esc change  ·  q quit",
        Turn::Revealed { .. } => "enter next question  ·  q quit",
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
