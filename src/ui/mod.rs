mod ladder;
mod loading;
mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::models::AppState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Loading => loading::render(frame, area),
        AppState::Playing => quiz::render(frame, area, app),
        AppState::Finished => result::render(frame, area, app),
    }
}
