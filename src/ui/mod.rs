mod quiz;
mod result;
mod setup;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, QuizStatus};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.status() {
        QuizStatus::Idle => setup::render(frame, area, app),
        QuizStatus::Active => quiz::render(frame, area, app),
        QuizStatus::Complete => result::render(frame, area, app),
    }
}
