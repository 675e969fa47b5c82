use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::card::CardState;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app);
    render_question_breakdown(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, app: &App) {
    let grade_color = app.score_percentage().map_or(Color::Gray, get_grade_color);
    let percentage = app
        .formatted_percentage()
        .unwrap_or_else(|| "-".to_string());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETE!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Your Score: {}/{} ({})",
                app.score(),
                app.total_questions(),
                percentage
            ),
            Style::default().fg(grade_color).bold(),
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

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .cards()
        .iter()
        .map(|card| {
            let (symbol, color) = match card.state() {
                CardState::Answered { correct: true } => ("+", Color::Green),
                CardState::Answered { correct: false } => ("-", Color::Red),
                CardState::Unanswered => ("·", Color::DarkGray),
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", card.number()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_question(card.title()), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::fetcher::FetchOutcome;
    use crate::models::{Category, Difficulty, Question};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_completion_screen_shows_score() {
        let mut app = App::with_seed(5);
        app.set_category(Category::GeneralKnowledge);
        let request = app.set_difficulty(Difficulty::Easy).unwrap();
        let questions = (0..10)
            .map(|i| Question::boolean(&format!("Statement {}", i + 1), true))
            .collect();
        app.apply_fetch(FetchOutcome {
            request,
            result: Ok(questions),
        });
        app.start_quiz().unwrap();
        for page in 1..=10 {
            app.go_to_page(page).unwrap();
            app.select_option(if page <= 4 { 0 } else { 1 });
            app.submit_answer();
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| crate::ui::render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("QUIZ COMPLETE!"));
        assert!(text.contains("Your Score: 4/10 (40.00%)"));
    }

    #[test]
    fn test_truncate_question() {
        let long = "x".repeat(60);
        assert_eq!(truncate_question(&long).chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }
}
