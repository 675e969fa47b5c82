use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, SetupFocus};
use crate::error::QuizError;
use crate::selector::{Choice, Selector};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);

    let columns = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .spacing(2)
        .split(chunks[1]);

    render_selector(
        frame,
        columns[0],
        " Category ",
        app.category_selector(),
        app.session().category,
        app.focus() == SetupFocus::Category,
    );
    render_selector(
        frame,
        columns[1],
        " Difficulty ",
        app.difficulty_selector(),
        app.session().difficulty,
        app.focus() == SetupFocus::Difficulty,
    );

    render_start(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(Line::from(Span::styled(
        "TRIVIA QUIZ",
        Style::default().fg(Color::Cyan).bold(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_selector<T: Choice>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    selector: &Selector<T>,
    chosen: Option<T>,
    focused: bool,
) {
    let highlighted = selector.highlighted_index();

    let lines: Vec<Line> = selector
        .choices()
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let is_highlighted = focused && index == highlighted;
            let is_chosen = chosen == Some(*choice);

            let style = if is_highlighted {
                Style::default().fg(Color::Yellow).bold()
            } else if is_chosen {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_highlighted { ">" } else { " " };
            let radio = if is_chosen { "(•)" } else { "( )" };

            Line::from(vec![
                Span::styled(format!("{} {} ", marker, radio), style),
                Span::styled(choice.label(), style),
            ])
        })
        .collect();

    // Keep the highlighted row inside the visible part of the list.
    let visible_rows = area.height.saturating_sub(2) as usize;
    let scroll = if visible_rows == 0 {
        0
    } else {
        highlighted.saturating_sub(visible_rows - 1)
    };

    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_color)
                .title(title.to_string())
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_start(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.check_start() {
        Ok(()) => Line::from(vec![
            Span::styled("[ START ]", Style::default().fg(Color::Green).bold()),
            Span::styled(
                format!("  {} questions ready  ·  press s", app.total_questions()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Err(QuizError::QuestionsPending) => Line::from(Span::styled(
            "Loading questions...",
            Style::default().fg(Color::Yellow),
        )),
        Err(QuizError::NoQuestions | QuizError::QuestionsOutdated) => Line::from(Span::styled(
            "Could not load questions for this selection, try another",
            Style::default().fg(Color::Red),
        )),
        Err(_) => Line::from(Span::styled(
            "[ START ]  choose a category and a difficulty",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("tab switch list  ·  j/k navigate  ·  enter choose  ·  s start  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::error::FetchError;
    use crate::fetcher::FetchOutcome;
    use crate::models::{Category, Difficulty, Question};

    use super::*;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| crate::ui::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_start_line_follows_fetch_state() {
        let mut app = App::with_seed(3);
        assert!(draw(&app).contains("choose a category and a difficulty"));

        app.set_category(Category::GeneralKnowledge);
        let request = app.set_difficulty(Difficulty::Easy).unwrap();
        assert!(draw(&app).contains("Loading questions..."));

        let questions = (0..10).map(|i| Question::boolean(&format!("S{}", i), true)).collect();
        app.apply_fetch(FetchOutcome {
            request,
            result: Ok(questions),
        });
        assert!(draw(&app).contains("10 questions ready"));

        let request = app.set_category(Category::History).unwrap();
        app.apply_fetch(FetchOutcome {
            request,
            result: Err(FetchError::Api(1)),
        });
        let text = draw(&app);
        assert!(text.contains("Could not load questions for this selection"));
        assert!(!text.contains("questions ready"));
    }
}
