use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::card::{AnswerCard, CardState};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(card) = app.current_card() else {
        let waiting = Paragraph::new("No question to show")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Min(6),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], card);
    render_options(frame, chunks[2], card);
    render_pager(frame, chunks[3], app);
    render_controls(frame, chunks[4], card.is_answered());
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let selection = match (session.category, session.difficulty) {
        (Some(category), Some(difficulty)) => format!("{}  ·  {}", category, difficulty),
        _ => String::new(),
    };

    let line = Line::from(vec![
        Span::styled(
            format!("Question {} of {}", app.current_page(), app.total_questions()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(format!("   {}", selection), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, card: &AnswerCard) {
    let widget = Paragraph::new(card.title())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, card: &AnswerCard) {
    let state = card.state();
    let selected = card.selected();

    let mut lines: Vec<Line> = Vec::with_capacity(card.options().len() * 2);
    for (index, option) in card.options().iter().enumerate() {
        let is_selected = selected == Some(index);
        let style = match state {
            CardState::Unanswered if is_selected => Style::default().fg(Color::Yellow).bold(),
            CardState::Unanswered => Style::default().fg(Color::White),
            CardState::Answered { .. } if option.is_correct => {
                Style::default().fg(Color::Green).bold()
            }
            CardState::Answered { .. } if is_selected => Style::default().fg(Color::Red).bold(),
            CardState::Answered { .. } => Style::default().fg(Color::DarkGray),
        };
        let radio = if is_selected { "(•)" } else { "( )" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", radio), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option.description.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let (title, color) = match state {
        CardState::Unanswered => (" Options ", Color::DarkGray),
        CardState::Answered { correct: true } => (" Correct! ", Color::Green),
        CardState::Answered { correct: false } => (" Incorrect ", Color::Red),
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
            .title_style(Style::default().fg(color).bold())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_pager(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.current_page();
    let mut spans = vec![Span::styled("‹ ", Style::default().fg(Color::DarkGray))];

    for card in app.cards() {
        let page = card.number();
        let base = match card.state() {
            CardState::Unanswered => Style::default().fg(Color::Gray),
            CardState::Answered { correct: true } => Style::default().fg(Color::Green),
            CardState::Answered { correct: false } => Style::default().fg(Color::Red),
        };
        let span = if page == current {
            Span::styled(format!("[{}]", page), base.bold().reversed())
        } else {
            Span::styled(format!(" {} ", page), base)
        };
        spans.push(span);
    }
    spans.push(Span::styled(" ›", Style::default().fg(Color::DarkGray)));

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, answered: bool) {
    let text = if answered {
        "h/l change question  ·  q quit"
    } else {
        "j/k or 1-9 select  ·  enter submit  ·  h/l change question  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
