//! # trivia-quiz
//!
//! A terminal trivia quiz backed by the Open Trivia Database.
//!
//! Pick a category and a difficulty, the ten matching questions are fetched
//! in the background, then answer them page by page and see the final
//! score.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{OpenTdb, Trivia, TriviaError, DEFAULT_API_URL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TriviaError> {
//!     let source = OpenTdb::new(DEFAULT_API_URL, None).expect("HTTP client");
//!     Trivia::new(source).run().await
//! }
//! ```

mod app;
mod card;
mod decode;
mod error;
mod fetcher;
pub mod logging;
mod models;
mod options;
mod selector;
pub mod terminal;
mod ui;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

pub use app::{App, QuizSession, QuizStatus, SetupFocus};
pub use card::{AnswerCard, CardState};
pub use decode::decode_html_entities;
pub use error::{FetchError, QuizError, TriviaError};
pub use fetcher::{
    DEFAULT_API_URL, FetchOutcome, FetchRequest, Fetcher, OpenTdb, QUESTION_COUNT,
    QuestionSource, parse_response,
};
pub use models::{AnswerOption, Category, Difficulty, Question, QuestionKind};
pub use options::build_options;
pub use selector::{Choice, Selector};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A trivia quiz that can be run in the terminal.
pub struct Trivia<S> {
    app: App,
    source: S,
}

impl<S: QuestionSource> Trivia<S> {
    /// Create a quiz that loads its questions from `source`.
    pub fn new(source: S) -> Self {
        Self {
            app: App::new(),
            source,
        }
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal until the user quits. Must be called from
    /// a multi-threaded tokio runtime: fetches run on worker threads while
    /// this one waits for key presses.
    pub async fn run(mut self) -> Result<(), TriviaError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(self.source.clone(), tx);

        let mut session = terminal::TerminalSession::enter()?;
        log::info!("terminal ready");
        run_event_loop(session.terminal(), &mut self.app, &fetcher, &mut rx)
    }
}

/// What the loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum Control {
    Continue,
    Fetch(FetchRequest),
    Quit,
}

impl From<Option<FetchRequest>> for Control {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map_or(Control::Continue, Control::Fetch)
    }
}

fn run_event_loop<S: QuestionSource>(
    terminal: &mut terminal::TriviaTerminal,
    app: &mut App,
    fetcher: &Fetcher<S>,
    outcomes: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<(), TriviaError> {
    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply_fetch(outcome);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match handle_input(app, key.code) {
                Control::Continue => {}
                Control::Fetch(request) => {
                    fetcher.spawn(request);
                }
                Control::Quit => break,
            }
        }
    }

    log::info!("quitting");
    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) -> Control {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Control::Quit;
    }

    match app.status() {
        QuizStatus::Idle => handle_setup_input(app, key),
        QuizStatus::Active => handle_quiz_input(app, key),
        QuizStatus::Complete => handle_result_input(app, key),
    }
}

fn handle_setup_input(app: &mut App, key: KeyCode) -> Control {
    match key {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.toggle_focus();
            Control::Continue
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.highlight_previous();
            Control::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.highlight_next();
            Control::Continue
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_highlighted().into(),
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if let Err(e) = app.start_quiz() {
                log::debug!("cannot start: {}", e);
            }
            Control::Continue
        }
        _ => Control::Continue,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Control {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_option(index);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer();
        }
        KeyCode::Left | KeyCode::Char('h') => app.previous_page(),
        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
        _ => {}
    }
    Control::Continue
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Control {
    if matches!(key, KeyCode::Char('r') | KeyCode::Char('R')) {
        app.restart();
    }
    Control::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_app() -> (App, FetchRequest) {
        let mut app = App::with_seed(9);
        assert_eq!(handle_input(&mut app, KeyCode::Enter), Control::Continue);
        handle_input(&mut app, KeyCode::Tab);
        let Control::Fetch(request) = handle_input(&mut app, KeyCode::Enter) else {
            panic!("expected a fetch once both values are chosen");
        };
        (app, request)
    }

    #[test]
    fn test_setup_keys_issue_one_fetch() {
        let (app, request) = ready_app();
        assert_eq!(request.category, Category::GeneralKnowledge);
        assert_eq!(request.difficulty, Difficulty::Easy);
        assert!(app.is_loading());
    }

    #[test]
    fn test_full_keyboard_round() {
        let (mut app, request) = ready_app();
        let questions = (0..QUESTION_COUNT)
            .map(|i| Question::boolean(&format!("S{}", i), true))
            .collect();
        app.apply_fetch(FetchOutcome {
            request,
            result: Ok(questions),
        });

        handle_input(&mut app, KeyCode::Char('s'));
        assert_eq!(app.status(), QuizStatus::Active);

        for _ in 0..QUESTION_COUNT {
            handle_input(&mut app, KeyCode::Char('1'));
            handle_input(&mut app, KeyCode::Enter);
            handle_input(&mut app, KeyCode::Char('l'));
        }
        assert_eq!(app.status(), QuizStatus::Complete);
        assert_eq!(app.score(), QUESTION_COUNT);

        handle_input(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session(), &QuizSession::default());
    }

    #[test]
    fn test_q_quits_everywhere() {
        let mut app = App::with_seed(1);
        assert_eq!(handle_input(&mut app, KeyCode::Char('q')), Control::Quit);
    }
}
