use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::card::AnswerCard;
use crate::error::QuizError;
use crate::fetcher::{FetchOutcome, FetchRequest};
use crate::models::{Category, Difficulty, Question};
use crate::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizStatus {
    #[default]
    Idle,
    Active,
    Complete,
}

/// Which selector receives keys on the setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupFocus {
    #[default]
    Category,
    Difficulty,
}

/// State of one playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub questions: Vec<Question>,
    /// 1-based page currently shown.
    pub current_index: usize,
    pub score: usize,
    pub status: QuizStatus,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            category: None,
            difficulty: None,
            questions: Vec::new(),
            current_index: 1,
            score: 0,
            status: QuizStatus::Idle,
        }
    }
}

/// The quiz controller. Owns the session and everything the screens need,
/// and is only ever mutated from the UI loop.
pub struct App {
    session: QuizSession,
    cards: Vec<AnswerCard>,
    category_selector: Selector<Category>,
    difficulty_selector: Selector<Difficulty>,
    focus: SetupFocus,
    /// Generation of the newest request issued.
    generation: u64,
    /// Generation still waiting for its outcome.
    pending: Option<u64>,
    /// Selection the loaded questions were fetched for.
    loaded_for: Option<(Category, Difficulty)>,
    rng: StdRng,
}

impl App {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Controller with a fixed shuffle seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            session: QuizSession::default(),
            cards: Vec::new(),
            category_selector: Selector::new(),
            difficulty_selector: Selector::new(),
            focus: SetupFocus::default(),
            generation: 0,
            pending: None,
            loaded_for: None,
            rng,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn status(&self) -> QuizStatus {
        self.session.status
    }

    pub fn total_questions(&self) -> usize {
        self.session.questions.len()
    }

    pub fn current_page(&self) -> usize {
        self.session.current_index
    }

    pub fn score(&self) -> usize {
        self.session.score
    }

    pub fn cards(&self) -> &[AnswerCard] {
        &self.cards
    }

    pub fn current_card(&self) -> Option<&AnswerCard> {
        self.cards.get(self.session.current_index.checked_sub(1)?)
    }

    fn current_card_mut(&mut self) -> Option<&mut AnswerCard> {
        self.cards.get_mut(self.session.current_index.checked_sub(1)?)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Loaded questions belong to a different selection than the current
    /// one, typically because the newer fetch failed.
    pub fn questions_outdated(&self) -> bool {
        let selection = self.session.category.zip(self.session.difficulty);
        !self.session.questions.is_empty() && self.loaded_for != selection
    }

    /// Whether [`App::start_quiz`] would succeed.
    pub fn can_start(&self) -> bool {
        self.check_start().is_ok()
    }

    /// Why [`App::start_quiz`] would be refused, if it would.
    pub fn check_start(&self) -> Result<(), QuizError> {
        if self.session.status != QuizStatus::Idle {
            return Err(QuizError::AlreadyStarted);
        }
        if self.session.category.is_none() || self.session.difficulty.is_none() {
            return Err(QuizError::SelectionIncomplete);
        }
        if self.pending.is_some() {
            return Err(QuizError::QuestionsPending);
        }
        if self.session.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.questions_outdated() {
            return Err(QuizError::QuestionsOutdated);
        }
        Ok(())
    }

    // Selection

    pub fn set_category(&mut self, category: Category) -> Option<FetchRequest> {
        if !self.accepts_selection() || self.session.category == Some(category) {
            return None;
        }
        self.session.category = Some(category);
        self.category_selector.sync(Some(category));
        self.issue_fetch()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Option<FetchRequest> {
        if !self.accepts_selection() || self.session.difficulty == Some(difficulty) {
            return None;
        }
        self.session.difficulty = Some(difficulty);
        self.difficulty_selector.sync(Some(difficulty));
        self.issue_fetch()
    }

    fn accepts_selection(&self) -> bool {
        if self.session.status != QuizStatus::Idle {
            log::debug!("selection ignored while the quiz is {:?}", self.session.status);
            return false;
        }
        true
    }

    fn issue_fetch(&mut self) -> Option<FetchRequest> {
        let category = self.session.category?;
        let difficulty = self.session.difficulty?;

        self.generation += 1;
        self.pending = Some(self.generation);
        Some(FetchRequest {
            generation: self.generation,
            category,
            difficulty,
        })
    }

    /// Apply a finished fetch. Returns true if the question list changed.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { request, result } = outcome;

        if request.generation != self.generation {
            log::debug!(
                "dropping stale response for request #{} (newest is #{})",
                request.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(questions) => {
                log::info!(
                    "loaded {} questions for {} / {}",
                    questions.len(),
                    request.category,
                    request.difficulty
                );
                self.session.questions = questions;
                self.loaded_for = Some((request.category, request.difficulty));
                true
            }
            Err(e) => {
                log::warn!("failed to fetch questions: {}", e);
                false
            }
        }
    }

    pub fn focus(&self) -> SetupFocus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            SetupFocus::Category => SetupFocus::Difficulty,
            SetupFocus::Difficulty => SetupFocus::Category,
        };
    }

    pub fn category_selector(&self) -> &Selector<Category> {
        &self.category_selector
    }

    pub fn difficulty_selector(&self) -> &Selector<Difficulty> {
        &self.difficulty_selector
    }

    pub fn highlight_next(&mut self) {
        match self.focus {
            SetupFocus::Category => self.category_selector.highlight_next(),
            SetupFocus::Difficulty => self.difficulty_selector.highlight_next(),
        }
    }

    pub fn highlight_previous(&mut self) {
        match self.focus {
            SetupFocus::Category => self.category_selector.highlight_previous(),
            SetupFocus::Difficulty => self.difficulty_selector.highlight_previous(),
        }
    }

    /// Choose the highlighted entry of the focused selector.
    pub fn choose_highlighted(&mut self) -> Option<FetchRequest> {
        match self.focus {
            SetupFocus::Category => {
                let category = self.category_selector.choose(self.session.category)?;
                self.set_category(category)
            }
            SetupFocus::Difficulty => {
                let difficulty = self.difficulty_selector.choose(self.session.difficulty)?;
                self.set_difficulty(difficulty)
            }
        }
    }

    // Quiz

    pub fn start_quiz(&mut self) -> Result<(), QuizError> {
        self.check_start()?;

        self.cards = self
            .session
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| AnswerCard::new(i + 1, question, &mut self.rng))
            .collect();

        self.session.status = QuizStatus::Active;
        self.session.current_index = 1;
        self.session.score = 0;
        log::info!("quiz started with {} questions", self.session.questions.len());
        Ok(())
    }

    /// Count an answer. Completes the quiz when the last page is answered;
    /// never moves to another page.
    pub fn record_answer(&mut self, is_correct: bool) {
        if is_correct {
            self.session.score += 1;
        }
        if self.session.current_index == self.session.questions.len() {
            self.session.status = QuizStatus::Complete;
            log::info!(
                "quiz complete: {}/{}",
                self.session.score,
                self.session.questions.len()
            );
        }
    }

    pub fn select_option(&mut self, index: usize) -> bool {
        if self.session.status != QuizStatus::Active {
            return false;
        }
        self.current_card_mut()
            .is_some_and(|card| card.select(index))
    }

    pub fn select_next_option(&mut self) {
        if self.session.status == QuizStatus::Active {
            if let Some(card) = self.current_card_mut() {
                card.select_next();
            }
        }
    }

    pub fn select_previous_option(&mut self) {
        if self.session.status == QuizStatus::Active {
            if let Some(card) = self.current_card_mut() {
                card.select_previous();
            }
        }
    }

    /// Submit the current card. Returns the correctness when a submission
    /// happened.
    pub fn submit_answer(&mut self) -> Option<bool> {
        if self.session.status != QuizStatus::Active {
            return None;
        }
        let correct = self.current_card_mut()?.submit()?;
        self.record_answer(correct);
        Some(correct)
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), QuizError> {
        if self.session.status != QuizStatus::Active {
            return Err(QuizError::NotActive);
        }
        let total = self.session.questions.len();
        if page == 0 || page > total {
            return Err(QuizError::PageOutOfRange { page, total });
        }

        if page != self.session.current_index {
            if let Some(card) = self.current_card_mut() {
                card.clear_selection();
            }
            self.session.current_index = page;
        }
        Ok(())
    }

    pub fn next_page(&mut self) {
        let next = (self.session.current_index + 1).min(self.session.questions.len());
        let _ = self.go_to_page(next);
    }

    pub fn previous_page(&mut self) {
        let previous = self.session.current_index.saturating_sub(1).max(1);
        let _ = self.go_to_page(previous);
    }

    // Results

    /// Score as a percentage of the question count.
    pub fn score_percentage(&self) -> Option<f64> {
        let total = self.session.questions.len();
        if total == 0 {
            return None;
        }
        Some(self.session.score as f64 / total as f64 * 100.0)
    }

    pub fn formatted_percentage(&self) -> Option<String> {
        self.score_percentage()
            .map(|percentage| format!("{:.2}%", percentage))
    }

    /// Back to a fresh session. Responses still in flight are dropped.
    pub fn restart(&mut self) {
        self.session = QuizSession::default();
        self.cards.clear();
        self.category_selector.reset();
        self.difficulty_selector.reset();
        self.focus = SetupFocus::default();
        self.generation += 1;
        self.pending = None;
        self.loaded_for = None;
        log::info!("quiz restarted");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn boolean_questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::boolean(&format!("Statement {}", i + 1), true))
            .collect()
    }

    fn multiple_questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::multiple(&format!("Question {}", i + 1), "Right", &["W1", "W2", "W3"]))
            .collect()
    }

    /// Choose category 9 / easy and deliver `questions` for that request.
    fn loaded_app(questions: Vec<Question>) -> App {
        let mut app = App::with_seed(42);
        assert!(app.set_category(Category::GeneralKnowledge).is_none());
        let request = app.set_difficulty(Difficulty::Easy).unwrap();
        assert!(app.apply_fetch(FetchOutcome {
            request,
            result: Ok(questions),
        }));
        app
    }

    fn answer_current(app: &mut App, correct: bool) {
        let card = app.current_card().unwrap();
        let correct_index = card.options().iter().position(|o| o.is_correct).unwrap();
        let pick = if correct {
            correct_index
        } else {
            (correct_index + 1) % card.options().len()
        };
        assert!(app.select_option(pick));
        assert_eq!(app.submit_answer(), Some(correct));
    }

    #[test]
    fn test_fetch_issued_once_both_selected() {
        let mut app = App::with_seed(1);
        let mut requests = Vec::new();
        requests.extend(app.set_category(Category::from_id(9).unwrap()));
        requests.extend(app.set_difficulty(Difficulty::Easy));
        requests.extend(app.set_difficulty(Difficulty::Easy));

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].category.id(), 9);
        assert_eq!(requests[0].difficulty, Difficulty::Easy);
        assert!(app.is_loading());
    }

    #[test]
    fn test_changing_selection_refetches() {
        let mut app = loaded_app(boolean_questions(10));
        let request = app.set_category(Category::History).unwrap();
        assert_eq!(request.category, Category::History);
        assert_eq!(request.difficulty, Difficulty::Easy);
        assert_eq!(app.start_quiz(), Err(QuizError::QuestionsPending));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut app = App::with_seed(1);
        app.set_category(Category::GeneralKnowledge);
        let first = app.set_difficulty(Difficulty::Easy).unwrap();
        let second = app.set_difficulty(Difficulty::Hard).unwrap();

        assert!(app.apply_fetch(FetchOutcome {
            request: second,
            result: Ok(multiple_questions(10)),
        }));
        assert!(!app.apply_fetch(FetchOutcome {
            request: first,
            result: Ok(boolean_questions(3)),
        }));

        assert_eq!(app.total_questions(), 10);
        assert_eq!(app.session().questions[0].text, "Question 1");
        assert!(!app.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_questions() {
        let mut app = loaded_app(boolean_questions(10));
        let request = app.set_difficulty(Difficulty::Medium).unwrap();
        assert!(!app.apply_fetch(FetchOutcome {
            request,
            result: Err(FetchError::Api(5)),
        }));
        assert_eq!(app.total_questions(), 10);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_start_requires_selection_and_questions() {
        let mut app = App::with_seed(1);
        assert_eq!(app.start_quiz(), Err(QuizError::SelectionIncomplete));

        app.set_category(Category::Art);
        let request = app.set_difficulty(Difficulty::Hard).unwrap();
        app.apply_fetch(FetchOutcome {
            request,
            result: Ok(Vec::new()),
        });
        assert_eq!(app.start_quiz(), Err(QuizError::NoQuestions));
        assert_eq!(app.status(), QuizStatus::Idle);
    }

    #[test]
    fn test_failed_refetch_blocks_start_on_old_questions() {
        let mut app = loaded_app(boolean_questions(10));
        let request = app.set_category(Category::History).unwrap();
        app.apply_fetch(FetchOutcome {
            request,
            result: Err(FetchError::Api(1)),
        });

        assert_eq!(app.session().questions[0].text, "Statement 1");
        assert!(app.questions_outdated());
        assert!(!app.can_start());
        assert_eq!(app.start_quiz(), Err(QuizError::QuestionsOutdated));
        assert_eq!(app.status(), QuizStatus::Idle);

        // Going back to the selection the questions belong to allows a start
        // once that fetch lands too.
        let request = app.set_category(Category::GeneralKnowledge).unwrap();
        app.apply_fetch(FetchOutcome {
            request,
            result: Ok(multiple_questions(10)),
        });
        assert!(!app.questions_outdated());
        app.start_quiz().unwrap();
    }

    #[test]
    fn test_start_refused_once_running() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        answer_current(&mut app, true);

        assert!(!app.can_start());
        assert_eq!(app.start_quiz(), Err(QuizError::AlreadyStarted));
        assert_eq!(app.score(), 1);
        assert!(app.current_card().unwrap().is_answered());

        app.go_to_page(10).unwrap();
        answer_current(&mut app, true);
        assert_eq!(app.status(), QuizStatus::Complete);
        assert_eq!(app.start_quiz(), Err(QuizError::AlreadyStarted));
        assert_eq!(app.score(), 2);
    }

    #[test]
    fn test_start_quiz() {
        let mut app = loaded_app(boolean_questions(10));
        assert!(app.can_start());
        app.start_quiz().unwrap();

        assert_eq!(app.status(), QuizStatus::Active);
        assert_eq!(app.current_page(), 1);
        assert_eq!(app.score(), 0);
        assert_eq!(app.cards().len(), 10);
    }

    #[test]
    fn test_record_answer_sequence() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();

        let answers = [true, false, true, true, false, true, false, false, true, true];
        for (i, correct) in answers.iter().enumerate() {
            app.go_to_page(i + 1).unwrap();
            app.record_answer(*correct);
            let expected = if i == 9 {
                QuizStatus::Complete
            } else {
                QuizStatus::Active
            };
            assert_eq!(app.status(), expected);
        }

        assert_eq!(app.score(), 6);
    }

    #[test]
    fn test_record_answer_does_not_advance() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        app.record_answer(true);
        assert_eq!(app.current_page(), 1);
    }

    #[test]
    fn test_go_to_page_bounds() {
        let mut app = loaded_app(boolean_questions(10));
        assert_eq!(app.go_to_page(1), Err(QuizError::NotActive));

        app.start_quiz().unwrap();
        assert_eq!(
            app.go_to_page(0),
            Err(QuizError::PageOutOfRange { page: 0, total: 10 })
        );
        assert_eq!(
            app.go_to_page(11),
            Err(QuizError::PageOutOfRange { page: 11, total: 10 })
        );
        assert_eq!(app.current_page(), 1);

        app.go_to_page(10).unwrap();
        app.next_page();
        assert_eq!(app.current_page(), 10);
        app.go_to_page(1).unwrap();
        app.previous_page();
        assert_eq!(app.current_page(), 1);
    }

    #[test]
    fn test_revisited_question_cannot_be_resubmitted() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        answer_current(&mut app, true);

        app.next_page();
        app.previous_page();

        assert!(app.current_card().unwrap().is_answered());
        assert!(!app.select_option(1));
        assert_eq!(app.submit_answer(), None);
        assert_eq!(app.score(), 1);
    }

    #[test]
    fn test_leaving_a_page_clears_uncommitted_selection() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        app.select_option(0);
        app.next_page();
        app.previous_page();
        assert_eq!(app.current_card().unwrap().selected(), None);
    }

    #[test]
    fn test_submit_without_selection_changes_nothing() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        assert_eq!(app.submit_answer(), None);
        assert_eq!(app.score(), 0);
        assert_eq!(app.status(), QuizStatus::Active);
    }

    #[test]
    fn test_all_boolean_correct_scores_full() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        for _ in 0..10 {
            answer_current(&mut app, true);
            app.next_page();
        }

        assert_eq!(app.status(), QuizStatus::Complete);
        assert_eq!(app.score(), 10);
        assert_eq!(app.total_questions(), 10);
        assert_eq!(app.formatted_percentage().as_deref(), Some("100.00%"));
    }

    #[test]
    fn test_four_of_ten_multiple_choice() {
        let mut app = loaded_app(multiple_questions(10));
        app.start_quiz().unwrap();
        for i in 0..10 {
            answer_current(&mut app, i < 4);
            app.next_page();
        }

        assert_eq!(app.status(), QuizStatus::Complete);
        assert_eq!(app.score(), 4);
        assert_eq!(app.formatted_percentage().as_deref(), Some("40.00%"));
    }

    #[test]
    fn test_percentage_without_questions() {
        let app = App::with_seed(1);
        assert_eq!(app.score_percentage(), None);
        assert_eq!(app.formatted_percentage(), None);
    }

    #[test]
    fn test_selection_locked_during_quiz() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        assert!(app.set_category(Category::Sports).is_none());
        assert_eq!(app.session().category, Some(Category::GeneralKnowledge));
    }

    #[test]
    fn test_restart_matches_fresh_session() {
        let mut app = loaded_app(boolean_questions(10));
        app.start_quiz().unwrap();
        answer_current(&mut app, true);
        app.go_to_page(10).unwrap();
        answer_current(&mut app, false);
        assert_eq!(app.status(), QuizStatus::Complete);

        app.restart();

        assert_eq!(app.session(), &QuizSession::default());
        assert!(app.cards().is_empty());
        assert!(!app.is_loading());
        assert_eq!(app.focus(), SetupFocus::Category);
    }

    #[test]
    fn test_restart_drops_in_flight_response() {
        let mut app = App::with_seed(1);
        app.set_category(Category::Animals);
        let request = app.set_difficulty(Difficulty::Medium).unwrap();
        app.restart();

        assert!(!app.apply_fetch(FetchOutcome {
            request,
            result: Ok(boolean_questions(10)),
        }));
        assert!(app.session().questions.is_empty());
    }

    #[test]
    fn test_choose_highlighted_uses_focus() {
        let mut app = App::with_seed(1);
        assert!(app.choose_highlighted().is_none());
        assert_eq!(app.session().category, Some(Category::GeneralKnowledge));

        app.toggle_focus();
        app.highlight_next();
        let request = app.choose_highlighted().unwrap();
        assert_eq!(request.difficulty, Difficulty::Medium);
        assert!(app.choose_highlighted().is_none());
    }
}
