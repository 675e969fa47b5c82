//! Per-question answer state.

use rand::Rng;

use crate::decode::decode_html_entities;
use crate::models::{AnswerOption, Question};
use crate::options::build_options;

/// Where a card is in its single-submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Unanswered,
    Answered { correct: bool },
}

/// One question as displayed: decoded title, built options, the current
/// selection and whether it has been submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCard {
    number: usize,
    title: String,
    options: Vec<AnswerOption>,
    selected: Option<usize>,
    state: CardState,
}

impl AnswerCard {
    /// `number` is the 1-based page the card is shown on.
    pub fn new<R: Rng + ?Sized>(number: usize, question: &Question, rng: &mut R) -> Self {
        Self {
            number,
            title: decode_html_entities(&question.text),
            options: build_options(question, rng),
            selected: None,
            state: CardState::Unanswered,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.state, CardState::Answered { .. })
    }

    /// Record `index` as the chosen option. Returns false once answered or
    /// for an index with no option.
    pub fn select(&mut self, index: usize) -> bool {
        if self.is_answered() || index >= self.options.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1) % self.options.len());
        self.select(next);
    }

    pub fn select_previous(&mut self) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        let previous = self.selected.map_or(len - 1, |i| (i + len - 1) % len);
        self.select(previous);
    }

    /// Drop a selection that was never submitted.
    pub fn clear_selection(&mut self) {
        if !self.is_answered() {
            self.selected = None;
        }
    }

    /// Submit the current selection, returning whether it was correct.
    ///
    /// Returns `None` without a selection or when already answered.
    pub fn submit(&mut self) -> Option<bool> {
        if self.is_answered() {
            log::debug!("question {} already answered", self.number);
            return None;
        }
        let Some(selected) = self.selected else {
            log::debug!("no option selected for question {}", self.number);
            return None;
        };

        let correct_index = self.options.iter().position(|option| option.is_correct);
        let correct = correct_index == Some(selected);
        self.state = CardState::Answered { correct };
        Some(correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn boolean_card(correct: bool) -> AnswerCard {
        let mut rng = StdRng::seed_from_u64(0);
        AnswerCard::new(1, &Question::boolean("Is &quot;this&quot; true?", correct), &mut rng)
    }

    #[test]
    fn test_title_is_decoded() {
        assert_eq!(boolean_card(true).title(), "Is \"this\" true?");
    }

    #[test]
    fn test_submit_without_selection_is_noop() {
        let mut card = boolean_card(true);
        assert_eq!(card.submit(), None);
        assert_eq!(card.state(), CardState::Unanswered);
    }

    #[test]
    fn test_last_selection_counts() {
        let mut card = boolean_card(true);
        assert!(card.select(1));
        assert!(card.select(0));
        assert_eq!(card.submit(), Some(true));
        assert_eq!(card.state(), CardState::Answered { correct: true });
    }

    #[test]
    fn test_wrong_answer() {
        let mut card = boolean_card(true);
        card.select(1);
        assert_eq!(card.submit(), Some(false));
        assert_eq!(card.state(), CardState::Answered { correct: false });
    }

    #[test]
    fn test_answered_card_is_locked() {
        let mut card = boolean_card(false);
        card.select(1);
        assert_eq!(card.submit(), Some(true));

        assert!(!card.select(0));
        card.clear_selection();
        assert_eq!(card.selected(), Some(1));
        assert_eq!(card.submit(), None);
        assert_eq!(card.state(), CardState::Answered { correct: true });
    }

    #[test]
    fn test_select_out_of_range() {
        let mut card = boolean_card(true);
        assert!(!card.select(2));
        assert_eq!(card.selected(), None);
    }

    #[test]
    fn test_keyboard_selection_wraps() {
        let mut card = boolean_card(true);
        card.select_previous();
        assert_eq!(card.selected(), Some(1));
        card.select_next();
        assert_eq!(card.selected(), Some(0));
        card.select_next();
        assert_eq!(card.selected(), Some(1));
    }

    #[test]
    fn test_multiple_choice_scores_by_correct_index() {
        let mut rng = StdRng::seed_from_u64(3);
        let question = Question::multiple("Q", "Right", &["W1", "W2", "W3"]);
        let mut card = AnswerCard::new(4, &question, &mut rng);
        let correct = card.options().iter().position(|o| o.is_correct).unwrap();

        card.select(correct);
        assert_eq!(card.submit(), Some(true));
        assert_eq!(card.number(), 4);
    }
}
