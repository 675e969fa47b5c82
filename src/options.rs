//! Turns a [`Question`] into the answer choices shown on its card.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::decode::decode_html_entities;
use crate::models::{AnswerOption, Question, QuestionKind};

const TRUE_LABEL: &str = "True";
const FALSE_LABEL: &str = "False";

/// Build the ordered options for `question`.
///
/// Multiple-choice options are decoded and shuffled with `rng`; true/false
/// options always come out as `[True, False]`.
pub fn build_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<AnswerOption> {
    match question.kind {
        QuestionKind::Multiple => {
            let mut options = Vec::with_capacity(question.incorrect_answers.len() + 1);
            options.push(AnswerOption::new(
                decode_html_entities(&question.correct_answer),
                true,
            ));
            options.extend(
                question
                    .incorrect_answers
                    .iter()
                    .map(|answer| AnswerOption::new(decode_html_entities(answer), false)),
            );
            options.shuffle(rng);
            options
        }
        QuestionKind::Boolean => vec![
            AnswerOption::new(TRUE_LABEL, question.correct_answer == TRUE_LABEL),
            AnswerOption::new(FALSE_LABEL, question.correct_answer == FALSE_LABEL),
        ],
        QuestionKind::Unknown => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_multiple_choice_keeps_every_answer() {
        let question = Question::multiple(
            "Q",
            "Caf&eacute;",
            &["Tea", "&quot;Milk&quot;", "Water"],
        );

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let options = build_options(&question, &mut rng);

            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);

            let correct = options.iter().find(|o| o.is_correct).unwrap();
            assert_eq!(correct.description, "Café");

            let mut descriptions: Vec<&str> =
                options.iter().map(|o| o.description.as_str()).collect();
            descriptions.sort_unstable();
            assert_eq!(descriptions, ["\"Milk\"", "Café", "Tea", "Water"]);
        }
    }

    #[test]
    fn test_multiple_choice_order_varies() {
        let question = Question::multiple("Q", "A", &["B", "C", "D"]);
        let positions: std::collections::HashSet<usize> = (0..100)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                build_options(&question, &mut rng)
                    .iter()
                    .position(|o| o.is_correct)
                    .unwrap()
            })
            .collect();
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn test_boolean_options() {
        let mut rng = StdRng::seed_from_u64(7);

        let options = build_options(&Question::boolean("Q", true), &mut rng);
        assert_eq!(
            options,
            vec![AnswerOption::new("True", true), AnswerOption::new("False", false)]
        );

        let options = build_options(&Question::boolean("Q", false), &mut rng);
        assert_eq!(
            options,
            vec![AnswerOption::new("True", false), AnswerOption::new("False", true)]
        );
    }

    #[test]
    fn test_unknown_kind_has_no_options() {
        let mut question = Question::multiple("Q", "A", &["B"]);
        question.kind = QuestionKind::Unknown;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(build_options(&question, &mut rng).is_empty());
    }

    #[test]
    fn test_malformed_boolean_has_no_correct_option() {
        let mut question = Question::boolean("Q", true);
        question.correct_answer = "Yes".to_string();
        let mut rng = StdRng::seed_from_u64(1);
        let options = build_options(&question, &mut rng);
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| !o.is_correct));
    }
}
