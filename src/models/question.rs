use serde::Deserialize;

/// How a question expects to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Multiple,
    Boolean,
    /// Any `type` tag the provider may add later.
    #[serde(other)]
    Unknown,
}

/// One trivia item as returned by the provider. Text fields are still
/// HTML-entity-escaped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
}

impl Question {
    pub fn multiple(text: &str, correct: &str, incorrect: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            kind: QuestionKind::Multiple,
            correct_answer: correct.to_string(),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
            category: String::new(),
            difficulty: String::new(),
        }
    }

    pub fn boolean(text: &str, correct: bool) -> Self {
        let (correct, incorrect) = if correct {
            ("True", "False")
        } else {
            ("False", "True")
        };
        Self {
            text: text.to_string(),
            kind: QuestionKind::Boolean,
            correct_answer: correct.to_string(),
            incorrect_answers: vec![incorrect.to_string()],
            category: String::new(),
            difficulty: String::new(),
        }
    }
}

/// A selectable answer derived from a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub description: String,
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(description: impl Into<String>, is_correct: bool) -> Self {
        Self {
            description: description.into(),
            is_correct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_question() {
        let json = r#"{
            "type": "multiple",
            "difficulty": "easy",
            "category": "General Knowledge",
            "question": "What is the capital of France?",
            "correct_answer": "Paris",
            "incorrect_answers": ["Lyon", "Nice", "Lille"]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind, QuestionKind::Multiple);
        assert_eq!(question.text, "What is the capital of France?");
        assert_eq!(question.incorrect_answers.len(), 3);
        assert_eq!(question.category, "General Knowledge");
    }

    #[test]
    fn test_unknown_type_does_not_fail() {
        let json = r#"{
            "type": "ordering",
            "question": "Sort these",
            "correct_answer": "a",
            "incorrect_answers": []
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind, QuestionKind::Unknown);
    }
}
