//! Error types.

use std::fmt;
use std::io;

/// Failure while fetching a question batch.
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status.
    Http(reqwest::Error),
    /// Body was not the expected JSON.
    Decode(serde_json::Error),
    /// Provider answered with a non-zero `response_code`.
    Api(u8),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "request failed: {}", e),
            FetchError::Decode(e) => write!(f, "invalid response body: {}", e),
            FetchError::Api(code) => write!(f, "provider returned code {} ({})", code, api_code_reason(*code)),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http(e) => Some(e),
            FetchError::Decode(e) => Some(e),
            FetchError::Api(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err)
    }
}

fn api_code_reason(code: u8) -> &'static str {
    match code {
        1 => "not enough questions for this query",
        2 => "invalid parameter",
        3 => "token not found",
        4 => "token exhausted",
        5 => "rate limited",
        _ => "unknown",
    }
}

/// A controller operation that is not valid in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// Category or difficulty has not been chosen.
    SelectionIncomplete,
    /// A fetch for the current selection has not come back yet.
    QuestionsPending,
    /// No questions are loaded.
    NoQuestions,
    /// The loaded questions were fetched for another selection.
    QuestionsOutdated,
    /// A quiz is already running or finished.
    AlreadyStarted,
    /// The operation needs an active quiz.
    NotActive,
    PageOutOfRange { page: usize, total: usize },
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::SelectionIncomplete => write!(f, "choose a category and a difficulty first"),
            QuizError::QuestionsPending => write!(f, "questions are still loading"),
            QuizError::NoQuestions => write!(f, "no questions loaded"),
            QuizError::QuestionsOutdated => {
                write!(f, "loaded questions do not match the current selection")
            }
            QuizError::AlreadyStarted => write!(f, "a quiz has already been started"),
            QuizError::NotActive => write!(f, "no quiz in progress"),
            QuizError::PageOutOfRange { page, total } => {
                write!(f, "page {} is outside 1..={}", page, total)
            }
        }
    }
}

impl std::error::Error for QuizError {}

/// Error running the terminal application.
#[derive(Debug)]
pub enum TriviaError {
    /// Terminal IO failure.
    Io(io::Error),
    /// A global logger was already installed.
    Logging(String),
}

impl fmt::Display for TriviaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriviaError::Io(e) => write!(f, "IO error: {}", e),
            TriviaError::Logging(e) => write!(f, "Failed to set up logging: {}", e),
        }
    }
}

impl std::error::Error for TriviaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TriviaError::Io(e) => Some(e),
            TriviaError::Logging(_) => None,
        }
    }
}

impl From<io::Error> for TriviaError {
    fn from(err: io::Error) -> Self {
        TriviaError::Io(err)
    }
}

impl From<log::SetLoggerError> for TriviaError {
    fn from(err: log::SetLoggerError) -> Self {
        TriviaError::Logging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = FetchError::Api(5);
        assert_eq!(err.to_string(), "provider returned code 5 (rate limited)");
    }

    #[test]
    fn test_page_error_message() {
        let err = QuizError::PageOutOfRange { page: 11, total: 10 };
        assert_eq!(err.to_string(), "page 11 is outside 1..=10");
    }
}
