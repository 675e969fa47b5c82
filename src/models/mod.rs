mod category;
mod question;

pub use category::{Category, Difficulty};
pub use question::{AnswerOption, Question, QuestionKind};
