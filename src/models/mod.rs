pub mod answer;
pub mod question;

pub use answer::{AnswerLetter, AnswerMap, FilledSet};
pub use question::{QuestionItem, QuestionSet};
