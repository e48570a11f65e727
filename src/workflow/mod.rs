pub mod quiz_model;
pub mod quiz_session;
pub mod response_sheet;

pub use quiz_model::{AnswerView, PresentedQuestion, QuestionView, QuizModel};
pub use quiz_session::{load_quiz, QuizSession, QuizSource};
pub use response_sheet::ResponseSheet;
