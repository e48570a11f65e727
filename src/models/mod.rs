pub mod loaders;
pub mod options;
pub mod quiz;

pub use loaders::{
    load_all_quiz_files, load_preset, load_quiz_file, parse_json, parse_json_bytes, parse_toml,
    preset_names, preset_source, DocumentFormat,
};
pub use options::QuizOptions;
pub use quiz::{Answer, AnswerKey, AnswerSet, Question, QuestionId, QuizDocument, MAX_ANSWERS};
