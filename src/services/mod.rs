pub mod grading;
pub mod shuffle;
pub mod validator;

pub use grading::{expected_keys, grade, grade_letters, grade_sheet, GradeReport};
pub use shuffle::{fisher_yates, ShuffleEngine};
pub use validator::{validate, SchemaValidator, ValidationPolicy};
