//! # Quiz Engine
//!
//! 选择题题库的校验、乱序与判分引擎
//!
//! ## 架构设计
//!
//! 本库分为三层，展示层（页面渲染、文件选择、对话框）不在本库范围内，
//! 只通过很窄的接口调用：
//!
//! ### ① 数据层（Models）
//! - `models/` - 强类型的题库文档与出题选项
//! - `loaders` - 文本 / 字节 / 文件 / 内置题库 → 结构化数据
//!
//! ### ② 能力层（Services）
//! - `SchemaValidator` - 校验不可信的文档，给出具体位置的诊断
//! - `ShuffleEngine` - Fisher-Yates 乱序，不修改原序列
//! - `grading` - 选项集合完全相同才算对
//!
//! ### ③ 流程层（Workflow）
//! - `QuizModel` - 源文档（判分依据）+ 展示顺序（只用于渲染）
//! - `ResponseSheet` - 收集用户的选择
//! - `QuizSession` - 加载边界，失败时保留上一次的模型
//!
//! ## 数据流
//!
//! ```text
//! 原始文档 → SchemaValidator → QuizDocument → ShuffleEngine → QuizModel
//!     → 展示层渲染 → ResponseSheet → grading → GradeReport
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{
    FileError, Location, ParseError, QuizError, QuizResult, SubmissionError, ValidationError,
};
pub use models::{Answer, AnswerKey, AnswerSet, Question, QuestionId, QuizDocument, QuizOptions};
pub use services::{grade, grade_letters, validate, GradeReport, SchemaValidator, ShuffleEngine};
pub use workflow::{load_quiz, QuizModel, QuizSession, QuizSource, ResponseSheet};
