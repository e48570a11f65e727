//! 题库会话 - 加载边界
//!
//! 原始输入 → 解析 → 校验 → 模型。任何失败都转换成 [`QuizError`]，
//! 会话保持上一次成功加载的模型不变。

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{QuizError, QuizResult};
use crate::models::loaders::{
    load_all_quiz_files, load_preset, load_quiz_file, parse_json, parse_json_bytes,
};
use crate::models::quiz::QuizDocument;
use crate::models::QuizOptions;
use crate::services::grading::GradeReport;
use crate::services::shuffle::ShuffleEngine;
use crate::services::validator::SchemaValidator;
use crate::utils::logging::{log_grade_summary, log_quiz_loaded};
use crate::workflow::quiz_model::QuizModel;
use crate::workflow::response_sheet::ResponseSheet;

/// 题库来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizSource {
    /// 内置题库名称
    Preset(String),
    /// JSON 文本
    Text(String),
    /// 上传的文件内容（JSON）
    Bytes(Vec<u8>),
    /// 本地文件（.json / .toml）
    File(PathBuf),
}

impl fmt::Display for QuizSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizSource::Preset(name) => write!(f, "内置题库 {}", name),
            QuizSource::Text(text) => write!(f, "文本 ({} 字节)", text.len()),
            QuizSource::Bytes(bytes) => write!(f, "上传内容 ({} 字节)", bytes.len()),
            QuizSource::File(path) => write!(f, "文件 {}", path.display()),
        }
    }
}

/// 加载题库并生成新的模型
pub async fn load_quiz<R: Rng>(
    source: &QuizSource,
    validator: &SchemaValidator,
    options: QuizOptions,
    engine: &mut ShuffleEngine<R>,
) -> QuizResult<QuizModel> {
    let document = match source {
        QuizSource::Preset(name) => load_preset(name, validator)?,
        QuizSource::Text(text) => validator.validate(&parse_json(text)?)?,
        QuizSource::Bytes(bytes) => validator.validate(&parse_json_bytes(bytes)?)?,
        QuizSource::File(path) => load_quiz_file(path, validator).await?,
    };
    Ok(QuizModel::build(document, options, engine))
}

/// 题库会话
///
/// 同一时间只持有一个模型；新的加载成功后整体替换旧模型
pub struct QuizSession<R = StdRng> {
    validator: SchemaValidator,
    engine: ShuffleEngine<R>,
    current: Option<QuizModel>,
}

impl QuizSession<StdRng> {
    /// 根据配置创建会话
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.validator(), ShuffleEngine::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn new(validator: SchemaValidator, engine: ShuffleEngine<R>) -> Self {
        Self {
            validator,
            engine,
            current: None,
        }
    }

    /// 加载题库
    ///
    /// 失败时记录错误并原样返回，之前的模型保持不变
    pub async fn load(&mut self, source: QuizSource, options: QuizOptions) -> QuizResult<&QuizModel> {
        info!("📥 正在加载 {}", source);
        match load_quiz(&source, &self.validator, options, &mut self.engine).await {
            Ok(model) => {
                log_quiz_loaded(&source.to_string(), &model);
                Ok(&*self.current.insert(model))
            }
            Err(e) => {
                error!("❌ 加载 {} 失败: {}", source, e);
                Err(e)
            }
        }
    }

    /// 扫描题库目录，返回其中能通过校验的题库文件
    ///
    /// 使用会话自己的校验策略，坏文件只记录警告
    pub async fn scan_folder(&self, folder: &str) -> anyhow::Result<Vec<(PathBuf, QuizDocument)>> {
        load_all_quiz_files(folder, &self.validator).await
    }

    pub fn current(&self) -> Option<&QuizModel> {
        self.current.as_ref()
    }

    /// 当前模型的空白答卷
    pub fn response_sheet(&self) -> Option<ResponseSheet> {
        self.current.as_ref().map(QuizModel::response_sheet)
    }

    /// 判分
    ///
    /// 答卷必须来自当前模型；重新加载之后需要重新获取答卷
    pub fn grade(&self, sheet: &ResponseSheet) -> QuizResult<GradeReport> {
        let model = self.current.as_ref().ok_or(QuizError::NoQuizLoaded)?;
        let report = model.grade(sheet)?;
        log_grade_summary(&report);
        Ok(report)
    }

    /// 丢弃当前题库
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            info!("🗑️ 已清除当前题库");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SubmissionError, ValidationError};

    const ONE_QUESTION: &str = r#"{"1": {"title": "Q1", "answers": {"a": {"answer": "X", "correct": true}, "b": {"answer": "Y", "correct": false}}, "multiSelect": false}}"#;

    fn session() -> QuizSession<StdRng> {
        QuizSession::new(SchemaValidator::relaxed(), ShuffleEngine::seeded(1))
    }

    #[tokio::test]
    async fn test_load_text() {
        let mut session = session();
        let model = session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::new(true, true))
            .await
            .unwrap();
        assert_eq!(model.question_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_model() {
        let mut session = session();
        session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::in_document_order())
            .await
            .unwrap();

        let err = session
            .load(QuizSource::Text("{ broken".to_string()), QuizOptions::in_document_order())
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::Parse(ParseError::Json { .. })));

        let err = session
            .load(QuizSource::Bytes(b"[]".to_vec()), QuizOptions::in_document_order())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Validation(ValidationError::RootNotObject { .. })
        ));

        let current = session.current().unwrap();
        assert_eq!(current.question_count(), 1);
    }

    #[tokio::test]
    async fn test_new_load_replaces_model() {
        let mut session = session();
        session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::in_document_order())
            .await
            .unwrap();
        session
            .load(
                QuizSource::Preset("rust_basics.json".to_string()),
                QuizOptions::new(false, true),
            )
            .await
            .unwrap();

        let current = session.current().unwrap();
        assert_eq!(current.question_count(), 4);
        assert_eq!(current.options(), QuizOptions::new(false, true));
    }

    #[tokio::test]
    async fn test_reset_and_grade_without_model() {
        let mut session = session();
        assert!(session.response_sheet().is_none());

        session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::in_document_order())
            .await
            .unwrap();
        let sheet = session.response_sheet().unwrap();
        assert!(session.grade(&sheet).is_ok());

        session.reset();
        assert!(session.current().is_none());
        assert!(matches!(session.grade(&sheet), Err(QuizError::NoQuizLoaded)));
    }

    #[tokio::test]
    async fn test_old_sheet_rejected_after_reload() {
        let mut session = session();
        session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::in_document_order())
            .await
            .unwrap();
        let old_sheet = session.response_sheet().unwrap();

        // 同样的内容重新加载也是新模型
        session
            .load(QuizSource::Text(ONE_QUESTION.to_string()), QuizOptions::in_document_order())
            .await
            .unwrap();
        let err = session.grade(&old_sheet).unwrap_err();
        assert!(matches!(err, QuizError::Submission(SubmissionError::StaleSheet)));

        let fresh = session.response_sheet().unwrap();
        assert!(session.grade(&fresh).is_ok());
    }

    #[tokio::test]
    async fn test_from_config_uses_strict_policy() {
        // 单选题有两个正确答案：宽松模式接受，严格模式拒绝
        let two_correct = r#"{"1": {"title": "Q", "answers": {"a": {"answer": "X", "correct": true}, "b": {"answer": "Y", "correct": true}}, "multiSelect": false}}"#;

        let relaxed = Config::from_lookup(|_| None);
        let mut session = QuizSession::from_config(&relaxed);
        assert!(session
            .load(QuizSource::Text(two_correct.to_string()), relaxed.quiz_options())
            .await
            .is_ok());

        let strict = Config::from_lookup(|name| {
            (name == "QUIZ_STRICT_VALIDATION").then(|| "true".to_string())
        });
        let mut session = QuizSession::from_config(&strict);
        let err = session
            .load(QuizSource::Text(two_correct.to_string()), strict.quiz_options())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::Validation(ValidationError::SingleSelectCorrectCount { .. })
        ));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_unknown_preset() {
        let mut session = session();
        let err = session
            .load(QuizSource::Preset("nope.json".to_string()), QuizOptions::in_document_order())
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::UnknownPreset { .. }));
        assert!(!err.is_input_error());
    }
}
