use crate::models::QuizOptions;
use crate::services::validator::{SchemaValidator, ValidationPolicy};
use crate::utils::logging;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库文件存放目录
    pub data_folder: String,
    /// 是否打乱题目顺序
    pub shuffle_questions: bool,
    /// 是否打乱选项顺序
    pub shuffle_answers: bool,
    /// 是否启用严格校验（检查正确答案数量）
    pub strict_validation: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: "data".to_string(),
            shuffle_questions: true,
            shuffle_answers: true,
            strict_validation: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，缺失或无法解析的值使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let flag = |name: &str, fallback: bool| {
            lookup(name).and_then(|v| v.trim().parse().ok()).unwrap_or(fallback)
        };
        Self {
            data_folder: lookup("QUIZ_DATA_FOLDER").unwrap_or(default.data_folder),
            shuffle_questions: flag("QUIZ_SHUFFLE_QUESTIONS", default.shuffle_questions),
            shuffle_answers: flag("QUIZ_SHUFFLE_ANSWERS", default.shuffle_answers),
            strict_validation: flag("QUIZ_STRICT_VALIDATION", default.strict_validation),
            verbose_logging: flag("VERBOSE_LOGGING", default.verbose_logging),
        }
    }

    /// 显式的出题选项
    pub fn quiz_options(&self) -> QuizOptions {
        QuizOptions::new(self.shuffle_questions, self.shuffle_answers)
    }

    /// 按配置初始化日志
    pub fn init_logging(&self) {
        logging::init(self.verbose_logging);
    }

    pub fn validator(&self) -> SchemaValidator {
        if self.strict_validation {
            SchemaValidator::new(ValidationPolicy::Strict)
        } else {
            SchemaValidator::new(ValidationPolicy::Relaxed)
        }
    }
}
