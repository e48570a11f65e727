use std::fmt;
use thiserror::Error;

/// 题库引擎错误类型
///
/// 所有可恢复的错误（解析、校验、读取文件）都在加载边界转换成这个类型，
/// `Display` 输出可以直接展示给用户
#[derive(Debug, Error)]
pub enum QuizError {
    /// 输入不是合法的结构化数据
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 结构合法但不符合题库格式
    #[error("题库格式错误: {0}")]
    Validation(#[from] ValidationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 找不到内置题库
    #[error("找不到内置题库: {name}")]
    UnknownPreset { name: String },
    /// 作答记录错误
    #[error("作答错误: {0}")]
    Submission(#[from] SubmissionError),
    /// 还没有加载题库
    #[error("尚未加载题库")]
    NoQuizLoaded,
}

/// 解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON 格式错误
    #[error("JSON 格式错误 (第 {line} 行, 第 {column} 列): {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },
    /// TOML 格式错误
    #[error("TOML 格式错误: {message}")]
    Toml { message: String },
    /// 内容不是合法的 UTF-8
    #[error("内容不是合法的 UTF-8 (位置: {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// 校验失败时所在的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// 某道题目
    Question { id: u32 },
    /// 某道题目的某个选项
    Answer { id: u32, key: char },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Question { id } => write!(f, "题目 {}", id),
            Location::Answer { id, key } => write!(f, "题目 {} 的选项 {}", id, key),
        }
    }
}

/// 题库格式校验错误
///
/// 每个变体都指明违反了哪条规则、在哪一层
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 根节点不是对象
    #[error("题库根节点必须是对象，实际是 {found}")]
    RootNotObject { found: &'static str },
    /// 缺少题目编号（编号必须从 1 开始连续）
    #[error("缺少题目 \"{id}\"：题目编号必须从 1 开始连续编号")]
    MissingQuestion { id: u32 },
    /// 顶层存在非数字键
    #[error("顶层共有 {total} 个字段，但只有 {numeric} 个是题目编号，多余的键: \"{extraneous}\"")]
    KeyCountMismatch {
        numeric: usize,
        total: usize,
        extraneous: String,
    },
    /// 题目不是对象
    #[error("题目 {id} 必须是对象，实际是 {found}")]
    QuestionNotObject { id: u32, found: &'static str },
    /// 题目字段数量不是 3
    #[error("题目 {id} 必须恰好包含 title、answers、multiSelect 三个字段，实际有 {found} 个")]
    QuestionFieldCount { id: u32, found: usize },
    /// 缺少字段
    #[error("{location} 缺少字段 \"{field}\"")]
    MissingField {
        location: Location,
        field: &'static str,
    },
    /// 字段类型错误
    #[error("{location} 的字段 \"{field}\" 必须是 {expected}，实际是 {found}")]
    WrongType {
        location: Location,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// 没有任何选项
    #[error("题目 {id} 至少需要一个选项")]
    EmptyAnswers { id: u32 },
    /// 选项超过 26 个
    #[error("题目 {id} 有 {count} 个选项，最多只支持 26 个 (a-z)")]
    TooManyAnswers { id: u32, count: usize },
    /// 选项字母不连续、重复或不是小写字母
    #[error("题目 {id} 的选项键应为 \"{expected}\"，实际是 \"{found}\"")]
    UnexpectedAnswerKey {
        id: u32,
        expected: char,
        found: String,
    },
    /// 选项不是对象
    #[error("题目 {id} 的选项 {key} 必须是对象，实际是 {found}")]
    AnswerNotObject {
        id: u32,
        key: char,
        found: &'static str,
    },
    /// 选项字段数量不是 2
    #[error("题目 {id} 的选项 {key} 必须恰好包含 answer、correct 两个字段，实际有 {found} 个")]
    AnswerFieldCount { id: u32, key: char, found: usize },
    /// 单选题正确答案数量不是 1（严格模式）
    #[error("单选题 {id} 必须恰好有一个正确选项，实际有 {found} 个")]
    SingleSelectCorrectCount { id: u32, found: usize },
    /// 多选题没有正确答案（严格模式）
    #[error("多选题 {id} 至少需要一个正确选项")]
    NoCorrectAnswer { id: u32 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的文件格式
    #[error("不支持的文件格式: {path}（仅支持 .json 和 .toml）")]
    UnsupportedFormat { path: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 作答记录错误
///
/// 只会在展示层传入了模型之外的编号或字母时出现
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// 题目编号不存在
    #[error("题目 {id} 不存在")]
    UnknownQuestion { id: u32 },
    /// 选项字母不存在
    #[error("题目 {id} 没有选项 \"{key}\"")]
    UnknownAnswer { id: u32, key: String },
    /// 单选题提交了多个选项
    #[error("单选题 {id} 只能选择一个选项，实际提交了 {count} 个")]
    TooManySelections { id: u32, count: usize },
    /// 答卷不是当前题库发出的
    #[error("答卷不属于当前题库，请重新开始作答")]
    StaleSheet,
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ParseError {
    fn from(err: toml::de::Error) -> Self {
        ParseError::Toml {
            message: err.to_string(),
        }
    }
}

impl From<std::str::Utf8Error> for ParseError {
    fn from(err: std::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::Parse(err.into())
    }
}

impl From<toml::de::Error> for QuizError {
    fn from(err: toml::de::Error) -> Self {
        QuizError::Parse(err.into())
    }
}

// ========== 便捷构造函数 ==========

impl QuizError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return QuizError::File(FileError::NotFound { path });
        }
        QuizError::File(FileError::ReadFailed { path, source })
    }

    /// 创建未知内置题库错误
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        QuizError::UnknownPreset { name: name.into() }
    }

    /// 是否是用户可以修正的输入错误（解析或校验失败）
    pub fn is_input_error(&self) -> bool {
        matches!(self, QuizError::Parse(_) | QuizError::Validation(_))
    }
}

// ========== Result 类型别名 ==========

/// 题库引擎结果类型
pub type QuizResult<T> = Result<T, QuizError>;
