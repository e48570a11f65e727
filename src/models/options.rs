/// 出题选项
///
/// 核心层不提供默认值，调用方必须显式给出两个开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptions {
    /// 是否打乱题目顺序
    pub shuffle_questions: bool,
    /// 是否打乱每道题的选项顺序
    pub shuffle_answers: bool,
}

impl QuizOptions {
    pub fn new(shuffle_questions: bool, shuffle_answers: bool) -> Self {
        Self {
            shuffle_questions,
            shuffle_answers,
        }
    }

    /// 两项都不打乱，按文档原顺序展示
    pub fn in_document_order() -> Self {
        Self::new(false, false)
    }
}
