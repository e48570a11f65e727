//! 题库格式校验服务
//!
//! 把不可信的 JSON 转换成强类型的 [`QuizDocument`]，失败时给出具体位置的诊断。
//!
//! 遍历顺序（也是报错顺序）：
//! 根节点 → 题目编号 1..=N → title / answers / multiSelect → 选项字母 a.. → answer / correct

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::error::{Location, ValidationError};
use crate::models::quiz::{Answer, AnswerKey, AnswerSet, Question, QuestionId, QuizDocument};
use crate::models::MAX_ANSWERS;

const QUESTION_FIELDS: usize = 3;
const ANSWER_FIELDS: usize = 2;

/// 正确答案数量的校验策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// 不检查正确答案数量
    #[default]
    Relaxed,
    /// 单选题必须恰好一个正确答案，多选题至少一个
    Strict,
}

/// 题库格式校验器
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    policy: ValidationPolicy,
}

/// 使用宽松策略校验文档
pub fn validate(doc: &JsonValue) -> Result<QuizDocument, ValidationError> {
    SchemaValidator::relaxed().validate(doc)
}

impl SchemaValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn relaxed() -> Self {
        Self::new(ValidationPolicy::Relaxed)
    }

    pub fn strict() -> Self {
        Self::new(ValidationPolicy::Strict)
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// 校验文档并返回强类型结构
    ///
    /// 不修改输入；遇到的第一个违规会被返回
    pub fn validate(&self, doc: &JsonValue) -> Result<QuizDocument, ValidationError> {
        let root = doc.as_object().ok_or(ValidationError::RootNotObject {
            found: json_type_name(doc),
        })?;

        let total = root.len();
        if total == 0 {
            warn!("⚠️ 题库中没有任何题目");
        }

        let mut questions = Vec::with_capacity(total);
        for id in (1..=total as u32).filter_map(QuestionId::new) {
            let Some(entry) = root.get(&id.to_string()) else {
                return Err(missing_question(root, id));
            };
            questions.push(self.validate_question(id, entry)?);
        }

        debug!("题库校验通过，共 {} 道题", questions.len());
        Ok(QuizDocument::new(questions))
    }

    fn validate_question(
        &self,
        id: QuestionId,
        entry: &JsonValue,
    ) -> Result<Question, ValidationError> {
        let n = id.get();
        let fields = entry.as_object().ok_or(ValidationError::QuestionNotObject {
            id: n,
            found: json_type_name(entry),
        })?;

        if fields.len() != QUESTION_FIELDS {
            return Err(ValidationError::QuestionFieldCount {
                id: n,
                found: fields.len(),
            });
        }

        let location = Location::Question { id: n };
        let title = require(fields, &location, "title")?;
        let answers = require(fields, &location, "answers")?;
        let multi_select = require(fields, &location, "multiSelect")?;

        let title = title
            .as_str()
            .ok_or_else(|| wrong_type(&location, "title", "字符串", title))?;
        let answers = answers
            .as_object()
            .ok_or_else(|| wrong_type(&location, "answers", "对象", answers))?;
        let multi_select = multi_select
            .as_bool()
            .ok_or_else(|| wrong_type(&location, "multiSelect", "布尔值", multi_select))?;

        let answers = validate_answers(n, answers)?;
        let question = Question {
            id,
            title: title.to_string(),
            answers,
            multi_select,
        };

        if self.policy == ValidationPolicy::Strict {
            check_correct_count(&question)?;
        }
        Ok(question)
    }
}

/// 按文档顺序检查选项字母，必须是 a、b、c ... 连续排列
fn validate_answers(id: u32, answers: &Map<String, JsonValue>) -> Result<AnswerSet, ValidationError> {
    if answers.is_empty() {
        return Err(ValidationError::EmptyAnswers { id });
    }
    if answers.len() > MAX_ANSWERS {
        return Err(ValidationError::TooManyAnswers {
            id,
            count: answers.len(),
        });
    }

    let mut entries = Vec::with_capacity(answers.len());
    for (index, (key, value)) in answers.iter().enumerate() {
        let Some(expected) = AnswerKey::from_index(index) else {
            return Err(ValidationError::TooManyAnswers {
                id,
                count: answers.len(),
            });
        };
        if AnswerKey::parse(key) != Some(expected) {
            return Err(ValidationError::UnexpectedAnswerKey {
                id,
                expected: expected.letter(),
                found: key.clone(),
            });
        }
        entries.push(validate_answer(id, expected, value)?);
    }

    AnswerSet::new(entries).ok_or(ValidationError::EmptyAnswers { id })
}

fn validate_answer(id: u32, key: AnswerKey, value: &JsonValue) -> Result<Answer, ValidationError> {
    let fields = value.as_object().ok_or(ValidationError::AnswerNotObject {
        id,
        key: key.letter(),
        found: json_type_name(value),
    })?;

    if fields.len() != ANSWER_FIELDS {
        return Err(ValidationError::AnswerFieldCount {
            id,
            key: key.letter(),
            found: fields.len(),
        });
    }

    let location = Location::Answer {
        id,
        key: key.letter(),
    };
    let answer = require(fields, &location, "answer")?;
    let correct = require(fields, &location, "correct")?;

    let answer = answer
        .as_str()
        .ok_or_else(|| wrong_type(&location, "answer", "字符串", answer))?;
    let correct = correct
        .as_bool()
        .ok_or_else(|| wrong_type(&location, "correct", "布尔值", correct))?;

    Ok(Answer::new(answer, correct))
}

fn check_correct_count(question: &Question) -> Result<(), ValidationError> {
    let id = question.id.get();
    let found = question.correct_count();
    match (question.multi_select, found) {
        (false, 1) => Ok(()),
        (false, found) => Err(ValidationError::SingleSelectCorrectCount { id, found }),
        (true, 0) => Err(ValidationError::NoCorrectAnswer { id }),
        (true, _) => Ok(()),
    }
}

/// 顶层编号缺失时区分两种情况：存在多余的非编号键，或者编号本身有缺口
fn missing_question(root: &Map<String, JsonValue>, id: QuestionId) -> ValidationError {
    let total = root.len();
    let is_question_key = |key: &str| {
        QuestionId::parse_key(key).is_some_and(|k| k.get() as usize <= total)
    };

    let numeric = root.keys().filter(|key| is_question_key(key.as_str())).count();
    match root.keys().find(|key| QuestionId::parse_key(key).is_none()) {
        Some(extraneous) if numeric != total => ValidationError::KeyCountMismatch {
            numeric,
            total,
            extraneous: extraneous.clone(),
        },
        _ => ValidationError::MissingQuestion { id: id.get() },
    }
}

fn require<'a>(
    fields: &'a Map<String, JsonValue>,
    location: &Location,
    field: &'static str,
) -> Result<&'a JsonValue, ValidationError> {
    fields.get(field).ok_or_else(|| ValidationError::MissingField {
        location: location.clone(),
        field,
    })
}

fn wrong_type(
    location: &Location,
    field: &'static str,
    expected: &'static str,
    found: &JsonValue,
) -> ValidationError {
    ValidationError::WrongType {
        location: location.clone(),
        field,
        expected,
        found: json_type_name(found),
    }
}

/// JSON 值的类型名（用于错误信息）
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "布尔值",
        JsonValue::Number(_) => "数字",
        JsonValue::String(_) => "字符串",
        JsonValue::Array(_) => "数组",
        JsonValue::Object(_) => "对象",
    }
}
