//! 题库文档的强类型表示
//!
//! 校验通过之后，下游代码只操作这里的类型，不再检查 JSON 形状

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// 字母键的上限（a..=z）
pub const MAX_ANSWERS: usize = 26;

/// 题目编号，从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionId(u32);

impl QuestionId {
    /// 编号为 0 时返回 None
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 文档中的下标（0-based）
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// 解析题目键，只接受规范写法（"1" 可以，"01"、"+1" 不行）
    pub fn parse_key(key: &str) -> Option<Self> {
        let id: u32 = key.parse().ok()?;
        let id = Self::new(id)?;
        (id.to_string() == key).then_some(id)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 作为 JSON 对象的键时输出 "1" 这种字符串
impl Serialize for QuestionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 选项字母（a、b、c ...）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerKey(char);

impl AnswerKey {
    /// 第 `index` 个选项对应的字母，超过 z 返回 None
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= MAX_ANSWERS {
            return None;
        }
        Some(Self((b'a' + index as u8) as char))
    }

    /// 解析单个小写字母
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => Some(Self(c)),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 as u8 - b'a') as usize
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Answer {
    /// 选项描述
    pub answer: String,
    /// 是否为正确选项
    pub correct: bool,
}

impl Answer {
    pub fn new(answer: impl Into<String>, correct: bool) -> Self {
        Self {
            answer: answer.into(),
            correct,
        }
    }
}

/// 一道题的选项集合，第 i 个选项的字母是 `a + i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    entries: Vec<Answer>,
}

impl AnswerSet {
    /// 选项为空或超过 26 个时返回 None
    pub fn new(entries: Vec<Answer>) -> Option<Self> {
        if entries.is_empty() || entries.len() > MAX_ANSWERS {
            return None;
        }
        Some(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: AnswerKey) -> Option<&Answer> {
        self.entries.get(key.index())
    }

    pub fn contains_key(&self, key: AnswerKey) -> bool {
        key.index() < self.entries.len()
    }

    /// 按文档顺序返回 (字母, 选项)
    pub fn iter(&self) -> impl Iterator<Item = (AnswerKey, &Answer)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, answer)| AnswerKey::from_index(i).map(|key| (key, answer)))
    }

    pub fn keys(&self) -> Vec<AnswerKey> {
        self.iter().map(|(key, _)| key).collect()
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, answer) in self.iter() {
            map.serialize_entry(&key, answer)?;
        }
        map.end()
    }
}

/// 单道题目
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(skip)]
    pub id: QuestionId,
    /// 题干
    pub title: String,
    pub answers: AnswerSet,
    /// 是否多选（多选题可以一个都不选）
    pub multi_select: bool,
}

impl Question {
    /// 标记为正确的选项数量
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|(_, a)| a.correct).count()
    }
}

/// 校验后的完整题库文档
///
/// 题目按编号顺序存放，下标 i 对应编号 i + 1，因此编号天然连续
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizDocument {
    questions: Vec<Question>,
}

impl QuizDocument {
    /// 按顺序构造文档，题目编号会被重新设置为 1..=N
    pub fn new(questions: Vec<Question>) -> Self {
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(i, mut q)| {
                q.id = QuestionId::from_index(i);
                q
            })
            .collect();
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id.index())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(|q| q.id)
    }

    /// 还原成原始 JSON 形状
    pub fn to_value(&self) -> serde_json::Value {
        // 这些类型的序列化只产生字符串键和基本值，不会失败
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl Serialize for QuizDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for question in &self.questions {
            map.serialize_entry(&question.id, question)?;
        }
        map.end()
    }
}
