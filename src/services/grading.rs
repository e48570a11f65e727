//! 判分服务
//!
//! 提交的选项集合必须与正确选项集合完全相同才算对，没有部分得分

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::models::quiz::{AnswerKey, Question, QuestionId, QuizDocument};

/// 一道题的正确选项集合
pub fn expected_keys(question: &Question) -> BTreeSet<AnswerKey> {
    question
        .answers
        .iter()
        .filter(|(_, answer)| answer.correct)
        .map(|(key, _)| key)
        .collect()
}

/// 判断一道题是否答对
///
/// 与顺序、重复无关；空集合是合法的提交
pub fn grade(question: &Question, submitted: &BTreeSet<AnswerKey>) -> bool {
    expected_keys(question) == *submitted
}

/// 以字符串形式提交的字母判分
///
/// 无法解析的字母不可能出现在正确集合中，直接判错
pub fn grade_letters<I, S>(question: &Question, letters: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut submitted = BTreeSet::new();
    for letter in letters {
        match AnswerKey::parse(letter.as_ref()) {
            Some(key) => {
                submitted.insert(key);
            }
            None => return false,
        }
    }
    grade(question, &submitted)
}

/// 整份答卷的判分结果
#[derive(Debug, Clone, Serialize)]
pub struct GradeReport {
    /// 每道题是否答对
    pub verdicts: BTreeMap<QuestionId, bool>,
    /// 答对的题数
    pub correct: usize,
    /// 总题数
    pub total: usize,
    /// 判分时间
    pub graded_at: DateTime<Local>,
}

impl GradeReport {
    pub fn verdict(&self, id: QuestionId) -> Option<bool> {
        self.verdicts.get(&id).copied()
    }

    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }

    /// 正确率（0-100），没有题目时为 0
    pub fn score_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    pub fn incorrect_ids(&self) -> Vec<QuestionId> {
        self.verdicts
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// 按源文档判整份答卷
///
/// 没有作答记录的题目按空集合处理
pub fn grade_sheet(
    document: &QuizDocument,
    submissions: &BTreeMap<QuestionId, BTreeSet<AnswerKey>>,
) -> GradeReport {
    let empty = BTreeSet::new();
    let verdicts: BTreeMap<QuestionId, bool> = document
        .questions()
        .iter()
        .map(|question| {
            let submitted = submissions.get(&question.id).unwrap_or(&empty);
            let verdict = grade(question, submitted);
            debug!("题目 {} 判分: {}", question.id, if verdict { "✓" } else { "✗" });
            (question.id, verdict)
        })
        .collect();

    let correct = verdicts.values().filter(|ok| **ok).count();
    GradeReport {
        total: verdicts.len(),
        correct,
        verdicts,
        graded_at: Local::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::{Answer, AnswerSet};

    /// 创建测试用的题目：a 对、b 错、c 对
    fn make_question(multi_select: bool, correct: &[bool]) -> Question {
        let answers = correct
            .iter()
            .enumerate()
            .map(|(i, c)| Answer::new(format!("选项{}", i), *c))
            .collect();
        Question {
            id: QuestionId::new(1).unwrap(),
            title: "测试题".to_string(),
            answers: AnswerSet::new(answers).unwrap(),
            multi_select,
        }
    }

    fn keys(letters: &[&str]) -> BTreeSet<AnswerKey> {
        letters.iter().filter_map(|l| AnswerKey::parse(l)).collect()
    }

    #[test]
    fn test_grade_exact_match() {
        let q = make_question(true, &[true, false, true]);
        assert!(grade(&q, &keys(&["a", "c"])));
        assert!(grade(&q, &keys(&["c", "a"])));
        assert!(!grade(&q, &keys(&["a"])));
        assert!(!grade(&q, &keys(&["a", "b", "c"])));
        assert!(!grade(&q, &keys(&[])));
    }

    #[test]
    fn test_grade_empty_correct_set() {
        let q = make_question(true, &[false, false]);
        assert!(grade(&q, &keys(&[])));
        assert!(!grade(&q, &keys(&["a"])));
    }

    #[test]
    fn test_grade_single_select_same_rule() {
        let q = make_question(false, &[false, true, false]);
        assert!(grade(&q, &keys(&["b"])));
        assert!(!grade(&q, &keys(&["a"])));
        assert!(!grade(&q, &keys(&[])));
    }

    #[test]
    fn test_grade_letters_ignores_duplicates() {
        let q = make_question(true, &[true, false, true]);
        assert!(grade_letters(&q, ["a", "c", "a"]));
        assert!(grade_letters(&q, vec!["c".to_string(), "a".to_string()]));
        assert!(!grade_letters(&q, ["a", "C"]));
        assert!(!grade_letters(&q, ["a", "c", "zz"]));
        assert!(!grade_letters(&q, Vec::<&str>::new()));
    }

    #[test]
    fn test_letters_outside_answer_set_are_wrong() {
        let q = make_question(false, &[true, false]);
        assert!(!grade_letters(&q, ["a", "z"]));
    }

    #[test]
    fn test_grade_sheet_report() {
        let q = make_question(false, &[true, false]);
        let doc = QuizDocument::new(vec![q.clone(), q.clone(), q]);
        let ids: Vec<QuestionId> = doc.ids().collect();

        let mut submissions = BTreeMap::new();
        submissions.insert(ids[0], keys(&["a"]));
        submissions.insert(ids[1], keys(&["b"]));

        let report = grade_sheet(&doc, &submissions);
        assert_eq!(report.total, 3);
        assert_eq!(report.correct, 1);
        assert_eq!(report.verdict(ids[0]), Some(true));
        assert_eq!(report.verdict(ids[1]), Some(false));
        assert_eq!(report.verdict(ids[2]), Some(false));
        assert_eq!(report.incorrect_ids(), vec![ids[1], ids[2]]);
        assert!(!report.is_perfect());
        assert!((report.score_percent() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_serializes_verdicts_by_id() {
        let q = make_question(false, &[true]);
        let doc = QuizDocument::new(vec![q]);
        let mut submissions = BTreeMap::new();
        submissions.insert(QuestionId::new(1).unwrap(), keys(&["a"]));

        let report = grade_sheet(&doc, &submissions);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["verdicts"]["1"], serde_json::json!(true));
        assert_eq!(value["correct"], serde_json::json!(1));
    }

    #[test]
    fn test_empty_document_report() {
        let report = grade_sheet(&QuizDocument::default(), &BTreeMap::new());
        assert_eq!(report.total, 0);
        assert!(report.is_perfect());
        assert_eq!(report.score_percent(), 0.0);
    }
}
