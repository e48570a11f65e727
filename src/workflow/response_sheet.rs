//! 答卷：记录展示层收集到的选择
//!
//! 单选题每次选择都会替换之前的选项，多选题可以选任意多个（包括零个）

use std::collections::{BTreeMap, BTreeSet};

use crate::error::SubmissionError;
use crate::models::quiz::{AnswerKey, QuestionId, QuizDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    multi_select: bool,
    answer_count: usize,
    selected: BTreeSet<AnswerKey>,
}

/// 答卷
///
/// 由 [`QuizModel`](crate::workflow::QuizModel) 发出的答卷会记住模型的代号，
/// 只能交给同一个模型判分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSheet {
    slots: BTreeMap<QuestionId, Slot>,
    issuer: Option<u64>,
}

impl ResponseSheet {
    /// 为文档创建空白答卷
    pub fn for_document(document: &QuizDocument) -> Self {
        let slots = document
            .questions()
            .iter()
            .map(|q| {
                (
                    q.id,
                    Slot {
                        multi_select: q.multi_select,
                        answer_count: q.answers.len(),
                        selected: BTreeSet::new(),
                    },
                )
            })
            .collect();
        Self {
            slots,
            issuer: None,
        }
    }

    pub(crate) fn issued_by(mut self, generation: u64) -> Self {
        self.issuer = Some(generation);
        self
    }

    /// 发出这份答卷的模型代号
    pub fn issuer(&self) -> Option<u64> {
        self.issuer
    }

    /// 答卷的题目结构是否与文档一致（编号、选项数、单选/多选）
    pub fn fits(&self, document: &QuizDocument) -> bool {
        self.slots.len() == document.len()
            && document.questions().iter().all(|q| {
                self.slots.get(&q.id).is_some_and(|slot| {
                    slot.multi_select == q.multi_select && slot.answer_count == q.answers.len()
                })
            })
    }

    /// 选择一个选项
    pub fn select(&mut self, id: QuestionId, letter: &str) -> Result<(), SubmissionError> {
        let (slot, key) = self.slot_and_key(id, letter)?;
        if !slot.multi_select {
            slot.selected.clear();
        }
        slot.selected.insert(key);
        Ok(())
    }

    /// 取消选择
    pub fn deselect(&mut self, id: QuestionId, letter: &str) -> Result<(), SubmissionError> {
        let (slot, key) = self.slot_and_key(id, letter)?;
        slot.selected.remove(&key);
        Ok(())
    }

    /// 切换选中状态（复选框语义），返回切换后是否选中
    pub fn toggle(&mut self, id: QuestionId, letter: &str) -> Result<bool, SubmissionError> {
        let (slot, key) = self.slot_and_key(id, letter)?;
        if slot.selected.remove(&key) {
            return Ok(false);
        }
        if !slot.multi_select {
            slot.selected.clear();
        }
        slot.selected.insert(key);
        Ok(true)
    }

    /// 整体替换一道题的选择
    ///
    /// 单选题最多只能提交一个选项
    pub fn set_selection<I, S>(&mut self, id: QuestionId, letters: I) -> Result<(), SubmissionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slot = self
            .slots
            .get(&id)
            .ok_or(SubmissionError::UnknownQuestion { id: id.get() })?;

        let mut selected = BTreeSet::new();
        for letter in letters {
            selected.insert(resolve_key(id, slot, letter.as_ref())?);
        }
        if !slot.multi_select && selected.len() > 1 {
            return Err(SubmissionError::TooManySelections {
                id: id.get(),
                count: selected.len(),
            });
        }

        if let Some(slot) = self.slots.get_mut(&id) {
            slot.selected = selected;
        }
        Ok(())
    }

    /// 清空所有选择
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.selected.clear();
        }
    }

    /// 某道题当前的选择，未知题目返回 None
    pub fn selected(&self, id: QuestionId) -> Option<&BTreeSet<AnswerKey>> {
        self.slots.get(&id).map(|slot| &slot.selected)
    }

    /// 已作答（至少选了一个）的题目数
    pub fn answered_count(&self) -> usize {
        self.slots.values().filter(|s| !s.selected.is_empty()).count()
    }

    /// 所有题目的选择
    pub fn selections(&self) -> BTreeMap<QuestionId, BTreeSet<AnswerKey>> {
        self.slots
            .iter()
            .map(|(id, slot)| (*id, slot.selected.clone()))
            .collect()
    }

    fn slot_and_key(
        &mut self,
        id: QuestionId,
        letter: &str,
    ) -> Result<(&mut Slot, AnswerKey), SubmissionError> {
        let slot = self
            .slots
            .get_mut(&id)
            .ok_or(SubmissionError::UnknownQuestion { id: id.get() })?;
        let key = resolve_key(id, slot, letter)?;
        Ok((slot, key))
    }
}

fn resolve_key(id: QuestionId, slot: &Slot, letter: &str) -> Result<AnswerKey, SubmissionError> {
    AnswerKey::parse(letter)
        .filter(|key| key.index() < slot.answer_count)
        .ok_or_else(|| SubmissionError::UnknownAnswer {
            id: id.get(),
            key: letter.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validator::validate;
    use serde_json::json;

    fn sample_sheet() -> ResponseSheet {
        let doc = validate(&json!({
            "1": {
                "title": "单选",
                "answers": {
                    "a": { "answer": "X", "correct": true },
                    "b": { "answer": "Y", "correct": false }
                },
                "multiSelect": false
            },
            "2": {
                "title": "多选",
                "answers": {
                    "a": { "answer": "X", "correct": true },
                    "b": { "answer": "Y", "correct": false },
                    "c": { "answer": "Z", "correct": true }
                },
                "multiSelect": true
            }
        }))
        .unwrap();
        ResponseSheet::for_document(&doc)
    }

    fn id(n: u32) -> QuestionId {
        QuestionId::new(n).unwrap()
    }

    fn letters(sheet: &ResponseSheet, n: u32) -> Vec<char> {
        sheet.selected(id(n)).unwrap().iter().map(|k| k.letter()).collect()
    }

    #[test]
    fn test_single_select_replaces_choice() {
        let mut sheet = sample_sheet();
        sheet.select(id(1), "a").unwrap();
        sheet.select(id(1), "b").unwrap();
        assert_eq!(letters(&sheet, 1), vec!['b']);
    }

    #[test]
    fn test_multi_select_accumulates() {
        let mut sheet = sample_sheet();
        sheet.select(id(2), "c").unwrap();
        sheet.select(id(2), "a").unwrap();
        sheet.select(id(2), "a").unwrap();
        assert_eq!(letters(&sheet, 2), vec!['a', 'c']);

        sheet.deselect(id(2), "a").unwrap();
        assert_eq!(letters(&sheet, 2), vec!['c']);
    }

    #[test]
    fn test_toggle() {
        let mut sheet = sample_sheet();
        assert!(sheet.toggle(id(2), "b").unwrap());
        assert!(!sheet.toggle(id(2), "b").unwrap());
        assert!(letters(&sheet, 2).is_empty());

        sheet.toggle(id(1), "a").unwrap();
        sheet.toggle(id(1), "b").unwrap();
        assert_eq!(letters(&sheet, 1), vec!['b']);
    }

    #[test]
    fn test_set_selection() {
        let mut sheet = sample_sheet();
        sheet.set_selection(id(2), ["c", "a"]).unwrap();
        assert_eq!(letters(&sheet, 2), vec!['a', 'c']);

        sheet.set_selection(id(2), Vec::<&str>::new()).unwrap();
        assert!(letters(&sheet, 2).is_empty());

        let err = sheet.set_selection(id(1), ["a", "b"]).unwrap_err();
        assert_eq!(err, SubmissionError::TooManySelections { id: 1, count: 2 });

        // 重复字母在单选题中视为一个
        sheet.set_selection(id(1), ["a", "a"]).unwrap();
        assert_eq!(letters(&sheet, 1), vec!['a']);
    }

    #[test]
    fn test_unknown_question_and_answer() {
        let mut sheet = sample_sheet();
        assert_eq!(
            sheet.select(id(3), "a").unwrap_err(),
            SubmissionError::UnknownQuestion { id: 3 }
        );
        assert_eq!(
            sheet.select(id(1), "c").unwrap_err(),
            SubmissionError::UnknownAnswer {
                id: 1,
                key: "c".to_string()
            }
        );
        assert!(sheet.select(id(1), "A").is_err());
        assert!(sheet.selected(id(3)).is_none());
    }

    #[test]
    fn test_failed_set_selection_keeps_previous() {
        let mut sheet = sample_sheet();
        sheet.set_selection(id(2), ["a"]).unwrap();
        assert!(sheet.set_selection(id(2), ["a", "x"]).is_err());
        assert_eq!(letters(&sheet, 2), vec!['a']);
    }

    #[test]
    fn test_clear() {
        let mut sheet = sample_sheet();
        sheet.select(id(1), "a").unwrap();
        sheet.select(id(2), "b").unwrap();
        assert_eq!(sheet.answered_count(), 2);

        sheet.clear();
        assert_eq!(sheet.answered_count(), 0);
        assert!(sheet.selections().values().all(|s| s.is_empty()));
    }

    #[test]
    fn test_fits_checks_question_shape() {
        let sheet = sample_sheet();
        let other = validate(&json!({
            "1": {
                "title": "单选",
                "answers": {
                    "a": { "answer": "X", "correct": true },
                    "b": { "answer": "Y", "correct": false }
                },
                "multiSelect": false
            }
        }))
        .unwrap();
        assert!(!sheet.fits(&other), "题目数量不同的答卷不应匹配");
        assert!(ResponseSheet::for_document(&other).fits(&other));
        assert_eq!(sheet.issuer(), None);
    }
}
