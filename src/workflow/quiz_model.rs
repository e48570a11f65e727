//! 题库模型
//!
//! 持有校验后的源文档（权威数据，永不重排）和展示顺序（可能被打乱，只用于渲染）。
//! 判分只看源文档。

use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::SubmissionError;
use crate::models::quiz::{AnswerKey, Question, QuestionId, QuizDocument};
use crate::models::QuizOptions;
use crate::services::grading::{grade_sheet, GradeReport};
use crate::services::shuffle::ShuffleEngine;
use crate::utils::logging::shorten_title;
use crate::workflow::response_sheet::ResponseSheet;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// 一道题在展示时的位置与选项顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedQuestion {
    pub id: QuestionId,
    /// 选项的展示顺序，字母仍是原字母
    pub answer_order: Vec<AnswerKey>,
}

/// 渲染用的题目视图
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView<'a> {
    pub id: QuestionId,
    pub title: &'a str,
    pub multi_select: bool,
    pub answers: Vec<AnswerView<'a>>,
}

/// 渲染用的选项视图
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView<'a> {
    /// 原始字母，作为提交值
    pub key: AnswerKey,
    /// 按展示位置重新分配的字母，只用于显示
    pub label: AnswerKey,
    pub text: &'a str,
}

/// 题库模型（构造后不可变）
#[derive(Debug, Clone)]
pub struct QuizModel {
    document: QuizDocument,
    options: QuizOptions,
    order: Vec<PresentedQuestion>,
    generation: u64,
}

impl QuizModel {
    /// 根据选项生成展示顺序
    pub fn build<R: Rng>(
        document: QuizDocument,
        options: QuizOptions,
        engine: &mut ShuffleEngine<R>,
    ) -> Self {
        let ids: Vec<QuestionId> = document.ids().collect();
        let ids = engine.arrange(&ids, options.shuffle_questions);

        let order: Vec<PresentedQuestion> = ids
            .into_iter()
            .filter_map(|id| {
                let question = document.get(id)?;
                debug!("  第 {} 题: {}", id, shorten_title(&question.title, 30));
                let keys = question.answers.keys();
                Some(PresentedQuestion {
                    id,
                    answer_order: engine.arrange(&keys, options.shuffle_answers),
                })
            })
            .collect();

        debug!(
            "生成展示顺序: {} 道题 (打乱题目: {}, 打乱选项: {})",
            order.len(),
            options.shuffle_questions,
            options.shuffle_answers
        );

        Self {
            document,
            options,
            order,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// 模型代号，每次构造都不同
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn question_count(&self) -> usize {
        self.document.len()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.document.get(id)
    }

    /// 源文档顺序的题目
    pub fn questions(&self) -> &[Question] {
        self.document.questions()
    }

    pub fn document(&self) -> &QuizDocument {
        &self.document
    }

    pub fn options(&self) -> QuizOptions {
        self.options
    }

    pub fn presentation_order(&self) -> &[PresentedQuestion] {
        &self.order
    }

    /// 按展示顺序生成渲染视图
    pub fn presented_questions(&self) -> Vec<QuestionView<'_>> {
        self.order
            .iter()
            .filter_map(|presented| {
                let question = self.document.get(presented.id)?;
                let answers = presented
                    .answer_order
                    .iter()
                    .enumerate()
                    .filter_map(|(position, key)| {
                        let answer = question.answers.get(*key)?;
                        Some(AnswerView {
                            key: *key,
                            label: AnswerKey::from_index(position)?,
                            text: answer.answer.as_str(),
                        })
                    })
                    .collect();
                Some(QuestionView {
                    id: question.id,
                    title: question.title.as_str(),
                    multi_select: question.multi_select,
                    answers,
                })
            })
            .collect()
    }

    /// 空白答卷
    pub fn response_sheet(&self) -> ResponseSheet {
        ResponseSheet::for_document(&self.document).issued_by(self.generation)
    }

    /// 按源文档判分
    ///
    /// 其他模型发出的答卷、或题目结构对不上的答卷会被拒绝
    pub fn grade(&self, sheet: &ResponseSheet) -> Result<GradeReport, SubmissionError> {
        let foreign = sheet.issuer().is_some_and(|g| g != self.generation);
        if foreign || !sheet.fits(&self.document) {
            return Err(SubmissionError::StaleSheet);
        }
        Ok(grade_sheet(&self.document, &sheet.selections()))
    }
}
