//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数
use std::borrow::Cow;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::services::grading::GradeReport;
use crate::workflow::quiz_model::QuizModel;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info。重复调用不会报错
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录题库加载信息
///
/// # 参数
/// - `source`: 题库来源描述
/// - `model`: 加载后的模型
pub fn log_quiz_loaded(source: &str, model: &QuizModel) {
    let options = model.options();
    info!("{}", "=".repeat(60));
    info!("📚 题库已加载: {}", source);
    info!("📊 题目数量: {}", model.question_count());
    info!(
        "🔀 打乱题目: {} | 打乱选项: {}",
        options.shuffle_questions, options.shuffle_answers
    );
    info!("{}", "=".repeat(60));
}

/// 打印判分统计
pub fn log_grade_summary(report: &GradeReport) {
    info!("\n{}", "─".repeat(60));
    info!("📊 判分完成");
    info!("完成时间: {}", report.graded_at.format("%Y-%m-%d %H:%M:%S"));
    info!("✅ 正确: {}/{}", report.correct, report.total);
    info!("❌ 错误: {}", report.total - report.correct);
    info!("🎯 正确率: {:.1}%", report.score_percent());
    info!("{}", "─".repeat(60));
}

/// 题干过长时只保留前 `max_chars` 个字符，用于日志
pub fn shorten_title(title: &str, max_chars: usize) -> Cow<'_, str> {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &title[..cut])),
        None => Cow::Borrowed(title),
    }
}
