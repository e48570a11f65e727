//! 内置题库
//!
//! 题库文件在编译期嵌入，按名称选择

use phf::phf_map;
use tracing::info;

use crate::error::{QuizError, QuizResult};
use crate::models::loaders::parse::parse_json;
use crate::models::quiz::QuizDocument;
use crate::services::validator::SchemaValidator;

static PRESETS: phf::Map<&'static str, &'static str> = phf_map! {
    "rust_basics.json" => include_str!("../../../data/rust_basics.json"),
    "geography.json" => include_str!("../../../data/geography.json"),
};

/// 所有内置题库名称（按字母排序）
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PRESETS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// 内置题库的原始文本
pub fn preset_source(name: &str) -> Option<&'static str> {
    PRESETS.get(name).copied()
}

/// 加载并校验内置题库
pub fn load_preset(name: &str, validator: &SchemaValidator) -> QuizResult<QuizDocument> {
    let source = preset_source(name).ok_or_else(|| QuizError::unknown_preset(name))?;
    let value = parse_json(source)?;
    let document = validator.validate(&value)?;
    info!("📚 已加载内置题库 {}，共 {} 道题", name, document.len());
    Ok(document)
}
