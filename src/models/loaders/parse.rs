//! 原始文本 → 结构化数据
//!
//! 只负责解析，不做题库格式校验

use serde_json::Value as JsonValue;
use std::path::Path;

use crate::error::ParseError;

/// 题库文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// 根据扩展名判断格式（不区分大小写）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DocumentFormat::Json),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    /// 按格式解析文本
    pub fn parse(self, text: &str) -> Result<JsonValue, ParseError> {
        match self {
            DocumentFormat::Json => parse_json(text),
            DocumentFormat::Toml => parse_toml(text),
        }
    }

    /// 按格式解析原始字节（检查 UTF-8，去掉 BOM）
    pub fn parse_bytes(self, bytes: &[u8]) -> Result<JsonValue, ParseError> {
        self.parse(decode_utf8(bytes)?)
    }
}

/// 解析 JSON 文本
pub fn parse_json(text: &str) -> Result<JsonValue, ParseError> {
    Ok(serde_json::from_str(text)?)
}

/// 解析 JSON 字节，先检查 UTF-8
pub fn parse_json_bytes(bytes: &[u8]) -> Result<JsonValue, ParseError> {
    parse_json(decode_utf8(bytes)?)
}

fn decode_utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    // 去掉可能存在的 BOM
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// 解析 TOML 文本，转换成与 JSON 相同的结构
pub fn parse_toml(text: &str) -> Result<JsonValue, ParseError> {
    Ok(toml::from_str(text)?)
}
