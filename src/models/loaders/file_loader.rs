use crate::error::{FileError, QuizError, QuizResult};
use crate::models::loaders::parse::DocumentFormat;
use crate::models::quiz::QuizDocument;
use crate::services::validator::SchemaValidator;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从文件加载题库并校验（.json 或 .toml）
pub async fn load_quiz_file(path: &Path, validator: &SchemaValidator) -> QuizResult<QuizDocument> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        QuizError::File(FileError::UnsupportedFormat {
            path: path.display().to_string(),
        })
    })?;

    // 读原始字节，编码问题归为解析错误而不是读取错误
    let bytes = fs::read(path)
        .await
        .map_err(|e| QuizError::file_read_failed(path.display().to_string(), e))?;

    let value = format.parse_bytes(&bytes)?;
    let document = validator.validate(&value)?;
    tracing::debug!("✓ {} 校验通过", path.display());

    Ok(document)
}

/// 从文件夹中加载所有题库文件
///
/// 格式错误的文件会记录警告并跳过；结果按文件名排序
pub async fn load_all_quiz_files(
    folder_path: &str,
    validator: &SchemaValidator,
) -> Result<Vec<(PathBuf, QuizDocument)>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(QuizError::File(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        })
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if DocumentFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut quizzes = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_quiz_file(&path, validator).await {
            Ok(document) => {
                tracing::info!("成功加载 {} 个题目", document.len());
                quizzes.push((path, document));
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    if quizzes.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到可用的题库文件", folder_path);
    }

    Ok(quizzes)
}
