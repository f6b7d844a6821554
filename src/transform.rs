//! # 单文件变换
//!
//! worker 对批次中每个文件执行的操作，抽象为 `Transform` trait。
//!
//! ## 实现
//! - `Normalize`: 读取 -> 去注释/尾随逗号 -> 解析 -> 重新序列化 -> 写回（`.jsonc` 改名为 `.json`）
//! - `Validate`: 读取 -> 去注释/尾随逗号 -> 解析，不写任何文件（`check` 子命令）
//!
//! ## 依赖关系
//! - 被 `batch/worker.rs` 调用
//! - 使用 `jsonc/`

use crate::error::{JsonormError, Result};
use crate::jsonc;
use crate::models::config::{JSONC_EXT, JSON_EXT};

use std::fs;
use std::path::{Path, PathBuf};

/// 单文件变换，在多个 worker 线程间共享
pub trait Transform: Send + Sync {
    /// 处理单个文件，成功时返回结果所在路径
    fn apply(&self, path: &Path) -> Result<PathBuf>;
}

/// 规范化为严格 JSON 并写回
#[derive(Debug, Clone, Copy)]
pub struct Normalize {
    pub minify: bool,
}

impl Transform for Normalize {
    fn apply(&self, path: &Path) -> Result<PathBuf> {
        let value = read_relaxed(path)?;

        let output =
            jsonc::to_json_string(&value, self.minify).map_err(|e| JsonormError::ParseError {
                path: path.display().to_string(),
                source: e,
            })?;

        let out_path = output_path(path);
        fs::write(&out_path, output).map_err(|e| JsonormError::FileWriteError {
            path: out_path.display().to_string(),
            source: e,
        })?;

        // 改名语义：先写新文件，再删除原文件
        if out_path != path {
            fs::remove_file(path).map_err(|e| JsonormError::FileRemoveError {
                path: path.display().to_string(),
                source: e,
            })?;
        }

        Ok(out_path)
    }
}

/// 只校验能否解析，不修改文件
#[derive(Debug, Clone, Copy, Default)]
pub struct Validate;

impl Transform for Validate {
    fn apply(&self, path: &Path) -> Result<PathBuf> {
        read_relaxed(path)?;
        Ok(path.to_path_buf())
    }
}

/// 读取并容错解析
fn read_relaxed(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).map_err(|e| JsonormError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    jsonc::parse_relaxed(&raw).map_err(|e| JsonormError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 是否为宽松方言文件（扩展名不区分大小写）
pub fn is_relaxed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(JSONC_EXT))
}

/// 计算输出路径：`.jsonc` 写到同目录的 `.json`，其余原地覆盖
pub fn output_path(path: &Path) -> PathBuf {
    if is_relaxed(path) {
        path.with_extension(JSON_EXT)
    } else {
        path.to_path_buf()
    }
}
