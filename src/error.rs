//! # 统一错误处理模块
//!
//! 定义 jsonorm 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单文件错误（读取/解析/写入/删除）只在 worker 内部产生，
//! 随后被转换为 `FileResult`，不会越过 worker 边界向上传播。
//! 真正会中止整次运行的只有配置错误和发现（遍历）错误。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::error::Error as _;
use thiserror::Error;

/// jsonorm 统一错误类型
#[derive(Error, Debug)]
pub enum JsonormError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file: {path}")]
    FileRemoveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to walk directory tree at {path}")]
    DiscoveryError {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid JSON in {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed configuration payload: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Worker 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to spawn worker {id}: {reason}")]
    WorkerSpawnFailed { id: usize, reason: String },

    #[error("Worker {id} faulted: {reason}")]
    WorkerFault { id: usize, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl JsonormError {
    /// 渲染为单行错误信息（附带 source 链），用于写入 `FileResult`
    pub fn to_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            // ParseError 的 Display 已经内嵌了解析器信息
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, JsonormError>;
