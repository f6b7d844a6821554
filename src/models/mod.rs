//! # 数据模型模块
//!
//! 定义运行配置、单文件结果与运行汇总。
//!
//! ## 依赖关系
//! - 被 `batch/`、`transform.rs` 和 `commands/` 使用
//! - 子模块: config, outcome

pub mod config;
pub mod outcome;

pub use config::Config;
pub use outcome::{FileResult, RunSummary};
