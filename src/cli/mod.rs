//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `normalize`: 将 JSON / JSONC 文件规范化为严格 JSON
//! - `check`: 只检查能否解析，不修改文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, normalize, check

pub mod check;
pub mod common;
pub mod normalize;

use clap::{Parser, Subcommand};

/// jsonorm - 并行规范化 JSON / JSONC 文件
#[derive(Parser)]
#[command(name = "jsonorm")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Normalize trees of JSON / JSON-with-comments files into strict JSON", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite .json files in place and .jsonc files as sibling .json files
    Normalize(normalize::NormalizeArgs),

    /// Report files that would fail to normalize, without touching them
    Check(check::CheckArgs),
}
