//! # check 子命令 CLI 定义
//!
//! 只解析、不写入，报告无法规范化的文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/check.rs`

use crate::cli::common::RunArgs;

use clap::Args;

/// check 子命令参数
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub run: RunArgs,
}
