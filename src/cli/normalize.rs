//! # normalize 子命令 CLI 定义
//!
//! 将 .json 原地重写、将 .jsonc 重写为同名 .json
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/normalize.rs`

use crate::cli::common::RunArgs;
use crate::utils::progress::DEFAULT_PROGRESS_EVERY;

use clap::Args;

/// normalize 子命令参数
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Write compact output (overrides minify)
    #[arg(long, default_value_t = false, conflicts_with = "pretty")]
    pub minify: bool,

    /// Write 4-space indented output (overrides minify)
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Print a progress line every N files when not attached to a terminal (0 = never)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    pub progress_every: usize,
}
