//! # 子命令共享参数
//!
//! `normalize` 与 `check` 共用的发现、批次与池参数。
//! 命令行参数覆盖 JSON 配置负载中的同名字段。
//!
//! ## 依赖关系
//! - 被 `cli/normalize.rs`, `cli/check.rs` 展开
//! - 由 `commands/mod.rs` 合并为 `Config`

use clap::Args;
use std::path::PathBuf;

/// 运行参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON configuration payload, e.g. '{ "minify": true, "jsonc": true, "batchSize": 20 }'
    #[arg(value_name = "CONFIG_JSON", env = "JSONORM_CONFIG")]
    pub config: Option<String>,

    /// Root directory to search recursively (symlinks are followed)
    #[arg(short, long, default_value = "./")]
    pub dir: PathBuf,

    /// Number of files per batch (overrides batchSize)
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Skip .jsonc files during discovery (overrides jsonc)
    #[arg(long, default_value_t = false)]
    pub no_jsonc: bool,

    /// Number of workers (0 = auto: CPU count clamped to 4..=32)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Exit with a non-zero status when any file fails
    #[arg(long, default_value_t = false)]
    pub fail_on_error: bool,
}
