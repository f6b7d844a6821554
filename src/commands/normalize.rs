//! # normalize 命令实现
//!
//! 将目录树中的 JSON / JSONC 文件规范化为严格 JSON。
//!
//! ## 功能
//! - 递归收集 .json（以及可选的 .jsonc）文件
//! - 去除注释与尾随逗号后重新序列化（压缩或 4 空格缩进）
//! - .jsonc 写为同名 .json 并删除原文件
//! - 固定 worker 池并行处理，单文件失败不影响其他文件
//!
//! ## 依赖关系
//! - 使用 `cli/normalize.rs` 定义的参数
//! - 使用 `batch/`, `transform.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use super::{build_config, discover, execute_pipeline, exit_status};
use crate::batch::rename_collisions;
use crate::cli::normalize::NormalizeArgs;
use crate::error::Result;
use crate::transform::Normalize;
use crate::utils::output;

use std::sync::Arc;

/// 执行 normalize 命令
pub fn execute(args: NormalizeArgs) -> Result<()> {
    let mut config = build_config(&args.run)?;
    if args.pretty {
        config.minify = false;
    } else if args.minify {
        config.minify = true;
    }

    output::print_header(&format!(
        "Normalizing JSON ({})",
        if config.minify { "minified" } else { "pretty" }
    ));

    let files = discover(&args.run, &config)?;
    if files.is_empty() {
        output::print_info("No files found.");
        return Ok(());
    }

    for (source, target) in rename_collisions(&files) {
        output::print_warning(&format!(
            "{} will overwrite {}",
            source.display(),
            target.display()
        ));
    }

    let transform = Arc::new(Normalize {
        minify: config.minify,
    });
    let summary = execute_pipeline(
        files,
        &args.run,
        &config,
        transform,
        args.progress_every,
        "Normalizing",
    )?;

    println!();
    output::print_done(&format!(
        "Done in {:.2}s: {} succeeded, {} failed.",
        summary.elapsed_seconds(),
        summary.processed,
        summary.errors
    ));
    if summary.renamed > 0 {
        output::print_info(&format!(
            "{} .jsonc file(s) rewritten as .json",
            summary.renamed
        ));
    }

    exit_status(&args.run, &summary)
}
