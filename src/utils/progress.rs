//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式，并在非终端输出时退化为周期性的进度行。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `indicatif`, `console` crate

use crate::models::{FileResult, RunSummary};
use crate::utils::output;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// 默认每处理多少个文件输出一次进度行
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// 创建标准进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// 运行进度报告
///
/// stdout 是终端时显示进度条，否则每 `every` 个成功文件打印一行（0 表示不打印）。
/// 单文件错误总是立即输出到 stderr。
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    total: usize,
    every: usize,
}

impl ProgressReporter {
    pub fn new(total: usize, every: usize, message: &str) -> Self {
        let bar = Term::stdout()
            .is_term()
            .then(|| create_progress_bar(total as u64, message));
        Self { bar, total, every }
    }

    /// 记录一个到达的文件结果
    pub fn record(&self, result: &FileResult, summary: &RunSummary) {
        let error_line = (!result.ok).then(|| {
            format!(
                "{}: {}",
                result.file_path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            )
        });

        match &self.bar {
            Some(pb) => {
                if let Some(line) = error_line {
                    pb.suspend(|| output::print_error(&line));
                }
                pb.inc(1);
            }
            None => {
                if let Some(line) = error_line {
                    output::print_error(&line);
                } else if self.every > 0 && summary.processed % self.every == 0 {
                    output::print_progress(summary.processed, self.total);
                }
            }
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }
}
