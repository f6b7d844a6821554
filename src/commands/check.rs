//! # check 命令实现
//!
//! 与 normalize 使用相同的收集与调度，但只解析不写入，
//! 结束时以表格列出所有无法规范化的文件。
//!
//! ## 依赖关系
//! - 使用 `cli/check.rs` 定义的参数
//! - 使用 `batch/`, `transform.rs`
//! - 使用 `utils/output.rs`

use super::{build_config, discover, execute_pipeline, exit_status};
use crate::cli::check::CheckArgs;
use crate::error::Result;
use crate::models::RunSummary;
use crate::transform::Validate;
use crate::utils::output;
use crate::utils::progress::DEFAULT_PROGRESS_EVERY;

use std::sync::Arc;
use tabled::{Table, Tabled};

/// 失败文件表格行
#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// 执行 check 命令
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = build_config(&args.run)?;

    output::print_header("Checking JSON files");

    let files = discover(&args.run, &config)?;
    if files.is_empty() {
        output::print_info("No files found.");
        return Ok(());
    }

    let summary = execute_pipeline(
        files,
        &args.run,
        &config,
        Arc::new(Validate),
        DEFAULT_PROGRESS_EVERY,
        "Checking",
    )?;

    if summary.errors > 0 {
        println!();
        println!("{}", failure_table(&summary));
    }

    println!();
    output::print_done(&format!(
        "Checked {} file(s) in {:.2}s: {} valid, {} invalid.",
        summary.total(),
        summary.elapsed_seconds(),
        summary.processed,
        summary.errors
    ));

    exit_status(&args.run, &summary)
}

/// 生成失败文件表格
fn failure_table(summary: &RunSummary) -> Table {
    let mut failures = summary.failures.clone();
    failures.sort();

    let rows: Vec<FailureRow> = failures
        .into_iter()
        .map(|(path, error)| FailureRow {
            file: path.display().to_string(),
            error,
        })
        .collect();

    Table::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_failure_table_sorted() {
        let summary = RunSummary {
            errors: 2,
            failures: vec![
                (PathBuf::from("b.json"), "bad b".to_string()),
                (PathBuf::from("a.json"), "bad a".to_string()),
            ],
            ..RunSummary::default()
        };

        let rendered = failure_table(&summary).to_string();
        let a = rendered.find("a.json").unwrap();
        let b = rendered.find("b.json").unwrap();
        assert!(a < b);
        assert!(rendered.contains("bad a"));
        assert!(rendered.contains("Error"));
    }
}
