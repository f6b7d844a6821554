//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及它们共用的批量管线：
//! 配置合并 -> 发现 -> 切分 -> 调度 -> 关闭 worker 池。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: normalize, check

pub mod check;
pub mod normalize;

use crate::batch::{partition, resolve_pool_size, BatchRunner, FileCollector, WorkerPool};
use crate::cli::common::RunArgs;
use crate::cli::Commands;
use crate::error::{JsonormError, Result};
use crate::models::{Config, RunSummary};
use crate::transform::Transform;
use crate::utils::output;
use crate::utils::progress::ProgressReporter;

use std::path::PathBuf;
use std::sync::Arc;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Normalize(args) => normalize::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}

/// 合并 JSON 负载与命令行覆盖项，并在处理任何文件之前校验
fn build_config(run: &RunArgs) -> Result<Config> {
    let mut config = Config::from_payload(run.config.as_deref())?;
    if let Some(batch_size) = run.batch_size {
        config.batch_size = batch_size;
    }
    if run.no_jsonc {
        config.jsonc = false;
    }
    config.validate()?;
    Ok(config)
}

/// 收集待处理文件
fn discover(run: &RunArgs, config: &Config) -> Result<Vec<PathBuf>> {
    FileCollector::new(&run.dir)
        .with_extensions(&config.extensions())
        .collect()
}

/// 在固定 worker 池上对所有文件执行变换
fn execute_pipeline(
    files: Vec<PathBuf>,
    run: &RunArgs,
    config: &Config,
    transform: Arc<dyn Transform>,
    progress_every: usize,
    label: &str,
) -> Result<RunSummary> {
    let total = files.len();
    let batches = partition(files, config.batch_size)?;
    let workers = resolve_pool_size(run.jobs);

    output::print_info(&format!(
        "Processing {} file(s) in {} batch(es) with {} worker(s)...",
        total,
        batches.len(),
        workers
    ));

    let mut runner = BatchRunner::new(WorkerPool::new(workers, transform)?);
    let reporter = ProgressReporter::new(total, progress_every, label);

    // run 出现致命错误时直接返回，不执行 shutdown
    let summary = runner.run(batches, |result, summary| reporter.record(result, summary))?;
    reporter.finish();

    if runner.pool().respawned() > 0 {
        output::print_warning(&format!(
            "{} batch(es) lost to worker faults, {} worker(s) respawned",
            summary.worker_faults,
            runner.pool().respawned()
        ));
    }

    let abnormal = runner.shutdown();
    if abnormal > 0 {
        output::print_warning(&format!(
            "{} worker thread(s) did not shut down cleanly",
            abnormal
        ));
    }

    Ok(summary)
}

/// 根据 `--fail-on-error` 决定退出状态
fn exit_status(run: &RunArgs, summary: &RunSummary) -> Result<()> {
    if run.fail_on_error && summary.errors > 0 {
        return Err(JsonormError::Other(format!(
            "{} file(s) failed",
            summary.errors
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(config: Option<&str>) -> RunArgs {
        RunArgs {
            config: config.map(str::to_string),
            dir: PathBuf::from("./"),
            batch_size: None,
            no_jsonc: false,
            jobs: 0,
            fail_on_error: false,
        }
    }

    #[test]
    fn test_flags_override_payload() {
        let mut run = run_args(Some(r#"{"batchSize": 7, "jsonc": true, "minify": false}"#));
        assert_eq!(build_config(&run).unwrap().batch_size, 7);

        run.batch_size = Some(3);
        run.no_jsonc = true;
        let config = build_config(&run).unwrap();
        assert_eq!(config.batch_size, 3);
        assert!(!config.jsonc);
        assert!(!config.minify);
    }

    #[test]
    fn test_zero_batch_size_fails_fast() {
        let run = run_args(Some(r#"{"batchSize": 0}"#));
        assert!(matches!(
            build_config(&run),
            Err(JsonormError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_exit_status() {
        let mut run = run_args(None);
        let summary = RunSummary {
            errors: 2,
            ..RunSummary::default()
        };
        assert!(exit_status(&run, &summary).is_ok());

        run.fail_on_error = true;
        assert!(exit_status(&run, &summary).is_err());
        assert!(exit_status(&run, &RunSummary::default()).is_ok());
    }
}
