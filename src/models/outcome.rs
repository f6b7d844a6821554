//! # 处理结果数据模型
//!
//! 单文件结果 `FileResult` 与整次运行汇总 `RunSummary`。
//!
//! ## 依赖关系
//! - 由 `batch/worker.rs` 产生
//! - 由 `batch/runner.rs` 汇总

#[cfg(test)]
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// 单个文件的处理结果，每个输入路径恰好对应一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    /// 是否成功
    pub ok: bool,

    /// 输入路径
    pub file_path: PathBuf,

    /// 输出路径（仅成功时）
    pub out_path: Option<PathBuf>,

    /// 错误信息（仅失败时）
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(file_path: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        FileResult {
            ok: true,
            file_path: file_path.into(),
            out_path: Some(out_path.into()),
            error: None,
        }
    }

    pub fn failure(file_path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        FileResult {
            ok: false,
            file_path: file_path.into(),
            out_path: None,
            error: Some(error.into()),
        }
    }

    /// 输出路径是否与输入路径不同（`.jsonc` -> `.json`）
    pub fn renamed(&self) -> bool {
        self.out_path
            .as_deref()
            .is_some_and(|out| out != self.file_path.as_path())
    }
}

/// 运行汇总
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// 成功文件数
    pub processed: usize,

    /// 失败文件数
    pub errors: usize,

    /// 成功且改写为 `.json` 兄弟文件的数量
    pub renamed: usize,

    /// 总耗时
    pub elapsed: Duration,

    /// 已完成的批次数
    pub batches: usize,

    /// worker 级故障次数
    pub worker_faults: usize,

    /// 运行期间同时忙碌的 worker 峰值
    pub peak_busy: usize,

    /// 失败详情 (路径, 错误信息)
    pub failures: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// 记录一个文件结果
    pub fn record(&mut self, result: &FileResult) {
        if result.ok {
            self.processed += 1;
            if result.renamed() {
                self.renamed += 1;
            }
        } else {
            self.errors += 1;
            self.failures.push((
                result.file_path.clone(),
                result.error.clone().unwrap_or_default(),
            ));
        }
    }

    /// 已记录的文件总数
    pub fn total(&self) -> usize {
        self.processed + self.errors
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// 是否包含指定路径的失败记录
    #[cfg(test)]
    pub fn failed(&self, path: &Path) -> bool {
        self.failures.iter().any(|(p, _)| p == path)
    }
}
