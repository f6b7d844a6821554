//! # 批量调度器
//!
//! 在固定的 worker 池上以有界并发执行所有批次。
//!
//! ## 调度算法
//! - 待处理批次组成 FIFO 队列，空闲 worker 组成栈
//! - 两者都非空时：弹出一个空闲 worker 和队首批次并分配
//! - 否则阻塞在完成通道上等待“任意一个”在途批次完成，
//!   释放该 worker 后立即重新分配
//! - 队列为空且没有在途批次时结束
//!
//! 队列与空闲栈只在调用线程上修改，不需要加锁。
//! 计数按文件结果逐条累积；worker 级故障会把整批文件记为失败，
//! 并在同一槽位重建 worker。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `batch/pool.rs`, `batch/worker.rs`

use crate::batch::partition::Batch;
use crate::batch::pool::WorkerPool;
use crate::batch::worker::BatchOutcome;
use crate::error::{JsonormError, Result};
use crate::models::{FileResult, RunSummary};

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::time::Instant;

/// 批量调度器
pub struct BatchRunner {
    pool: WorkerPool,
}

impl BatchRunner {
    /// 接管一个已创建的 worker 池
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// 执行所有批次
    ///
    /// 每个文件结果到达时回调 `on_result`（传入最新的汇总）。
    /// 只有在所有批次都有结果、所有 worker 都回到 Idle 后才返回。
    pub fn run<F>(&mut self, batches: Vec<Batch>, mut on_result: F) -> Result<RunSummary>
    where
        F: FnMut(&FileResult, &RunSummary),
    {
        let start = Instant::now();
        let mut summary = RunSummary::default();

        let mut queue: VecDeque<Batch> = batches.into();
        // 栈顶是 worker 0
        let mut idle: Vec<usize> = (0..self.pool.size()).rev().collect();
        let mut in_flight: HashMap<usize, Vec<PathBuf>> = HashMap::new();

        loop {
            while !queue.is_empty() {
                let Some(worker) = idle.pop() else { break };
                let Some(batch) = queue.pop_front() else { break };

                let files = batch.files.clone();
                match self.pool.assign(worker, batch) {
                    Ok(()) => {
                        in_flight.insert(worker, files);
                        summary.peak_busy = summary.peak_busy.max(in_flight.len());
                    }
                    Err(batch) => {
                        // worker 线程已经不在了
                        let fault = JsonormError::WorkerFault {
                            id: worker,
                            reason: format!("batch {} could not be delivered", batch.id),
                        };
                        charge_fault(&mut summary, &batch.files, &fault, &mut on_result);
                        summary.batches += 1;
                        self.pool.respawn(worker)?;
                        idle.push(worker);
                    }
                }
            }

            if in_flight.is_empty() {
                break;
            }

            let completion = self.pool.wait_any();
            let worker = completion.worker;
            let files = in_flight.remove(&worker).unwrap_or_default();

            match completion.outcome {
                BatchOutcome::Done(results) if results.len() == files.len() => {
                    for result in &results {
                        summary.record(result);
                        on_result(result, &summary);
                    }
                    self.pool.release(worker);
                }
                BatchOutcome::Done(results) => {
                    let fault = JsonormError::WorkerFault {
                        id: worker,
                        reason: format!(
                            "batch {} returned {} result(s) for {} file(s)",
                            completion.batch_id,
                            results.len(),
                            files.len()
                        ),
                    };
                    charge_fault(&mut summary, &files, &fault, &mut on_result);
                    self.pool.respawn(worker)?;
                }
                BatchOutcome::Fault(reason) => {
                    let fault = JsonormError::WorkerFault {
                        id: worker,
                        reason: format!("batch {}: {}", completion.batch_id, reason),
                    };
                    charge_fault(&mut summary, &files, &fault, &mut on_result);
                    self.pool.respawn(worker)?;
                }
            }

            summary.batches += 1;
            idle.push(worker);
        }

        debug_assert_eq!(self.pool.busy_count(), 0);
        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    /// 关闭 worker 池，返回异常退出的线程数
    pub fn shutdown(self) -> usize {
        self.pool.shutdown()
    }
}

/// 把整批文件记为失败
fn charge_fault<F>(
    summary: &mut RunSummary,
    files: &[PathBuf],
    fault: &JsonormError,
    on_result: &mut F,
) where
    F: FnMut(&FileResult, &RunSummary),
{
    summary.worker_faults += 1;
    let reason = fault.to_message();
    for path in files {
        let result = FileResult::failure(path, reason.as_str());
        summary.record(&result);
        on_result(&result, summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::partition::partition;
    use crate::transform::{Normalize, Transform};

    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// 记录同时执行的变换数量
    #[derive(Default)]
    struct CountingTransform {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl Transform for CountingTransform {
        fn apply(&self, path: &Path) -> Result<PathBuf> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            self.active.fetch_sub(1, Ordering::SeqCst);

            if path.to_string_lossy().contains("bad") {
                return Err(JsonormError::Other("bad file".to_string()));
            }
            Ok(path.to_path_buf())
        }
    }

    /// 遇到指定文件时 panic
    struct PanickingTransform;

    impl Transform for PanickingTransform {
        fn apply(&self, path: &Path) -> Result<PathBuf> {
            if path.to_string_lossy().contains("panic") {
                panic!("transform blew up on {}", path.display());
            }
            Ok(path.to_path_buf())
        }
    }

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/virtual/f{i}.json"))).collect()
    }

    #[test]
    fn test_every_batch_runs_once_within_bound() {
        let transform = Arc::new(CountingTransform::default());
        let pool = WorkerPool::new(3, transform.clone()).unwrap();
        let mut runner = BatchRunner::new(pool);

        let files = paths(47);
        let batches = partition(files.clone(), 4).unwrap();
        let batch_count = batches.len();

        let mut seen = Vec::new();
        let summary = runner
            .run(batches, |result, _| seen.push(result.file_path.clone()))
            .unwrap();

        assert_eq!(summary.processed, 47);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.batches, batch_count);
        assert_eq!(transform.calls.load(Ordering::SeqCst), 47);
        assert!(summary.peak_busy <= 3);
        assert!(transform.peak.load(Ordering::SeqCst) <= 3);

        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(seen.len(), 47);
        assert_eq!(unique, files.iter().collect::<HashSet<_>>());

        assert_eq!(runner.pool().busy_count(), 0);
        assert_eq!(runner.shutdown(), 0);
    }

    #[test]
    fn test_single_worker_many_batches() {
        let pool = WorkerPool::new(1, Arc::new(CountingTransform::default())).unwrap();
        let mut runner = BatchRunner::new(pool);

        let summary = runner.run(partition(paths(10), 1).unwrap(), |_, _| {}).unwrap();
        assert_eq!(summary.processed, 10);
        assert_eq!(summary.batches, 10);
        assert_eq!(summary.peak_busy, 1);
        runner.shutdown();
    }

    #[test]
    fn test_empty_run() {
        let pool = WorkerPool::new(4, Arc::new(CountingTransform::default())).unwrap();
        let mut runner = BatchRunner::new(pool);

        let summary = runner.run(Vec::new(), |_, _| {}).unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.peak_busy, 0);
        runner.shutdown();
    }

    #[test]
    fn test_file_errors_counted_per_file() {
        let pool = WorkerPool::new(2, Arc::new(CountingTransform::default())).unwrap();
        let mut runner = BatchRunner::new(pool);

        let mut files = paths(6);
        files[1] = PathBuf::from("/virtual/bad1.json");
        files[4] = PathBuf::from("/virtual/bad4.json");

        let mut live_errors = Vec::new();
        let summary = runner
            .run(partition(files, 3).unwrap(), |_, s| live_errors.push(s.errors))
            .unwrap();

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.worker_faults, 0);
        assert!(summary.failed(Path::new("/virtual/bad1.json")));
        assert_eq!(live_errors.len(), 6);
        assert_eq!(live_errors.last(), Some(&2));
        runner.shutdown();
    }

    #[test]
    fn test_worker_fault_charges_batch_and_respawns() {
        let pool = WorkerPool::new(2, Arc::new(PanickingTransform)).unwrap();
        let mut runner = BatchRunner::new(pool);

        let mut files = paths(9);
        files[4] = PathBuf::from("/virtual/panic.json");
        // 批次: [0,1,2] [3,panic,5] [6,7,8]
        let summary = runner.run(partition(files, 3).unwrap(), |_, _| {}).unwrap();

        assert_eq!(summary.processed, 6);
        assert_eq!(summary.errors, 3);
        assert_eq!(summary.worker_faults, 1);
        assert_eq!(summary.batches, 3);
        assert!(summary.failed(Path::new("/virtual/f3.json")));
        assert!(summary.failures[0].1.contains("faulted"));

        assert_eq!(runner.pool().size(), 2);
        assert_eq!(runner.pool().respawned(), 1);
        assert_eq!(runner.pool().busy_count(), 0);
        assert_eq!(runner.shutdown(), 0);
    }

    #[test]
    fn test_normalize_tree_end_to_end() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..25 {
            let ext = if i % 2 == 0 { "json" } else { "jsonc" };
            let path = dir.path().join(format!("f{i}.{ext}"));
            fs::write(&path, format!("{{ // c\n \"i\": {i},\n}}")).unwrap();
            files.push(path);
        }

        let pool = WorkerPool::new(4, Arc::new(Normalize { minify: true })).unwrap();
        let mut runner = BatchRunner::new(pool);
        let summary = runner.run(partition(files, 5).unwrap(), |_, _| {}).unwrap();
        runner.shutdown();

        assert_eq!(summary.processed, 25);
        assert_eq!(summary.renamed, 12);
        for i in 0..25 {
            let out = dir.path().join(format!("f{i}.json"));
            assert_eq!(fs::read_to_string(&out).unwrap(), format!("{{\"i\":{i}}}"));
            assert!(!dir.path().join(format!("f{i}.jsonc")).exists());
        }
    }
}
