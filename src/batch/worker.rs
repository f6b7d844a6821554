//! # Worker 执行单元
//!
//! 每个 worker 是一个独立的 OS 线程，一次只处理一个批次：
//! 从自己的任务通道接收 `Batch`，逐个文件执行 `Transform`，
//! 然后把结果连同自身 id 发回共享的完成通道。
//!
//! 单个文件的失败只会变成一条 `ok = false` 的结果，不影响同批次其他文件。
//! 变换过程中的 panic 被视为 worker 级故障：上报后线程退出，由调度器重新创建。
//!
//! ## 依赖关系
//! - 被 `batch/pool.rs` 创建
//! - 使用 `transform.rs`, `models/outcome.rs`
//! - 使用 `crossbeam-channel` 收发批次与完成通知

use crate::batch::partition::Batch;
use crate::models::FileResult;
use crate::transform::Transform;

use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

/// 批次执行结果
#[derive(Debug)]
pub enum BatchOutcome {
    /// 正常完成，结果与输入逐项对应
    Done(Vec<FileResult>),
    /// worker 级故障（panic）
    Fault(String),
}

/// 完成通知：worker 通过共享通道发回调度器
#[derive(Debug)]
pub struct Completion {
    pub worker: usize,
    pub batch_id: usize,
    pub outcome: BatchOutcome,
}

/// 处理一个批次，返回与输入顺序一致的结果列表
pub fn process_batch(transform: &dyn Transform, files: &[PathBuf]) -> Vec<FileResult> {
    files
        .iter()
        .map(|path| match transform.apply(path) {
            Ok(out_path) => FileResult::success(path, out_path),
            Err(e) => FileResult::failure(path, e.to_message()),
        })
        .collect()
}

/// worker 线程主循环，任务通道关闭时退出
pub(crate) fn worker_loop(
    id: usize,
    transform: Arc<dyn Transform>,
    jobs: Receiver<Batch>,
    done: Sender<Completion>,
) {
    while let Ok(batch) = jobs.recv() {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| {
            process_batch(transform.as_ref(), &batch.files)
        })) {
            Ok(results) => BatchOutcome::Done(results),
            Err(payload) => BatchOutcome::Fault(panic_message(payload.as_ref())),
        };

        let faulted = matches!(outcome, BatchOutcome::Fault(_));
        let completion = Completion {
            worker: id,
            batch_id: batch.id,
            outcome,
        };

        if done.send(completion).is_err() || faulted {
            break;
        }
    }
}

/// 提取 panic 负载中的文字信息
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
