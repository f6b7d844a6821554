//! # 固定大小的 worker 池
//!
//! 运行开始时创建固定数量的 `WorkerHandle`，在所有批次间复用，
//! 运行期间既不增长也不缩小。每个槽位显式维护 Idle / Busy 状态。
//!
//! ## 功能
//! - 池大小计算：`clamp(CPU 数, 4, 32)`
//! - 分配批次、释放槽位
//! - 等待任意批次完成，并发现未上报就退出的线程
//! - 故障槽位重建（respawn）
//! - 关闭：关闭任务通道并 join 所有线程
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `batch/worker.rs` 的线程主循环
//! - 使用 `num_cpus` 探测并行度
//! - 使用 `crossbeam-channel` 作为任务与完成通道

use crate::batch::partition::Batch;
use crate::batch::worker::{worker_loop, BatchOutcome, Completion};
use crate::error::{JsonormError, Result};
use crate::transform::Transform;

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 池大小下限
pub const MIN_POOL_SIZE: usize = 4;

/// 池大小上限
pub const MAX_POOL_SIZE: usize = 32;

/// 等待完成通知时检查线程存活的间隔
const LIVENESS_INTERVAL: Duration = Duration::from_millis(100);

/// 自动池大小：探测到的并行度限制在 [4, 32]
pub fn pool_size() -> usize {
    clamp_pool_size(num_cpus::get())
}

fn clamp_pool_size(detected: usize) -> usize {
    detected.clamp(MIN_POOL_SIZE, MAX_POOL_SIZE)
}

/// 解析 `--jobs`：0 表示自动，其余取值不超过上限
pub fn resolve_pool_size(jobs: usize) -> usize {
    if jobs == 0 {
        pool_size()
    } else {
        jobs.min(MAX_POOL_SIZE)
    }
}

/// 槽位状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// 可分配
    Idle,
    /// 正在处理指定批次
    Busy { batch_id: usize },
}

/// 单个 worker 线程的句柄
pub struct WorkerHandle {
    id: usize,
    state: SlotState,
    jobs: Option<Sender<Batch>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// 创建 worker 线程
    fn spawn(id: usize, transform: Arc<dyn Transform>, done: Sender<Completion>) -> Result<Self> {
        let (job_tx, job_rx) = unbounded();

        let thread = thread::Builder::new()
            .name(format!("jsonorm-worker-{}", id))
            .spawn(move || worker_loop(id, transform, job_rx, done))
            .map_err(|e| JsonormError::WorkerSpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            state: SlotState::Idle,
            jobs: Some(job_tx),
            thread: Some(thread),
        })
    }

    #[cfg(test)]
    pub fn id(&self) -> usize {
        self.id
    }

    #[cfg(test)]
    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SlotState::Idle
    }

    /// 分配批次（Idle -> Busy），通道已断开时原样退回批次
    fn assign(&mut self, batch: Batch) -> std::result::Result<(), Batch> {
        debug_assert!(self.is_idle(), "worker {} assigned while busy", self.id);

        let batch_id = batch.id;
        let jobs = match &self.jobs {
            Some(jobs) => jobs,
            None => return Err(batch),
        };

        jobs.send(batch).map_err(|e| e.0)?;
        self.state = SlotState::Busy { batch_id };
        Ok(())
    }

    /// 忙碌但线程已经结束：线程没有发回完成通知就退出了
    fn is_dead_busy(&self) -> bool {
        !self.is_idle() && self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// 关闭任务通道并等待线程结束，返回线程是否正常退出
    fn shutdown(&mut self) -> bool {
        self.jobs.take();
        match self.thread.take() {
            Some(thread) => thread.join().is_ok(),
            None => true,
        }
    }
}

/// 固定大小的 worker 池
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    transform: Arc<dyn Transform>,
    done_tx: Sender<Completion>,
    done_rx: Receiver<Completion>,
    respawned: usize,
}

impl WorkerPool {
    /// 创建 `size` 个 worker，全部处于 Idle
    pub fn new(size: usize, transform: Arc<dyn Transform>) -> Result<Self> {
        if size == 0 {
            return Err(JsonormError::InvalidConfig(
                "worker pool size must be at least 1".to_string(),
            ));
        }

        let (done_tx, done_rx) = unbounded();
        let workers = (0..size)
            .map(|id| WorkerHandle::spawn(id, Arc::clone(&transform), done_tx.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            workers,
            transform,
            done_tx,
            done_rx,
            respawned: 0,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// 当前忙碌的 worker 数
    pub fn busy_count(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_idle()).count()
    }

    /// 故障后重建的次数
    pub fn respawned(&self) -> usize {
        self.respawned
    }

    #[cfg(test)]
    pub fn workers(&self) -> &[WorkerHandle] {
        &self.workers
    }

    pub(crate) fn assign(&mut self, worker: usize, batch: Batch) -> std::result::Result<(), Batch> {
        self.workers[worker].assign(batch)
    }

    /// 阻塞等待任意一个在途批次完成
    ///
    /// 池自身持有一个完成通道发送端，通道不会断开；
    /// 因此定期检查忙碌槽位的线程是否已经结束。
    /// 线程未上报就退出时，合成一个该批次的 `Fault` 通知。
    pub(crate) fn wait_any(&self) -> Completion {
        loop {
            if let Ok(completion) = self.done_rx.recv_timeout(LIVENESS_INTERVAL) {
                return completion;
            }

            let Some(dead) = self.workers.iter().find(|w| w.is_dead_busy()) else {
                continue;
            };

            // 线程退出前发出的通知先于这里可见
            if let Ok(completion) = self.done_rx.try_recv() {
                return completion;
            }

            let batch_id = match dead.state {
                SlotState::Busy { batch_id } => batch_id,
                SlotState::Idle => continue,
            };
            return Completion {
                worker: dead.id,
                batch_id,
                outcome: BatchOutcome::Fault(
                    "worker thread exited without reporting".to_string(),
                ),
            };
        }
    }

    /// 批次完成后释放槽位（Busy -> Idle）
    pub(crate) fn release(&mut self, worker: usize) {
        self.workers[worker].state = SlotState::Idle;
    }

    /// 丢弃可能已损坏的 worker，在同一槽位创建新的线程
    pub(crate) fn respawn(&mut self, worker: usize) -> Result<()> {
        let fresh = WorkerHandle::spawn(worker, Arc::clone(&self.transform), self.done_tx.clone())?;
        let mut old = std::mem::replace(&mut self.workers[worker], fresh);
        old.shutdown();
        self.respawned += 1;
        Ok(())
    }

    /// 关闭所有 worker 并释放共享的变换，返回异常退出的线程数
    pub fn shutdown(mut self) -> usize {
        self.workers
            .iter_mut()
            .map(WorkerHandle::shutdown)
            .filter(|clean| !clean)
            .count()
    }
}
