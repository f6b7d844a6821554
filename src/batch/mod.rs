//! # 批量处理模块
//!
//! 有界并发的批量处理管线。
//!
//! ## 功能
//! - 收集匹配文件列表（`collector`）
//! - 切分为固定大小的批次（`partition`）
//! - 固定大小、可复用的 worker 池（`pool`, `worker`）
//! - 调度与结果汇总（`runner`）
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `walkdir` 遍历目录，`num_cpus` 探测并行度

pub mod collector;
pub mod partition;
pub mod pool;
pub mod runner;
pub mod worker;

pub use collector::{rename_collisions, FileCollector};
pub use partition::partition;
pub use pool::{resolve_pool_size, WorkerPool};
pub use runner::BatchRunner;
