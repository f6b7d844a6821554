//! # jsonorm - 并行 JSON / JSONC 规范化工具
//!
//! 将目录树中格式随意的 JSON 与带注释的 JSON（JSONC）统一重写为严格 JSON，
//! 使用固定大小的 worker 池有界并发处理。
//!
//! ## 子命令
//! - `normalize` - 规范化（压缩或 4 空格缩进），.jsonc 改写为 .json
//! - `check`     - 只检查能否解析，不修改文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (收集、切分、worker 池、调度)
//!   │     ├── transform  (单文件变换)
//!   │     ├── jsonc/     (容错解析与序列化)
//!   │     └── models/    (配置与结果模型)
//!   ├── utils/      (输出与进度)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod jsonc;
mod models;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&e.to_message());
        std::process::exit(1);
    }
}
