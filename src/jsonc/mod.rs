//! # JSON / JSONC 处理模块
//!
//! 宽松方言的容错解析与严格 JSON 的序列化。
//!
//! ## 功能
//! - 去除注释与尾随逗号（`strip`）
//! - 严格解析（`serde_json`，保持对象键顺序）
//! - 压缩或 4 空格缩进输出
//!
//! ## 依赖关系
//! - 被 `transform.rs` 使用
//! - 使用 `serde_json`

pub mod strip;

pub use strip::strip;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// 缩进宽度
const INDENT: &[u8] = b"    ";

/// 容错解析：先去除注释与尾随逗号，再按严格 JSON 解析
pub fn parse_relaxed(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(&strip(text))
}

/// 序列化为严格 JSON 文本
pub fn to_json_string(value: &Value, minify: bool) -> serde_json::Result<String> {
    if minify {
        return serde_json::to_string(value);
    }

    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;

    // serde_json 只会输出合法的 UTF-8
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}
