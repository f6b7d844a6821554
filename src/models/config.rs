//! # 运行配置
//!
//! 一次运行的不可变配置，可由 JSON 负载提供，例如
//! `{ "minify": true, "jsonc": true, "batchSize": 20 }`，缺省字段取默认值。
//!
//! ## 依赖关系
//! - 被 `cli/`、`commands/` 构造
//! - 被 `batch/` 读取

use crate::error::{JsonormError, Result};

use serde::{Deserialize, Serialize};

/// 严格 JSON 扩展名
pub const JSON_EXT: &str = "json";

/// 宽松方言（允许注释与尾随逗号）扩展名
pub const JSONC_EXT: &str = "jsonc";

/// 运行配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 压缩输出（否则 4 空格缩进）
    pub minify: bool,

    /// 是否发现 `.jsonc` 文件
    pub jsonc: bool,

    /// 每批文件数，必须 >= 1
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            minify: true,
            jsonc: true,
            batch_size: 20,
        }
    }
}

impl Config {
    /// 从可选的 JSON 负载解析配置，空负载等价于默认配置
    pub fn from_payload(payload: Option<&str>) -> Result<Self> {
        match payload.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(serde_json::from_str(text)?),
            _ => Ok(Config::default()),
        }
    }

    /// 在处理任何文件之前校验配置
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(JsonormError::InvalidConfig(
                "batchSize must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// 参与发现的扩展名集合
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts = vec![JSON_EXT];
        if self.jsonc {
            exts.push(JSONC_EXT);
        }
        exts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_default() {
        assert_eq!(Config::from_payload(None).unwrap(), Config::default());
        assert_eq!(Config::from_payload(Some("  ")).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_payload_keeps_defaults() {
        let config = Config::from_payload(Some(r#"{ "batchSize": 5 }"#)).unwrap();
        assert!(config.minify);
        assert!(config.jsonc);
        assert_eq!(config.batch_size, 5);
    }

    #[test]
    fn test_full_payload() {
        let config =
            Config::from_payload(Some(r#"{"minify":false,"jsonc":false,"batchSize":3}"#)).unwrap();
        assert_eq!(
            config,
            Config {
                minify: false,
                jsonc: false,
                batch_size: 3
            }
        );
        assert_eq!(config.extensions(), vec!["json"]);
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(matches!(
            Config::from_payload(Some("{ minify: true")),
            Err(JsonormError::MalformedConfig(_))
        ));
        assert!(matches!(
            Config::from_payload(Some(r#"{ "batchSize": -1 }"#)),
            Err(JsonormError::MalformedConfig(_))
        ));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = Config {
            batch_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(JsonormError::InvalidConfig(_))
        ));
        assert!(Config::default().validate().is_ok());
    }
}
