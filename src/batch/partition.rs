//! # 批次划分
//!
//! 将文件列表切分为连续、不重叠、保持顺序的批次。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 产出的 `Batch` 交给 `batch/runner.rs` 调度

use crate::error::{JsonormError, Result};

use std::path::PathBuf;

/// 一个批次：整体分配给单个 worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 批次序号（按发现顺序）
    pub id: usize,
    /// 批次内的文件，保持发现顺序
    pub files: Vec<PathBuf>,
}

/// 按 `batch_size` 切分，最后一个批次可以更小
pub fn partition(files: Vec<PathBuf>, batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(JsonormError::InvalidConfig(
            "batchSize must be a positive integer".to_string(),
        ));
    }

    let mut batches = Vec::with_capacity(files.len().div_ceil(batch_size));
    let mut files = files.into_iter().peekable();

    while files.peek().is_some() {
        batches.push(Batch {
            id: batches.len(),
            files: files.by_ref().take(batch_size).collect(),
        });
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("f{i}.json"))).collect()
    }

    #[test]
    fn test_partition_sizes_and_order() {
        for (n, size) in [(1, 1), (7, 3), (9, 3), (20, 20), (21, 20), (5, 100)] {
            let files = paths(n);
            let batches = partition(files.clone(), size).unwrap();

            assert_eq!(batches.len(), n.div_ceil(size), "n={n} size={size}");
            for (i, batch) in batches.iter().enumerate() {
                assert_eq!(batch.id, i);
                if i + 1 < batches.len() {
                    assert_eq!(batch.files.len(), size);
                } else {
                    assert!(!batch.files.is_empty() && batch.files.len() <= size);
                }
            }

            let joined: Vec<PathBuf> = batches.into_iter().flat_map(|b| b.files).collect();
            assert_eq!(joined, files);
        }
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(Vec::new(), 4).unwrap().is_empty());
    }

    #[test]
    fn test_partition_zero_size_rejected() {
        assert!(matches!(
            partition(paths(3), 0),
            Err(JsonormError::InvalidConfig(_))
        ));
    }
}
