//! # 文件收集器
//!
//! 从根目录递归收集待处理的 JSON / JSONC 文件。
//!
//! ## 功能
//! - 递归遍历，跟随符号链接
//! - 按扩展名过滤（不区分大小写）；符号链接按目标文件的扩展名判断
//! - 输出绝对、规范化、去重后的路径，同一目录内按文件名排序
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `walkdir` 遍历目录

use crate::error::{JsonormError, Result};
use crate::transform;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 遍历根目录
    root: PathBuf,
    /// 扩展名列表（不带点）
    extensions: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器，默认只匹配 `.json`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["json".to_string()],
        }
    }

    /// 设置扩展名集合
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// 收集所有匹配的文件
    ///
    /// 任何无法遍历的路径都会中止收集；没有匹配文件不是错误。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(JsonormError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();

        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).display().to_string();
                JsonormError::DiscoveryError { path, source: e }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            // 输出的是链接目标，扩展名也以目标为准
            if !entry.path_is_symlink() && !self.matches_extension(entry.path()) {
                continue;
            }

            let canonical =
                fs::canonicalize(entry.path()).map_err(|e| JsonormError::FileReadError {
                    path: entry.path().display().to_string(),
                    source: e,
                })?;

            if !self.matches_extension(&canonical) {
                continue;
            }

            // 多个符号链接可能指向同一文件
            if seen.insert(canonical.clone()) {
                files.push(canonical);
            }
        }

        Ok(files)
    }

    /// 检查扩展名是否匹配
    fn matches_extension(&self, path: &Path) -> bool {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext,
            None => return false,
        };

        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// 找出改名目标与已收集文件冲突的 `.jsonc` 文件
///
/// 返回 `(jsonc 源文件, 将被覆盖的 json 文件)`。
pub fn rename_collisions(files: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let all: HashSet<&Path> = files.iter().map(PathBuf::as_path).collect();

    files
        .iter()
        .filter(|f| transform::is_relaxed(f))
        .filter_map(|f| {
            let target = transform::output_path(f);
            all.contains(target.as_path()).then(|| (f.clone(), target))
        })
        .collect()
}
