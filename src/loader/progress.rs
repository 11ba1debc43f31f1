//! 完了状況の集計
//!
//! 選択フォルダの親ディレクトリ直下を数え、`-finished` で終わるエントリを完了とみなす。

use super::list_entries;
use crate::error::Result;
use std::path::{Path, PathBuf};
use step_checker_common::ProgressSnapshot;
use tracing::warn;

/// 親ディレクトリ（相対パスの単一要素なら "."）
pub fn parent_dir(folder: &Path) -> Option<PathBuf> {
    match folder.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(PathBuf::from(".")),
        Some(parent) => Some(parent.to_path_buf()),
        None => None,
    }
}

/// ディレクトリ直下のエントリを集計
pub fn count_entries(dir: &Path) -> Result<ProgressSnapshot> {
    let entries = list_entries(dir)?;
    Ok(ProgressSnapshot::from_names(entries.iter().map(|(name, _)| name)))
}

/// 選択フォルダの兄弟を集計（親を列挙できなければ 0 / 0）
pub fn count_progress(folder: &Path) -> ProgressSnapshot {
    let Some(parent) = parent_dir(folder) else {
        warn!("親ディレクトリがありません: {}", folder.display());
        return ProgressSnapshot::default();
    };

    match count_entries(&parent) {
        Ok(progress) => progress,
        Err(e) => {
            warn!("親ディレクトリを集計できません: {}: {}", parent.display(), e);
            ProgressSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("/data/item1")), Some(PathBuf::from("/data")));
        assert_eq!(parent_dir(Path::new("/data/item1/")), Some(PathBuf::from("/data")));
        assert_eq!(parent_dir(Path::new("item1")), Some(PathBuf::from(".")));
        assert_eq!(parent_dir(Path::new("/")), None);
    }

    #[test]
    fn test_count_progress_counts_siblings() {
        let root = tempdir().unwrap();
        for name in ["item1", "item2-finished", "item3-finished", "item4"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("notes.txt"), "x").unwrap();

        let progress = count_progress(&root.path().join("item1"));
        assert_eq!(progress, ProgressSnapshot { total: 5, finished: 2 });
    }

    #[test]
    fn test_count_progress_missing_parent_is_zero() {
        let progress = count_progress(Path::new("/nonexistent/step-checker/parent/item"));
        assert_eq!(progress, ProgressSnapshot::default());
    }

    #[test]
    fn test_count_entries_missing_dir_is_error() {
        assert!(count_entries(Path::new("/nonexistent/step-checker/root")).is_err());
    }
}
