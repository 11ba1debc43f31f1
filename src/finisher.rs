//! 完了マーク（フォルダ名に `-finished` を付けてリネーム）

use crate::error::{Result, StepCheckerError};
use std::path::{Path, PathBuf};
use step_checker_common::FINISHED_SUFFIX;
use tracing::info;

/// フォルダのベース名
pub fn base_name(folder: &Path) -> Result<String> {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| StepCheckerError::InvalidFolder(folder.display().to_string()))
}

/// 完了済みの名前か
pub fn is_finished(folder: &Path) -> bool {
    folder
        .file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(FINISHED_SUFFIX))
}

/// 完了後のパス（同じ親ディレクトリ、ベース名＋サフィックス）
pub fn finished_path(folder: &Path) -> Result<PathBuf> {
    let mut name = folder
        .file_name()
        .ok_or_else(|| StepCheckerError::InvalidFolder(folder.display().to_string()))?
        .to_os_string();
    name.push(FINISHED_SUFFIX);
    Ok(folder.with_file_name(name))
}

/// フォルダを完了済みにリネームし、新しいパスを返す
pub fn mark_finished(folder: &Path) -> Result<PathBuf> {
    if !folder.is_dir() {
        return Err(StepCheckerError::FolderNotFound(folder.display().to_string()));
    }
    if is_finished(folder) {
        return Err(StepCheckerError::AlreadyFinished(base_name(folder)?));
    }

    let new_path = finished_path(folder)?;

    // 空ディレクトリへのrenameは上書きされてしまうため事前に確認
    if new_path.symlink_metadata().is_ok() {
        return Err(StepCheckerError::TargetExists(new_path.display().to_string()));
    }

    std::fs::rename(folder, &new_path)?;
    info!("{} -> {}", folder.display(), new_path.display());

    Ok(new_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_path() {
        assert_eq!(
            finished_path(Path::new("/data/item1")).unwrap(),
            PathBuf::from("/data/item1-finished")
        );
        assert_eq!(
            finished_path(Path::new("/data/item1/")).unwrap(),
            PathBuf::from("/data/item1-finished")
        );
        assert!(finished_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_is_finished() {
        assert!(is_finished(Path::new("/data/item1-finished")));
        assert!(!is_finished(Path::new("/data/item1")));
        assert!(!is_finished(Path::new("/data/item1-finished-old")));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("/data/item1")).unwrap(), "item1");
        assert!(matches!(
            base_name(Path::new("/")),
            Err(StepCheckerError::InvalidFolder(_))
        ));
    }
}
