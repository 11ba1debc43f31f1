//! データセットフォルダ読み込み
//!
//! フォルダ直下のJSONファイルを列挙順にパースし、
//! 兄弟フォルダの完了状況と合わせて返す。読み込み専用。

pub mod progress;

use crate::error::{Result, StepCheckerError};
use std::path::{Path, PathBuf};
use step_checker_common::types::is_json_name;
use step_checker_common::{AnnotationDocument, FolderLoad, LoadedFile};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// フォルダ直下のエントリ（名前, パス）
///
/// 並び順はディレクトリの列挙順のまま（ソートしない）。
pub fn list_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Err(StepCheckerError::FolderNotFound(dir.display().to_string()));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                entries.push((name, entry.into_path()));
            }
            // フォルダ自体が読めない
            Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
            Err(e) => warn!("エントリを読めません: {}", e),
        }
    }

    Ok(entries)
}

/// フォルダ直下の `.json` ファイル（名前, パス）
pub fn list_json_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(list_entries(dir)?
        .into_iter()
        .filter(|(name, _)| is_json_name(name))
        .collect())
}

/// JSONファイルを1件読み込む
pub fn read_document(name: &str, path: &Path) -> Result<AnnotationDocument> {
    let content = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&content)?;
    Ok(AnnotationDocument::new(name, data))
}

fn load_file(name: String, path: &Path) -> LoadedFile {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(data) => LoadedFile::Parsed(AnnotationDocument::new(name, data)),
        Err(error) => {
            warn!("{} を読み込めません: {}", path.display(), error);
            LoadedFile::Failed { name, error }
        }
    }
}

/// フォルダを読み込む
///
/// 壊れたJSONは `LoadedFile::Failed` として返し、読み込み全体は中断しない。
/// フォルダ自体が存在しない・列挙できない場合のみエラー。
pub fn load_folder(folder: &Path) -> Result<FolderLoad> {
    let json_files = list_json_files(folder)?;
    debug!("{}: JSONファイル {}件", folder.display(), json_files.len());

    let progress = progress::count_progress(folder);

    let json_files = json_files
        .into_iter()
        .map(|(name, path)| load_file(name, &path))
        .collect();

    Ok(FolderLoad {
        path: folder.to_path_buf(),
        json_files,
        progress,
    })
}
