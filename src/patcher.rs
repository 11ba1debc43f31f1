//! 低レベル指示文の書き戻し
//!
//! フォルダ内のJSONを列挙順に調べ、最初に見つかった `step_id` 一致のステップだけを書き換える。
//! 書き込みは一時ファイル経由のリネームで行い、途中状態のファイルを残さない。

use crate::error::Result;
use crate::loader::{list_json_files, read_document};
use std::io::Write;
use std::path::{Path, PathBuf};
use step_checker_common::StepId;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// 書き戻しの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// 書き換えたファイルと `steps` 内の位置
    Updated { file: PathBuf, step_index: usize },
    /// 一致するステップなし（ファイルは変更しない）
    NotFound,
}

/// ステップの低レベル指示文を更新する
///
/// 一致なしはエラーではなく `PatchOutcome::NotFound`。
/// 一致より前に読んだJSONが壊れていた場合はエラーを返す。
pub fn patch_step(folder: &Path, step_id: &StepId, instruction: &str) -> Result<PatchOutcome> {
    for (name, path) in list_json_files(folder)? {
        let mut document = read_document(&name, &path)?;

        let Some(step_index) = document.set_low_level_instruction(step_id, instruction) else {
            debug!("{}: step_id={} なし", name, step_id);
            continue;
        };

        // 全体を文字列化してから書き込む
        let content = document.to_pretty_json()?;
        write_atomic(&path, &content)?;

        info!("{}: step_id={} を更新", path.display(), step_id);
        return Ok(PatchOutcome::Updated {
            file: path,
            step_index,
        });
    }

    info!("{}: step_id={} が見つからないため更新なし", folder.display(), step_id);
    Ok(PatchOutcome::NotFound)
}

/// 同じディレクトリの一時ファイルに書いてから置き換える
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;

    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
