//! 参照データとの比較
//!
//! 確認済みデータセット直下の `-finished` フォルダごとに、
//! 参照データセットの同名フォルダ（サフィックスなし）内の同名JSONと構造比較する。
//!
//! ```text
//! checked/item1-finished/ann.json  <->  reference/item1/ann.json
//! ```

use crate::error::Result;
use crate::loader::{list_entries, list_json_files};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use step_checker_common::{diff_values, Difference, FINISHED_SUFFIX};
use tracing::{debug, warn};

/// JSONファイル1件の比較結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReview {
    pub name: String,
    pub differences: Vec<Difference>,
    pub error: Option<String>,
}

/// 完了済みフォルダ1件の比較結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    /// 完了済みフォルダ名
    pub folder: String,
    /// 参照側のフォルダ
    pub reference: PathBuf,
    pub files: Vec<FileReview>,
    /// フォルダ単位のエラー（JSONが列挙できない等）
    pub error: Option<String>,
}

impl ReviewItem {
    pub fn is_different(&self) -> bool {
        self.files.iter().any(|f| !f.differences.is_empty())
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some() || self.files.iter().any(|f| f.error.is_some())
    }
}

/// 比較結果全体
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewReport {
    pub items: Vec<ReviewItem>,
}

impl ReviewReport {
    /// 比較したフォルダ数
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// 差分のあったフォルダ数
    pub fn differing(&self) -> usize {
        self.items.iter().filter(|i| i.is_different()).count()
    }

    /// エラーのあったフォルダ数
    pub fn errors(&self) -> usize {
        self.items.iter().filter(|i| i.has_error()).count()
    }
}

/// 確認済みデータセット直下の完了済みフォルダ（名前, パス）
pub fn finished_folders(checked_root: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(list_entries(checked_root)?
        .into_iter()
        .filter(|(name, path)| name.ends_with(FINISHED_SUFFIX) && path.is_dir())
        .collect())
}

fn read_json(path: &Path) -> std::result::Result<Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

fn review_file(name: String, reference: &Path, checked: &Path) -> FileReview {
    let compared = read_json(reference)
        .and_then(|before| read_json(checked).map(|after| diff_values(&before, &after)));

    match compared {
        Ok(differences) => FileReview {
            name,
            differences,
            error: None,
        },
        Err(error) => {
            warn!("比較できません: {}", error);
            FileReview {
                name,
                differences: Vec::new(),
                error: Some(error),
            }
        }
    }
}

/// 完了済みフォルダ1件を比較
pub fn review_folder(reference_root: &Path, folder_name: &str, folder: &Path) -> ReviewItem {
    let base = folder_name.strip_suffix(FINISHED_SUFFIX).unwrap_or(folder_name);
    let reference = reference_root.join(base);

    let mut item = ReviewItem {
        folder: folder_name.to_string(),
        reference: reference.clone(),
        files: Vec::new(),
        error: None,
    };

    let files = match list_json_files(folder) {
        Ok(files) => files,
        Err(e) => {
            item.error = Some(e.to_string());
            return item;
        }
    };

    if files.is_empty() {
        item.error = Some("JSONファイルがありません".to_string());
        return item;
    }

    item.files = files
        .into_iter()
        .map(|(name, checked)| {
            let reference_file = reference.join(&name);
            review_file(name, &reference_file, &checked)
        })
        .collect();

    debug!(
        "{}: {}ファイル, 差分{}",
        folder_name,
        item.files.len(),
        if item.is_different() { "あり" } else { "なし" }
    );

    item
}

/// 全完了済みフォルダを比較
pub fn review_finished(checked_root: &Path, reference_root: &Path) -> Result<ReviewReport> {
    review_finished_with(checked_root, reference_root, |_, _, _| {})
}

/// 全完了済みフォルダを比較し、1件ごとに `on_item(完了件数, 総数, 結果)` を呼ぶ
pub fn review_finished_with<F>(
    checked_root: &Path,
    reference_root: &Path,
    mut on_item: F,
) -> Result<ReviewReport>
where
    F: FnMut(usize, usize, &ReviewItem),
{
    let folders = finished_folders(checked_root)?;
    let total = folders.len();

    let mut report = ReviewReport::default();
    for (done, (name, path)) in folders.into_iter().enumerate() {
        let item = review_folder(reference_root, &name, &path);
        on_item(done + 1, total, &item);
        report.items.push(item);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let same = ReviewItem {
            folder: "a-finished".into(),
            reference: PathBuf::from("/ref/a"),
            files: vec![FileReview { name: "a.json".into(), differences: vec![], error: None }],
            error: None,
        };
        let broken = ReviewItem {
            folder: "b-finished".into(),
            reference: PathBuf::from("/ref/b"),
            files: vec![],
            error: Some("JSONファイルがありません".into()),
        };
        let report = ReviewReport { items: vec![same, broken] };

        assert_eq!(report.total(), 2);
        assert_eq!(report.differing(), 0);
        assert_eq!(report.errors(), 1);
    }
}
