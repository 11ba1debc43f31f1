//! 対話式の指示文編集
//!
//! フォルダを読み込み、ステップごとに低レベル指示文を確認・編集する。
//! 変更はその場で `patch_step` により書き戻す。

use crate::config::Config;
use crate::error::{Result, StepCheckerError};
use crate::finisher;
use crate::images;
use crate::loader;
use crate::patcher::{self, PatchOutcome};
use dialoguer::Input;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use step_checker_common::{FolderLoad, Step, StepId};
use tracing::warn;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// 変更なし
    Keep,
    /// 指示文を置き換え
    Replace(String),
    /// このステップをスキップ
    Skip,
    /// 終了
    Quit,
    /// フォルダを完了にして終了
    Finish,
}

/// 編集セッションの集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub updated: usize,
    pub skipped: usize,
    pub finished_path: Option<PathBuf>,
}

/// 入力をアクションに変換
///
/// 入力は前後の空白を除いて扱う。空入力は変更なし、`:c` で空文字列にする。
pub fn parse_action(input: &str, current: Option<&str>) -> EditAction {
    let trimmed = input.trim();

    match trimmed {
        ":s" => EditAction::Skip,
        ":q" => EditAction::Quit,
        ":f" => EditAction::Finish,
        ":c" if current.is_some_and(|c| !c.is_empty()) => EditAction::Replace(String::new()),
        ":c" | "" => EditAction::Keep,
        _ if current.map(str::trim) == Some(trimmed) => EditAction::Keep,
        _ => EditAction::Replace(trimmed.to_string()),
    }
}

/// 複数ドキュメントで重複しているステップID
pub fn duplicate_step_ids(load: &FolderLoad) -> Vec<StepId> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for id in load.step_ids() {
        if !seen.insert(id.clone()) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// フォルダパスを入力（空ならキャンセル）
pub fn prompt_folder() -> Result<Option<PathBuf>> {
    let input: String = Input::new()
        .with_prompt("データセットフォルダ (空でキャンセル)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| StepCheckerError::Interaction(e.to_string()))?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

fn prompt_step(step: &Step) -> Result<EditAction> {
    let current = step.low_level_instruction.as_deref();

    let input: String = Input::new()
        .with_prompt("指示文 (:c 消去 :s スキップ :q 終了 :f 完了)")
        .with_initial_text(current.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| StepCheckerError::Interaction(e.to_string()))?;

    Ok(parse_action(&input, current))
}

fn print_header(load: &FolderLoad) {
    println!("📂 {}", load.path.display());
    println!(
        "進捗: {} 完了 ({:.0}%)",
        load.progress,
        load.progress.ratio() * 100.0
    );

    for failed in load.failures() {
        println!("⚠ {}: {}", failed.name(), failed.error().unwrap_or_default());
    }

    for doc in load.documents() {
        if let Some(instruction) = doc.instruction() {
            println!("[{}] {}", doc.name, instruction);
        }
    }
    println!("---");
}

/// 対話式で編集
pub fn run_interactive_editor(folder: Option<PathBuf>, config: &Config) -> Result<EditSummary> {
    let folder = match folder {
        Some(folder) => folder,
        None => match prompt_folder()? {
            Some(folder) => folder,
            None => {
                println!("キャンセルしました");
                return Ok(EditSummary::default());
            }
        },
    };

    edit_folder(&folder, config)
}

fn edit_folder(folder: &Path, config: &Config) -> Result<EditSummary> {
    let load = loader::load_folder(folder)?;
    print_header(&load);

    let duplicates = duplicate_step_ids(&load);
    if !duplicates.is_empty() {
        warn!(
            "重複したstep_idがあります。最初のファイルのステップが更新されます: {:?}",
            duplicates.iter().map(ToString::to_string).collect::<Vec<_>>()
        );
    }

    let steps: Vec<(String, Step)> = load
        .documents()
        .flat_map(|doc| doc.steps().into_iter().map(move |s| (doc.name.clone(), s)))
        .collect();

    if steps.is_empty() {
        println!("ステップがありません");
    }

    let mut summary = EditSummary::default();

    for (count, (doc_name, step)) in steps.iter().enumerate() {
        let Some(step_id) = &step.step_id else {
            continue;
        };

        let image = images::step_image_path(folder, step_id, &config.image_extension);
        println!(
            "[{}/{}] {} ({}) 画像: {}{}",
            count + 1,
            steps.len(),
            step.label(),
            doc_name,
            image.display(),
            if image.exists() { "" } else { " (なし)" }
        );

        match prompt_step(step)? {
            EditAction::Keep => {}
            EditAction::Replace(text) => match patcher::patch_step(folder, step_id, &text)? {
                PatchOutcome::Updated { file, .. } => {
                    summary.updated += 1;
                    println!("  ✔ 保存: {}", file.display());
                }
                PatchOutcome::NotFound => {
                    println!("  ⚠ ステップが見つかりません（ファイルが外部で変更された可能性）");
                }
            },
            EditAction::Skip => {
                summary.skipped += 1;
            }
            EditAction::Quit => break,
            EditAction::Finish => {
                let new_path = finisher::mark_finished(folder)?;
                println!("✔ 完了: {}", new_path.display());
                summary.finished_path = Some(new_path);
                break;
            }
        }
        println!();
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use step_checker_common::{AnnotationDocument, LoadedFile, ProgressSnapshot};

    #[test]
    fn test_parse_action_commands() {
        assert_eq!(parse_action(":s", Some("x")), EditAction::Skip);
        assert_eq!(parse_action(" :q ", None), EditAction::Quit);
        assert_eq!(parse_action(":f", None), EditAction::Finish);
    }

    #[test]
    fn test_parse_action_keep() {
        assert_eq!(parse_action("", Some("old")), EditAction::Keep);
        assert_eq!(parse_action("old ", Some("old")), EditAction::Keep);
    }

    #[test]
    fn test_parse_action_replace() {
        assert_eq!(
            parse_action("pick up the cup", Some("old")),
            EditAction::Replace("pick up the cup".to_string())
        );
        assert_eq!(
            parse_action("new", None),
            EditAction::Replace("new".to_string())
        );
    }

    #[test]
    fn test_parse_action_clear() {
        assert_eq!(
            parse_action(":c", Some("old")),
            EditAction::Replace(String::new())
        );
        assert_eq!(parse_action(" :c ", Some("old")), EditAction::Replace(String::new()));
        assert_eq!(parse_action(":c", Some("")), EditAction::Keep);
        assert_eq!(parse_action(":c", None), EditAction::Keep);
    }

    #[test]
    fn test_duplicate_step_ids() {
        let load = FolderLoad {
            path: PathBuf::from("/data/item1"),
            json_files: vec![
                LoadedFile::Parsed(AnnotationDocument::new(
                    "a.json",
                    json!({"steps": [{"step_id": 1}, {"step_id": 2}]}),
                )),
                LoadedFile::Parsed(AnnotationDocument::new(
                    "b.json",
                    json!({"steps": [{"step_id": "1"}, {"step_id": 3}, {"step_id": 1}]}),
                )),
            ],
            progress: ProgressSnapshot::default(),
        };

        assert_eq!(duplicate_step_ids(&load), vec![StepId::from(1i64)]);
    }
}
