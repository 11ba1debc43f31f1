//! 指示文書き戻しの統合テスト
//!
//! 対象ステップのみ変更されること、一致なしで書き込まないことを検証

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use step_checker::common::StepId;
use step_checker::loader::load_folder;
use step_checker::patcher::{patch_step, PatchOutcome};
use tempfile::{tempdir, TempDir};

fn setup(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let root = tempdir().expect("Failed to create temp dir");
    let folder = root.path().join("item1");
    fs::create_dir(&folder).unwrap();
    for (name, content) in files {
        fs::write(folder.join(name), content).unwrap();
    }
    (root, folder)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// patch → load で新しい指示文、他のフィールドはそのまま
#[test]
fn test_patch_then_load() {
    let (_root, folder) = setup(&[(
        "ann.json",
        r#"{"instruction":"do X","steps":[{"step_id":1,"low-level_instruction":"old"}]}"#,
    )]);

    let outcome = patch_step(&folder, &StepId::from(1i64), "new text").unwrap();
    assert_eq!(
        outcome,
        PatchOutcome::Updated { file: folder.join("ann.json"), step_index: 0 }
    );

    let load = load_folder(&folder).unwrap();
    let doc = load.documents().next().unwrap();
    assert_eq!(doc.instruction(), Some("do X"));
    assert_eq!(
        doc.find_step(&StepId::from(1i64)).unwrap().low_level_instruction.as_deref(),
        Some("new text")
    );
}

/// 空文字列で指示文を消去できる
#[test]
fn test_patch_clears_instruction() {
    let (_root, folder) = setup(&[(
        "ann.json",
        r#"{"steps":[{"step_id":1,"low-level_instruction":"old"}]}"#,
    )]);

    patch_step(&folder, &StepId::from(1i64), "").unwrap();

    let written = read_json(&folder.join("ann.json"));
    assert_eq!(written["steps"][0]["low-level_instruction"], json!(""));
}

/// 他のフィールド・他のステップ・キー順を保持
#[test]
fn test_patch_preserves_everything_else() {
    let original = r#"{
  "zeta": {"nested": [1, 2, {"k": null}]},
  "instruction": "make tea",
  "steps": [
    {"step_id": 1, "low-level_instruction": "boil water", "bbox": [0.1, 0.2]},
    {"step_id": 2, "action": "pour", "low-level_instruction": "pour water"}
  ],
  "alpha": true
}"#;
    let (_root, folder) = setup(&[("ann.json", original)]);
    let path = folder.join("ann.json");

    patch_step(&folder, &StepId::from(2i64), "pour hot water").unwrap();

    let mut expected: Value = serde_json::from_str(original).unwrap();
    expected["steps"][1]["low-level_instruction"] = json!("pour hot water");
    assert_eq!(read_json(&path), expected);

    // キー順は元のまま、インデントは2スペース
    let written = fs::read_to_string(&path).unwrap();
    let zeta = written.find("\"zeta\"").unwrap();
    let instruction = written.find("\"instruction\"").unwrap();
    let alpha = written.find("\"alpha\"").unwrap();
    assert!(zeta < instruction && instruction < alpha);
    assert!(written.starts_with("{\n  \"zeta\""));
    let action = written.find("\"action\"").unwrap();
    let pour = written.find("pour hot water").unwrap();
    assert!(action < pour);
}

/// 一致なしは書き込まない
#[test]
fn test_patch_unknown_step_is_noop() {
    let content = r#"{"steps":[{"step_id":1,"low-level_instruction":"old"}]}"#;
    let (_root, folder) = setup(&[("a.json", content), ("b.json", r#"{"instruction": "no steps"}"#)]);

    let outcome = patch_step(&folder, &StepId::from(42i64), "ignored").unwrap();
    assert_eq!(outcome, PatchOutcome::NotFound);

    // 整形し直されていない＝書き込みが発生していない
    assert_eq!(fs::read_to_string(folder.join("a.json")).unwrap(), content);
    assert_eq!(
        fs::read_to_string(folder.join("b.json")).unwrap(),
        r#"{"instruction": "no steps"}"#
    );
}

/// JSONが無いフォルダも一致なし
#[test]
fn test_patch_empty_folder() {
    let (_root, folder) = setup(&[]);
    assert_eq!(
        patch_step(&folder, &StepId::from(1i64), "x").unwrap(),
        PatchOutcome::NotFound
    );
}

/// 文字列のステップIDでも数値IDに一致する
#[test]
fn test_patch_normalized_step_id() {
    let (_root, folder) = setup(&[("ann.json", r#"{"steps":[{"step_id":"7"},{"step_id":3}]}"#)]);

    let id: StepId = "3".parse().unwrap();
    patch_step(&folder, &id, "by text id").unwrap();
    let id: StepId = "7".parse().unwrap();
    patch_step(&folder, &id, "by numeric id").unwrap();

    let value = read_json(&folder.join("ann.json"));
    assert_eq!(value["steps"][0]["low-level_instruction"], "by numeric id");
    assert_eq!(value["steps"][1]["low-level_instruction"], "by text id");
    // step_idの型は変えない
    assert_eq!(value["steps"][0]["step_id"], json!("7"));
    assert_eq!(value["steps"][1]["step_id"], json!(3));
}

/// 最初に一致したファイルのみ更新
#[test]
fn test_patch_stops_at_first_match() {
    let (_root, folder) = setup(&[
        ("a.json", r#"{"steps":[{"step_id":1,"low-level_instruction":"a"}]}"#),
        ("b.json", r#"{"steps":[{"step_id":1,"low-level_instruction":"b"}]}"#),
    ]);

    let outcome = patch_step(&folder, &StepId::from(1i64), "changed").unwrap();
    let PatchOutcome::Updated { file, .. } = outcome else {
        panic!("更新されていない");
    };

    let updated = read_json(&file);
    assert_eq!(updated["steps"][0]["low-level_instruction"], "changed");

    let other = if file.ends_with("a.json") { "b.json" } else { "a.json" };
    let untouched = read_json(&folder.join(other));
    assert_ne!(untouched["steps"][0]["low-level_instruction"], "changed");
}

/// 壊れたJSONしかない場合はエラー、ファイルは変更しない
#[test]
fn test_patch_parse_error_is_reported() {
    let (_root, folder) = setup(&[("broken.json", "{ invalid")]);

    let result = patch_step(&folder, &StepId::from(1i64), "x");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(folder.join("broken.json")).unwrap(), "{ invalid");
}

/// 書き込み後に一時ファイルが残らない
#[test]
fn test_patch_leaves_no_temp_files() {
    let (_root, folder) = setup(&[("ann.json", r#"{"steps":[{"step_id":1}]}"#)]);

    patch_step(&folder, &StepId::from(1i64), "x").unwrap();

    let names: Vec<String> = fs::read_dir(&folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ann.json".to_string()]);
}
