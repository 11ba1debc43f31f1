//! データセットの型定義
//!
//! CLIと対話エディタで共有される型:
//! - StepId: ステップ識別子（数値 or 文字列）
//! - AnnotationDocument: 1つのJSON注釈ファイル
//! - LoadedFile / FolderLoad: フォルダ読み込み結果
//! - ProgressSnapshot: 兄弟フォルダの完了状況

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::str::FromStr;

/// 完了済みフォルダのサフィックス
pub const FINISHED_SUFFIX: &str = "-finished";

/// トップレベルの指示文キー
pub const INSTRUCTION_KEY: &str = "instruction";

/// ステップ配列キー
pub const STEPS_KEY: &str = "steps";

/// ステップIDキー
pub const STEP_ID_KEY: &str = "step_id";

/// 低レベル指示文キー（編集対象）
pub const LOW_LEVEL_INSTRUCTION_KEY: &str = "low-level_instruction";

/// JSONファイル名か（大文字小文字を区別する完全一致サフィックス）
pub fn is_json_name(name: &str) -> bool {
    name.ends_with(".json")
}

/// ステップ識別子
///
/// JSON上では数値・文字列のどちらでも現れる。比較は正規化した文字列キーで行うため
/// `1`・`1.0`・`"1"` は等しく、`"01"` は `1` と等しくない。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Number(Number),
    Text(String),
}

impl StepId {
    /// JSON値から生成（数値・文字列以外はNone）
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(StepId::Number(n.clone())),
            Value::String(s) => Some(StepId::Text(s.clone())),
            _ => None,
        }
    }

    /// 比較用の正規化キー
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            StepId::Text(s) => Cow::Borrowed(s.as_str()),
            StepId::Number(n) => Cow::Owned(canonical_number(n)),
        }
    }

    /// JSON値のstep_idと一致するか
    pub fn matches(&self, value: &Value) -> bool {
        StepId::from_value(value).is_some_and(|id| id == *self)
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // 小数部ゼロの浮動小数は整数として扱う
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl PartialEq for StepId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for StepId {}

impl Hash for StepId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for StepId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidStepId("空のステップID".to_string()));
        }
        match trimmed.parse::<i64>() {
            Ok(i) => Ok(StepId::Number(i.into())),
            Err(_) => Ok(StepId::Text(trimmed.to_string())),
        }
    }
}

impl From<i64> for StepId {
    fn from(value: i64) -> Self {
        StepId::Number(value.into())
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        StepId::Text(value.to_string())
    }
}

/// `steps` 配列の1要素の型付きビュー
///
/// 編集は元の `Value` に対して行うため、ここに無いフィールドも保存時に失われない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    /// 配列内の位置
    pub index: usize,
    pub step_id: Option<StepId>,
    pub low_level_instruction: Option<String>,
}

impl Step {
    pub fn from_value(index: usize, value: &Value) -> Self {
        Self {
            index,
            step_id: value.get(STEP_ID_KEY).and_then(StepId::from_value),
            low_level_instruction: value
                .get(LOW_LEVEL_INSTRUCTION_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// 表示用ラベル（"Step 3"）
    pub fn label(&self) -> String {
        match &self.step_id {
            Some(id) => format!("Step {}", id),
            None => format!("Step #{}", self.index + 1),
        }
    }
}

/// JSON注釈ファイル1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    /// ファイル名
    pub name: String,
    /// パース済みの内容（形は保証しない）
    pub data: Value,
}

impl AnnotationDocument {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// トップレベルの指示文
    pub fn instruction(&self) -> Option<&str> {
        self.data.get(INSTRUCTION_KEY).and_then(Value::as_str)
    }

    /// ステップ一覧（`steps` が無い・配列でない場合は空）
    pub fn steps(&self) -> Vec<Step> {
        self.data
            .get(STEPS_KEY)
            .and_then(Value::as_array)
            .map(|steps| {
                steps
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Step::from_value(i, v))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 最初に一致したステップ
    pub fn find_step(&self, id: &StepId) -> Option<Step> {
        self.steps()
            .into_iter()
            .find(|s| s.step_id.as_ref() == Some(id))
    }

    /// 最初に一致したステップの低レベル指示文を書き換える
    ///
    /// 書き換えたステップの位置を返す。一致なしならNoneで、内容は変更しない。
    pub fn set_low_level_instruction(&mut self, id: &StepId, text: &str) -> Option<usize> {
        let steps = self.data.get_mut(STEPS_KEY)?.as_array_mut()?;
        let (index, entry) = steps
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.get(STEP_ID_KEY).is_some_and(|v| id.matches(v)))?;
        let object = entry.as_object_mut()?;
        object.insert(
            LOW_LEVEL_INSTRUCTION_KEY.to_string(),
            Value::String(text.to_string()),
        );
        Some(index)
    }

    /// 保存用の整形済みJSON（インデント2、キー順は読み込み順のまま）
    pub fn to_pretty_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}

/// フォルダ内のJSONファイル1件の読み込み結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LoadedFile {
    /// `{name, data}`
    Parsed(AnnotationDocument),
    /// `{name, error}`
    Failed { name: String, error: String },
}

impl LoadedFile {
    pub fn name(&self) -> &str {
        match self {
            LoadedFile::Parsed(doc) => &doc.name,
            LoadedFile::Failed { name, .. } => name,
        }
    }

    pub fn document(&self) -> Option<&AnnotationDocument> {
        match self {
            LoadedFile::Parsed(doc) => Some(doc),
            LoadedFile::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadedFile::Parsed(_) => None,
            LoadedFile::Failed { error, .. } => Some(error),
        }
    }
}

/// 兄弟フォルダの完了状況
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub finished: usize,
}

impl ProgressSnapshot {
    /// エントリ名の一覧から集計
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().fold(Self::default(), |mut acc, name| {
            acc.total += 1;
            if name.as_ref().ends_with(FINISHED_SUFFIX) {
                acc.finished += 1;
            }
            acc
        })
    }

    /// 完了率（0.0〜1.0、totalが0なら0.0）
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.finished as f64 / self.total as f64
        }
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.finished)
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.finished, self.total)
    }
}

/// フォルダ読み込み結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderLoad {
    pub path: PathBuf,
    pub json_files: Vec<LoadedFile>,
    pub progress: ProgressSnapshot,
}

impl FolderLoad {
    /// パースに成功した注釈ファイル
    pub fn documents(&self) -> impl Iterator<Item = &AnnotationDocument> {
        self.json_files.iter().filter_map(LoadedFile::document)
    }

    /// 読み込みに失敗したファイル
    pub fn failures(&self) -> impl Iterator<Item = &LoadedFile> {
        self.json_files.iter().filter(|f| f.error().is_some())
    }

    /// 全ドキュメントのステップID
    pub fn step_ids(&self) -> Vec<StepId> {
        self.documents()
            .flat_map(|doc| doc.steps())
            .filter_map(|s| s.step_id)
            .collect()
    }
}
