//! JSON構造差分
//!
//! 完了済みフォルダと参照データの比較に使う。
//! オブジェクトはキー単位、配列はインデックス単位で再帰的に比較する。

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// 差分の種類
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DifferenceKind {
    /// 比較対象にのみ存在
    Added { value: Value },
    /// 参照側にのみ存在
    Removed { value: Value },
    /// 値が異なる
    Changed { before: Value, after: Value },
}

/// 差分1件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// JSONポインタ形式のパス（ルートは空文字列）
    pub path: String,
    #[serde(flatten)]
    pub kind: DifferenceKind,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            DifferenceKind::Added { value } => write!(f, "+ {}: {}", path, value),
            DifferenceKind::Removed { value } => write!(f, "- {}: {}", path, value),
            DifferenceKind::Changed { before, after } => {
                write!(f, "~ {}: {} -> {}", path, before, after)
            }
        }
    }
}

/// `reference` から `checked` への差分を列挙
pub fn diff_values(reference: &Value, checked: &Value) -> Vec<Difference> {
    let mut differences = Vec::new();
    diff_at(String::new(), reference, checked, &mut differences);
    differences
}

fn diff_at(path: String, reference: &Value, checked: &Value, out: &mut Vec<Difference>) {
    match (reference, checked) {
        (Value::Object(before), Value::Object(after)) => {
            for (key, old) in before {
                let child = child_path(&path, key);
                match after.get(key) {
                    Some(new) => diff_at(child, old, new, out),
                    None => out.push(Difference {
                        path: child,
                        kind: DifferenceKind::Removed { value: old.clone() },
                    }),
                }
            }
            for (key, new) in after {
                if !before.contains_key(key) {
                    out.push(Difference {
                        path: child_path(&path, key),
                        kind: DifferenceKind::Added { value: new.clone() },
                    });
                }
            }
        }
        (Value::Array(before), Value::Array(after)) => {
            let shared = before.len().min(after.len());
            for i in 0..shared {
                diff_at(child_path(&path, &i.to_string()), &before[i], &after[i], out);
            }
            for (i, old) in before.iter().enumerate().skip(shared) {
                out.push(Difference {
                    path: child_path(&path, &i.to_string()),
                    kind: DifferenceKind::Removed { value: old.clone() },
                });
            }
            for (i, new) in after.iter().enumerate().skip(shared) {
                out.push(Difference {
                    path: child_path(&path, &i.to_string()),
                    kind: DifferenceKind::Added { value: new.clone() },
                });
            }
        }
        _ if reference != checked => out.push(Difference {
            path,
            kind: DifferenceKind::Changed {
                before: reference.clone(),
                after: checked.clone(),
            },
        }),
        _ => {}
    }
}

/// RFC 6901 のエスケープ（`~` → `~0`, `/` → `~1`）
fn child_path(parent: &str, token: &str) -> String {
    format!("{}/{}", parent, token.replace('~', "~0").replace('/', "~1"))
}
