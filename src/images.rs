//! ステップ画像（`step_<step_id>.<ext>`）の解決と突き合わせ

use crate::error::Result;
use crate::loader::list_entries;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use step_checker_common::StepId;

lazy_static! {
    static ref STEP_IMAGE_RE: Regex = Regex::new(r"^step_(.+)\.([^.]+)$").unwrap();
}

/// 画像ファイル名
pub fn step_image_name(step_id: &StepId, extension: &str) -> String {
    format!("step_{}.{}", step_id, extension)
}

/// 画像ファイルのパス（存在は確認しない）
pub fn step_image_path(folder: &Path, step_id: &StepId, extension: &str) -> PathBuf {
    folder.join(step_image_name(step_id, extension))
}

/// ファイル名からステップIDを取り出す（拡張子が一致しなければNone）
pub fn parse_step_image_name(name: &str, extension: &str) -> Option<StepId> {
    let caps = STEP_IMAGE_RE.captures(name)?;
    if &caps[2] != extension {
        return None;
    }
    caps[1].parse().ok()
}

/// 画像の突き合わせ結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageAudit {
    /// 画像があるステップ
    pub present: Vec<StepId>,
    /// 画像が無いステップ
    pub missing: Vec<StepId>,
    /// 対応するステップが無い画像ファイル名
    pub orphaned: Vec<String>,
}

impl ImageAudit {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

/// ステップIDと画像ファイルを突き合わせる
pub fn audit_images(folder: &Path, step_ids: &[StepId], extension: &str) -> Result<ImageAudit> {
    let images: Vec<(String, StepId)> = list_entries(folder)?
        .into_iter()
        .filter_map(|(name, _)| parse_step_image_name(&name, extension).map(|id| (name, id)))
        .collect();

    let image_ids: HashSet<&StepId> = images.iter().map(|(_, id)| id).collect();
    let known: HashSet<&StepId> = step_ids.iter().collect();

    let mut audit = ImageAudit::default();
    let mut seen = HashSet::new();

    for id in step_ids {
        if !seen.insert(id) {
            continue;
        }
        if image_ids.contains(id) {
            audit.present.push(id.clone());
        } else {
            audit.missing.push(id.clone());
        }
    }

    audit.orphaned = images
        .iter()
        .filter(|(_, id)| !known.contains(id))
        .map(|(name, _)| name.clone())
        .collect();

    Ok(audit)
}
