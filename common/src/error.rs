//! 共通エラー型
//!
//! `common` はファイルを扱わないため、JSON整形とステップID解析の失敗のみ。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// ドキュメントの整形に失敗
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ステップIDとして解釈できない入力
    #[error("Invalid step id: {0}")]
    InvalidStepId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
