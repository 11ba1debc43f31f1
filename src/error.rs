use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepCheckerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("フォルダ名を取得できません: {0}")]
    InvalidFolder(String),

    #[error("既に完了済みのフォルダです: {0}")]
    AlreadyFinished(String),

    #[error("リネーム先が既に存在します: {0}")]
    TargetExists(String),

    #[error("参照データのフォルダが設定されていません。`step-checker config --set-reference DIR` で設定してください")]
    MissingReference,

    #[error("対話入力エラー: {0}")]
    Interaction(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] step_checker_common::Error),
}

pub type Result<T> = std::result::Result<T, StepCheckerError>;
