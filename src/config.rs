use crate::error::{Result, StepCheckerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 参照データフォルダの環境変数（設定ファイルより優先）
pub const REFERENCE_DIR_ENV: &str = "STEP_CHECKER_REFERENCE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 比較用の参照データセット
    pub reference_dir: Option<PathBuf>,
    /// ステップ画像の拡張子（step_<id>.<ext>）
    pub image_extension: String,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracingのフィルタ（RUST_LOGが優先）
    pub level: String,
    /// ファイルにも出力する
    pub to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_dir: None,
            image_extension: "jpg".into(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            to_file: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| StepCheckerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("step-checker"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn logs_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }

    pub fn get_reference_dir(&self) -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(dir) = std::env::var(REFERENCE_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        self.reference_dir.clone().ok_or(StepCheckerError::MissingReference)
    }

    pub fn set_reference_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.reference_dir = Some(dir);
        self.save()
    }

    pub fn set_log_level(&mut self, level: String) -> Result<()> {
        self.logging.level = level;
        self.save()
    }
}
