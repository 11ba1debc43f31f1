//! ログ初期化
//!
//! 通常: stderr に出力
//! `logging.to_file` 有効時: `~/.config/step-checker/logs/step-checker-{datetime}.log` にも出力

use crate::config::Config;
use crate::error::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ログ初期化の結果（プロセス終了まで保持すること）
pub struct LoggingHandle {
    /// ドロップ時にバッファ済みログを書き出す
    pub _guard: Option<WorkerGuard>,
    pub log_file_path: Option<PathBuf>,
}

impl LoggingHandle {
    /// ファイル出力時の案内（ファイル出力なしなら None）
    pub fn file_notice(&self) -> Option<String> {
        self.log_file_path
            .as_ref()
            .map(|path| format!("ログファイル: {}", path.display()))
    }
}

/// `--verbose` 指定時は debug、それ以外は設定値。RUST_LOG があればそちらを使う
pub fn effective_level(config: &Config, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// ログファイル名（UTCタイムスタンプ付き）
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("step-checker-{}.log", timestamp)
}

pub fn init_logging(config: &Config, verbose: bool) -> Result<LoggingHandle> {
    let level = effective_level(config, verbose);
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.logging.to_file {
        let logs_dir = Config::logs_path()?;
        std::fs::create_dir_all(&logs_dir)?;

        let log_filename = log_file_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}
