use clap::{Parser, Subcommand};
use std::path::PathBuf;
use step_checker_common::StepId;

#[derive(Parser)]
#[command(name = "step-checker")]
#[command(about = "ステップ指示データセットの確認・編集ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// フォルダのJSONを読み込んで表示
    Load {
        /// データセットフォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 読み込み結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ステップ一覧と画像の有無を表示
    Steps {
        /// データセットフォルダ
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// ステップの低レベル指示文を更新
    Patch {
        /// データセットフォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// ステップID（数値または文字列）
        #[arg(required = true, value_parser = parse_step_id)]
        step_id: StepId,

        /// 新しい指示文
        #[arg(required = true)]
        instruction: String,
    },

    /// フォルダを完了済みにする（`-finished` を付けてリネーム）
    Finish {
        /// データセットフォルダ
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// 完了状況を表示
    Progress {
        /// データセットフォルダ（--root 指定時はデータセットのルート）
        #[arg(required = true)]
        path: PathBuf,

        /// 指定ディレクトリ自体の直下を集計
        #[arg(long)]
        root: bool,
    },

    /// 対話的に指示文を編集
    Edit {
        /// データセットフォルダ（省略時は入力）
        folder: Option<PathBuf>,
    },

    /// 完了済みフォルダを参照データと比較
    Review {
        /// 確認済みデータセットのルート
        #[arg(required = true)]
        checked: PathBuf,

        /// 参照データセットのルート（省略時は設定値）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 差分の詳細を表示
        #[arg(long)]
        details: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 参照データセットを設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// ログレベルを設定（trace/debug/info/warn/error）
        #[arg(long)]
        set_log_level: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

fn parse_step_id(s: &str) -> Result<StepId, String> {
    s.parse().map_err(|e: step_checker_common::Error| e.to_string())
}
