//! Step Checker
//!
//! ステップ指示データセット（JSON注釈＋ステップ画像）の読み込み・指示文編集・完了管理

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod finisher;
pub mod images;
pub mod loader;
pub mod logging;
pub mod patcher;
pub mod review;

pub use step_checker_common as common;
