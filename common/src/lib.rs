//! Step Checker Common Library
//!
//! データセット（JSON注釈＋ステップ画像）の型と、ファイルシステムに依存しないユーティリティ

pub mod types;
pub mod error;
pub mod diff;

pub use types::{
    AnnotationDocument, FolderLoad, LoadedFile, ProgressSnapshot, Step, StepId,
    FINISHED_SUFFIX, INSTRUCTION_KEY, LOW_LEVEL_INSTRUCTION_KEY, STEPS_KEY, STEP_ID_KEY,
};
pub use error::{Error, Result};
pub use diff::{diff_values, Difference, DifferenceKind};
