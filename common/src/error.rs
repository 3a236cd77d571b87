//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Invalid quality: {0} (expected 0-100)")]
    InvalidQuality(u8),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
