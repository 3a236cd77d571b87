//! Photo Gallery Common Library
//!
//! CLIとその他のフロントエンドで共有される型とユーティリティ

pub mod error;
pub mod gallery;
pub mod types;
pub mod uri;

pub use error::{Error, Result};
pub use gallery::PhotoList;
pub use types::{CameraOptions, CameraResultType, CameraSource, CapturedPhoto, UserPhoto};
pub use uri::{convert_file_src, file_name_of, DataUri};

/// 写真リストを保存するキー
pub const PHOTO_STORAGE_KEY: &str = "photos";
