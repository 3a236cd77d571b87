//! Photo Gallery
//!
//! 撮影・保存・一覧・削除を行う写真ギャラリー。
//! カメラ・ファイルシステム・キーバリューストアはトレイトとして注入し、
//! 実行環境の違いは `PlatformStorage` の実装で吸収する。

pub mod app;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod error;
pub mod page;
pub mod platform;
pub mod prompt;
pub mod service;

pub use error::{PhotoGalleryError, Result};
pub use page::GalleryPage;
pub use platform::{NativeStorage, Platform, PlatformStorage, WebStorage};
pub use service::PhotoService;
