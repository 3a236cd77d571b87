//! ギャラリーの型定義
//!
//! CLIと他のフロントエンドで共有される型:
//! - UserPhoto: 保存済み写真のレコード
//! - CameraOptions / CapturedPhoto: カメラへの要求と撮影結果

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 保存済み写真レコード
///
/// 永続化形式は `{"filepath": ..., "webviewPath": ...}`。
/// 作成後は変更されず、削除のみ行われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPhoto {
    /// ファイル操作に使うパス（ネイティブはファイルURI、Webはファイル名）
    pub filepath: String,

    /// 表示用パス（WebView用URL または data URI）
    pub webview_path: String,
}

impl UserPhoto {
    pub fn new(filepath: impl Into<String>, webview_path: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            webview_path: webview_path.into(),
        }
    }

    /// データディレクトリ内のファイル名（最後の `/` 以降）
    pub fn file_name(&self) -> &str {
        crate::uri::file_name_of(&self.filepath)
    }
}

/// カメラ結果の受け取り方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraResultType {
    /// ファイル参照（path / web_path）
    #[default]
    Uri,
    /// base64文字列
    Base64,
    /// data URL
    DataUrl,
}

/// 撮影ソース
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSource {
    /// 利用者に選ばせる
    Prompt,
    /// カメラで撮影
    #[default]
    Camera,
    /// 既存の写真から選択
    Photos,
}

/// 撮影リクエスト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraOptions {
    pub result_type: CameraResultType,
    pub source: CameraSource,
    /// JPEG品質 (0-100)
    pub quality: u8,
}

impl CameraOptions {
    pub const MAX_QUALITY: u8 = 100;

    /// ギャラリーが使う設定: ファイル参照・カメラ・最高品質
    pub fn gallery() -> Self {
        Self {
            result_type: CameraResultType::Uri,
            source: CameraSource::Camera,
            quality: Self::MAX_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Result<Self> {
        if quality > Self::MAX_QUALITY {
            return Err(Error::InvalidQuality(quality));
        }
        self.quality = quality;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality > Self::MAX_QUALITY {
            return Err(Error::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self::gallery()
    }
}

/// 撮影結果（一時的な画像参照）
///
/// どのフィールドが埋まるかは `CameraResultType` による。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapturedPhoto {
    /// ローカルファイルパス（Uri）
    pub path: Option<String>,
    /// 取得可能なWebパス（Uri）
    pub web_path: Option<String>,
    /// base64データ（Base64）
    pub base64_string: Option<String>,
    /// data URL（DataUrl）
    pub data_url: Option<String>,
    /// 画像形式 (jpeg/png...)
    pub format: String,
}
