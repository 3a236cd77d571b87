use crate::capabilities::camera::OUTPUT_PLACEHOLDER;
use crate::capabilities::FilePreferences;
use crate::error::{PhotoGalleryError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "PHOTO_GALLERY_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub platform: Platform,
    pub data_dir: Option<PathBuf>,
    /// 撮影コマンドのプログラム（例: `fswebcam`）
    pub capture_command: Option<String>,
    /// 撮影コマンドの引数（`{output}` が保存先、`{quality}` が品質に置換される）
    pub capture_args: Vec<String>,
    pub quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: Platform::Native,
            data_dir: None,
            capture_command: None,
            capture_args: vec![OUTPUT_PLACEHOLDER.to_string()],
            quality: 100,
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

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoGalleryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-gallery").join("config.json"))
    }

    /// データのルート（環境変数 > 設定 > OS既定）
    pub fn data_root(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir()
            .ok_or_else(|| PhotoGalleryError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("photo-gallery"))
    }

    pub fn set_capture_command(&mut self, program: String) -> Result<()> {
        if program.trim().is_empty() {
            return Err(PhotoGalleryError::Config("撮影コマンドが空です".into()));
        }
        self.capture_command = Some(program);
        Ok(())
    }

    /// 撮影コマンドの引数を置き換える（空なら `{output}` のみ）
    pub fn set_capture_args(&mut self, args: Vec<String>) {
        self.capture_args = if args.is_empty() {
            vec![OUTPUT_PLACEHOLDER.to_string()]
        } else {
            args
        };
    }

    pub fn set_quality(&mut self, quality: u8) -> Result<()> {
        if quality > 100 {
            return Err(PhotoGalleryError::Config(format!("品質は0-100で指定してください: {}", quality)));
        }
        self.quality = quality;
        Ok(())
    }
}

/// データルート配下のパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
}

impl AppPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 保存画像
    pub fn photos_dir(&self) -> PathBuf {
        self.root.join("photos")
    }

    /// 撮影直後の一時ファイル
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.root.join(FilePreferences::FILE_NAME)
    }
}
