//! 設定とCLIオプションから各機能を組み立てる

use crate::capabilities::{
    Camera, CommandCamera, FileCamera, FilePreferences, KeyValueStore, LocalFilesystem,
    MemoryPreferences,
};
use crate::config::{AppPaths, Config};
use crate::error::{PhotoGalleryError, Result};
use crate::platform::Platform;
use crate::service::PhotoService;
use async_trait::async_trait;
use photo_gallery_common::{CameraOptions, CapturedPhoto};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub struct AppContext {
    pub config: Config,
    pub paths: AppPaths,
    pub platform: Platform,
    pub ephemeral: bool,
    /// ephemeral時のデータルート。破棄すると中身ごと消える
    _scratch: Option<TempDir>,
}

impl AppContext {
    /// CLIオプション > 設定ファイル
    ///
    /// ephemeral時は一時ディレクトリをルートにし、何も残さない。
    pub fn resolve(
        config: Config,
        platform: Option<Platform>,
        data_dir: Option<PathBuf>,
        ephemeral: bool,
    ) -> Result<Self> {
        let scratch = if ephemeral {
            Some(tempfile::Builder::new().prefix("photo-gallery-").tempdir()?)
        } else {
            None
        };
        let root = match (&scratch, data_dir) {
            (Some(dir), _) => dir.path().to_path_buf(),
            (None, Some(dir)) => dir,
            (None, None) => config.data_root()?,
        };
        Ok(Self {
            platform: platform.unwrap_or(config.platform),
            paths: AppPaths::new(root),
            config,
            ephemeral,
            _scratch: scratch,
        })
    }

    pub fn filesystem(&self) -> Arc<LocalFilesystem> {
        Arc::new(LocalFilesystem::new(
            self.paths.photos_dir(),
            self.paths.cache_dir(),
        ))
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        if self.ephemeral {
            Arc::new(MemoryPreferences::new())
        } else {
            Arc::new(FilePreferences::new(self.paths.preferences_file()))
        }
    }

    /// `from` があればファイル取り込み、無ければ設定の撮影コマンド
    pub fn camera(&self, from: Option<&Path>) -> Result<Arc<dyn Camera>> {
        if let Some(source) = from {
            return Ok(Arc::new(FileCamera::new(source, self.paths.cache_dir())));
        }
        match &self.config.capture_command {
            Some(program) => Ok(Arc::new(CommandCamera::new(
                program,
                self.config.capture_args.clone(),
                self.paths.cache_dir(),
            ))),
            None => Ok(Arc::new(UnavailableCamera)),
        }
    }

    pub fn service(&self, camera: Arc<dyn Camera>, quality: Option<u8>) -> Result<PhotoService> {
        let options = CameraOptions::gallery().with_quality(quality.unwrap_or(self.config.quality))?;
        Ok(PhotoService::new(camera, self.filesystem(), self.store(), self.platform.storage())
            .with_camera_options(options))
    }
}

/// 撮影コマンド未設定時のカメラ
struct UnavailableCamera;

#[async_trait]
impl Camera for UnavailableCamera {
    async fn get_photo(&self, _options: &CameraOptions) -> Result<CapturedPhoto> {
        Err(PhotoGalleryError::MissingCaptureCommand)
    }
}
