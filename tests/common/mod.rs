//! テスト用の偽実装

#![allow(dead_code)]

use async_trait::async_trait;
use photo_gallery::capabilities::{Camera, KeyValueStore, LocalFilesystem, MemoryPreferences};
use photo_gallery::page::{ActionSheet, ActionSheetPresenter};
use photo_gallery::platform::Platform;
use photo_gallery::{PhotoGalleryError, PhotoService, Result};
use photo_gallery_common::uri;
use photo_gallery_common::{CameraOptions, CapturedPhoto};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 呼ばれるたびに `shot-<n>` という中身のファイルを出力するカメラ
pub struct FakeCamera {
    capture_dir: PathBuf,
    shots: AtomicUsize,
    pub last_options: Mutex<Option<CameraOptions>>,
}

impl FakeCamera {
    pub fn new(capture_dir: &Path) -> Self {
        std::fs::create_dir_all(capture_dir).unwrap();
        Self {
            capture_dir: capture_dir.to_path_buf(),
            shots: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn shot_bytes(n: usize) -> Vec<u8> {
        format!("shot-{}", n).into_bytes()
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn get_photo(&self, options: &CameraOptions) -> Result<CapturedPhoto> {
        *self.last_options.lock().unwrap() = Some(*options);
        let n = self.shots.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.capture_dir.join(format!("capture-{}.jpeg", n));
        std::fs::write(&path, Self::shot_bytes(n))?;

        Ok(CapturedPhoto {
            path: Some(path.display().to_string()),
            web_path: Some(uri::file_uri(&path)),
            format: "jpeg".into(),
            ..Default::default()
        })
    }
}

/// 常に失敗するカメラ（権限拒否の代わり）
pub struct DeniedCamera;

#[async_trait]
impl Camera for DeniedCamera {
    async fn get_photo(&self, _options: &CameraOptions) -> Result<CapturedPhoto> {
        Err(PhotoGalleryError::Camera("permission denied".into()))
    }
}

/// 書き込みが常に失敗するストア
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryPreferences,
}

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only").into())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// 決められたボタンを押すプレゼンタ
pub struct ScriptedPresenter {
    choice: Option<usize>,
    pub presented: Mutex<Vec<ActionSheet>>,
}

impl ScriptedPresenter {
    pub fn pressing(choice: Option<usize>) -> Self {
        Self {
            choice,
            presented: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ActionSheetPresenter for ScriptedPresenter {
    async fn present(&self, sheet: &ActionSheet) -> Result<Option<usize>> {
        self.presented.lock().unwrap().push(sheet.clone());
        Ok(self.choice)
    }
}

/// テスト環境一式
pub struct Fixture {
    pub root: PathBuf,
    pub camera: Arc<FakeCamera>,
    pub filesystem: Arc<LocalFilesystem>,
    pub store: Arc<MemoryPreferences>,
}

impl Fixture {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            camera: Arc::new(FakeCamera::new(&root.join("cache"))),
            filesystem: Arc::new(LocalFilesystem::new(root.join("photos"), root.join("cache"))),
            store: Arc::new(MemoryPreferences::new()),
        }
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.root.join("photos")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// キャッシュに残っているファイル数
    pub fn cache_file_count(&self) -> usize {
        std::fs::read_dir(self.cache_dir()).map(|d| d.count()).unwrap_or(0)
    }

    pub fn service(&self, platform: Platform) -> PhotoService {
        PhotoService::new(
            self.camera.clone(),
            self.filesystem.clone(),
            self.store.clone(),
            platform.storage(),
        )
    }

    pub async fn persisted(&self) -> Option<String> {
        self.store.get(photo_gallery_common::PHOTO_STORAGE_KEY).await.unwrap()
    }
}

/// `<数字>.jpeg` か
pub fn is_timestamp_name(name: &str) -> bool {
    match name.strip_suffix(".jpeg") {
        Some(stem) => !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
