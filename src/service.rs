//! 写真サービス
//!
//! 撮影 → base64化 → データディレクトリへ保存 → リスト先頭へ追加 → リスト全体を保存、
//! およびその逆（読み込み・削除）を行う。
//!
//! リストの変更と永続化は対で行う。保存に失敗した場合はメモリ上のリストも変更しない。

use crate::capabilities::{Camera, Directory, Filesystem, KeyValueStore};
use crate::error::{PhotoGalleryError, Result};
use crate::platform::{Platform, PlatformStorage};
use photo_gallery_common::{CameraOptions, CapturedPhoto, PhotoList, UserPhoto, PHOTO_STORAGE_KEY};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// 保存ファイルの拡張子
pub const PHOTO_EXTENSION: &str = "jpeg";

pub struct PhotoService {
    camera: Arc<dyn Camera>,
    filesystem: Arc<dyn Filesystem>,
    store: Arc<dyn KeyValueStore>,
    storage: Arc<dyn PlatformStorage>,
    camera_options: CameraOptions,
    photos: PhotoList,
    last_stamp: AtomicI64,
}

impl PhotoService {
    pub fn new(
        camera: Arc<dyn Camera>,
        filesystem: Arc<dyn Filesystem>,
        store: Arc<dyn KeyValueStore>,
        storage: Arc<dyn PlatformStorage>,
    ) -> Self {
        Self {
            camera,
            filesystem,
            store,
            storage,
            camera_options: CameraOptions::gallery(),
            photos: PhotoList::new(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// 撮影設定を差し替える（既定はファイル参照・カメラ・品質100）
    pub fn with_camera_options(mut self, options: CameraOptions) -> Self {
        self.camera_options = options;
        self
    }

    pub fn photos(&self) -> &PhotoList {
        &self.photos
    }

    pub fn platform(&self) -> Platform {
        self.storage.platform()
    }

    /// 撮影
    pub async fn take_photo(&self) -> Result<CapturedPhoto> {
        self.camera.get_photo(&self.camera_options).await
    }

    /// 撮影結果をbase64文字列にする
    pub async fn read_as_base64(&self, photo: &CapturedPhoto) -> Result<String> {
        self.storage
            .read_as_base64(photo, self.filesystem.as_ref())
            .await
    }

    /// 撮影結果をデータディレクトリに `<ミリ秒>.jpeg` として保存
    pub async fn save_picture(&self, photo: &CapturedPhoto) -> Result<UserPhoto> {
        let base64_data = self.read_as_base64(photo).await?;

        let file_name = self.next_file_name();
        let saved_uri = self
            .filesystem
            .write_file(&file_name, &base64_data, Directory::Data)
            .await?;

        let record = self
            .storage
            .saved_record(&file_name, &saved_uri, &base64_data, photo);

        if let Err(e) = self.storage.discard_capture(photo, self.filesystem.as_ref()).await {
            tracing::warn!(error = %e, "撮影ファイルを削除できませんでした");
        }
        Ok(record)
    }

    /// 撮影してギャラリーの先頭に追加
    pub async fn add_new_to_gallery(&mut self) -> Result<UserPhoto> {
        let captured = self.take_photo().await?;
        let saved = self.save_picture(&captured).await?;

        let mut photos = self.photos.clone();
        photos.add_front(saved.clone());
        self.commit(photos).await?;

        tracing::info!(filepath = %saved.filepath, count = self.photos.len(), "写真を追加");
        Ok(saved)
    }

    /// 保存済みリストを読み込む
    ///
    /// 値が無い・壊れている場合は空のリスト。
    pub async fn load_saved(&mut self) -> Result<&PhotoList> {
        let value = self.store.get(PHOTO_STORAGE_KEY).await?;

        let mut photos = match PhotoList::try_from_json(value.as_deref()) {
            Ok(photos) => photos,
            Err(e) => {
                tracing::warn!(error = %e, "保存済みリストを読めないため空として扱います");
                PhotoList::new()
            }
        };

        self.storage
            .resolve_display(&mut photos, self.filesystem.as_ref())
            .await?;

        tracing::debug!(count = photos.len(), platform = %self.platform(), "リスト読み込み");
        self.photos = photos;
        Ok(&self.photos)
    }

    /// 指定位置の写真を削除し、ファイルも消す
    ///
    /// `photo` が `position` の写真と一致しない場合は何も変更しない。
    pub async fn delete_picture(&mut self, photo: &UserPhoto, position: usize) -> Result<()> {
        let mut photos = self.photos.clone();
        let removed = photos.remove_at(position)?;
        if &removed != photo {
            return Err(PhotoGalleryError::StaleSelection(position));
        }
        self.commit(photos).await?;

        let file_name = photo.file_name();
        self.filesystem
            .delete_file(file_name, Directory::Data)
            .await?;

        tracing::info!(file_name, position, count = self.photos.len(), "写真を削除");
        Ok(())
    }

    /// 同じミリ秒内の連続保存でも名前が重ならないよう単調増加させる
    fn next_file_name(&self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(now.max(prev + 1)))
            .unwrap_or(now);
        file_name_for(now.max(prev + 1))
    }

    /// リスト全体を保存してから反映
    async fn commit(&mut self, photos: PhotoList) -> Result<()> {
        let json = photos.to_json()?;
        self.store.set(PHOTO_STORAGE_KEY, &json).await?;
        self.photos = photos;
        Ok(())
    }
}

/// `<UNIXミリ秒>.jpeg`
pub fn file_name_for(millis: i64) -> String {
    format!("{}.{}", millis, PHOTO_EXTENSION)
}
