//! 実行環境ごとの保存戦略
//!
//! インストール済みアプリ（Native）とブラウザ（Web）では画像データへの
//! アクセス経路が異なる。分岐はこのモジュールの2つの実装に閉じ込め、
//! サービスには `Arc<dyn PlatformStorage>` として注入する。

use crate::capabilities::{Directory, Filesystem};
use crate::error::{PhotoGalleryError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::ValueEnum;
use photo_gallery_common::uri::{self, DataUri, FILE_SCHEME, JPEG_MIME};
use photo_gallery_common::{CapturedPhoto, PhotoList, UserPhoto};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 実行環境
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// インストール済みアプリ
    #[default]
    Native,
    /// ブラウザ
    Web,
}

impl Platform {
    pub fn storage(&self) -> Arc<dyn PlatformStorage> {
        match self {
            Platform::Native => Arc::new(NativeStorage),
            Platform::Web => Arc::new(WebStorage::new()),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Native => write!(f, "native"),
            Platform::Web => write!(f, "web"),
        }
    }
}

#[async_trait]
pub trait PlatformStorage: Send + Sync {
    fn platform(&self) -> Platform;

    /// 撮影結果をbase64文字列にする
    async fn read_as_base64(&self, photo: &CapturedPhoto, fs: &dyn Filesystem) -> Result<String>;

    /// 書き込み済みファイルからレコードを作る
    fn saved_record(
        &self,
        file_name: &str,
        saved_uri: &str,
        base64_data: &str,
        photo: &CapturedPhoto,
    ) -> UserPhoto;

    /// 読み込んだレコードの表示パスを整える
    async fn resolve_display(&self, photos: &mut PhotoList, fs: &dyn Filesystem) -> Result<()>;

    /// 保存済みの撮影結果が残した一時ファイルを片付ける
    async fn discard_capture(&self, photo: &CapturedPhoto, fs: &dyn Filesystem) -> Result<()>;
}

/// カメラが既にデータを返している場合のbase64
fn inline_base64(photo: &CapturedPhoto) -> Result<Option<String>> {
    if let Some(data) = &photo.base64_string {
        return Ok(Some(data.clone()));
    }
    if let Some(data_url) = &photo.data_url {
        let parsed = DataUri::parse(data_url)?;
        return Ok(Some(parsed.base64_data.to_string()));
    }
    Ok(None)
}

/// インストール済みアプリ: ファイルを直接読み、ファイルURIをWebView用URLに変換
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeStorage;

#[async_trait]
impl PlatformStorage for NativeStorage {
    fn platform(&self) -> Platform {
        Platform::Native
    }

    async fn read_as_base64(&self, photo: &CapturedPhoto, fs: &dyn Filesystem) -> Result<String> {
        if let Some(data) = inline_base64(photo)? {
            return Ok(data);
        }
        let path = photo
            .path
            .as_deref()
            .ok_or(PhotoGalleryError::MissingCapturePath)?;
        fs.read_file(path, None).await
    }

    fn saved_record(
        &self,
        _file_name: &str,
        saved_uri: &str,
        _base64_data: &str,
        _photo: &CapturedPhoto,
    ) -> UserPhoto {
        UserPhoto::new(saved_uri, uri::convert_file_src(saved_uri))
    }

    async fn resolve_display(&self, _photos: &mut PhotoList, _fs: &dyn Filesystem) -> Result<()> {
        Ok(())
    }

    /// レコードは保存先だけを指すので、キャッシュ内の撮影ファイルは不要
    async fn discard_capture(&self, photo: &CapturedPhoto, fs: &dyn Filesystem) -> Result<()> {
        let Some(path) = photo.path.as_deref() else {
            return Ok(());
        };
        match fs.delete_file(uri::file_name_of(path), Directory::Cache).await {
            Ok(()) | Err(PhotoGalleryError::FileNotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// ブラウザ: Webパスを取得してbase64化し、読み込み時はdata URIで表示
#[derive(Debug, Clone, Default)]
pub struct WebStorage {
    client: reqwest::Client,
}

impl WebStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Webパスの中身を取得（http/https, file://, data:）
    pub async fn fetch(&self, web_path: &str) -> Result<Vec<u8>> {
        if let Some(path) = web_path.strip_prefix(FILE_SCHEME) {
            return tokio::fs::read(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PhotoGalleryError::FileNotFound(path.to_string())
                } else {
                    PhotoGalleryError::Fetch(format!("{}: {}", web_path, e))
                }
            });
        }
        if web_path.starts_with("data:") {
            return Ok(DataUri::parse(web_path)?.decode()?);
        }

        tracing::debug!(url = web_path, "fetch");
        let response = self.client.get(web_path).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl PlatformStorage for WebStorage {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    async fn read_as_base64(&self, photo: &CapturedPhoto, _fs: &dyn Filesystem) -> Result<String> {
        if let Some(data) = inline_base64(photo)? {
            return Ok(data);
        }
        let web_path = photo
            .web_path
            .as_deref()
            .ok_or_else(|| PhotoGalleryError::Fetch("撮影結果にWebパスがありません".into()))?;
        let bytes = self.fetch(web_path).await?;
        Ok(STANDARD.encode(bytes))
    }

    fn saved_record(
        &self,
        file_name: &str,
        _saved_uri: &str,
        base64_data: &str,
        photo: &CapturedPhoto,
    ) -> UserPhoto {
        let webview_path = match &photo.web_path {
            Some(web_path) => web_path.clone(),
            None => uri::to_data_uri(JPEG_MIME, base64_data),
        };
        UserPhoto::new(file_name, webview_path)
    }

    async fn resolve_display(&self, photos: &mut PhotoList, fs: &dyn Filesystem) -> Result<()> {
        for photo in photos.iter_mut() {
            let data = fs.read_file(&photo.filepath, Some(Directory::Data)).await?;
            photo.webview_path = uri::to_data_uri(JPEG_MIME, &data);
        }
        Ok(())
    }

    /// 撮影時のWebパスを表示に使うため残す
    async fn discard_capture(&self, _photo: &CapturedPhoto, _fs: &dyn Filesystem) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::LocalFilesystem;
    use tempfile::tempdir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 1回だけ応答するHTTPサーバ
    async fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/capture.jpeg", addr)
    }

    fn local_client() -> WebStorage {
        WebStorage::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    fn captured_file(path: &std::path::Path) -> CapturedPhoto {
        CapturedPhoto {
            path: Some(path.display().to_string()),
            web_path: Some(uri::file_uri(path)),
            format: "jpeg".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_native_reads_path_directly() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("capture.jpeg");
        std::fs::write(&source, b"native").unwrap();
        let fs = LocalFilesystem::new(dir.path().join("photos"), dir.path().join("cache"));

        let data = NativeStorage.read_as_base64(&captured_file(&source), &fs).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"native");
    }

    #[tokio::test]
    async fn test_native_missing_path() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path(), dir.path());
        let photo = CapturedPhoto {
            web_path: Some("http://localhost/x".into()),
            ..Default::default()
        };

        let err = NativeStorage.read_as_base64(&photo, &fs).await.unwrap_err();
        assert!(matches!(err, PhotoGalleryError::MissingCapturePath));
    }

    #[test]
    fn test_native_record_uses_webview_url() {
        let record = NativeStorage.saved_record(
            "1.jpeg",
            "file:///data/photos/1.jpeg",
            "",
            &CapturedPhoto::default(),
        );
        assert_eq!(record.filepath, "file:///data/photos/1.jpeg");
        assert_eq!(record.webview_path, "http://localhost/_capacitor_file_/data/photos/1.jpeg");
    }

    #[tokio::test]
    async fn test_web_fetches_file_web_path() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("capture.jpeg");
        std::fs::write(&source, b"web").unwrap();
        let fs = LocalFilesystem::new(dir.path(), dir.path());

        let photo = CapturedPhoto {
            path: None,
            ..captured_file(&source)
        };
        let data = WebStorage::new().read_as_base64(&photo, &fs).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"web");
    }

    #[tokio::test]
    async fn test_web_fetches_data_url() {
        let bytes = WebStorage::new()
            .fetch(&uri::bytes_to_data_uri(JPEG_MIME, b"abc"))
            .await
            .unwrap();
        assert_eq!(bytes, b"abc");
    }

    #[tokio::test]
    async fn test_web_fetches_http_web_path() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path(), dir.path());
        let photo = CapturedPhoto {
            web_path: Some(serve_once("200 OK", b"\xff\xd8http").await),
            ..Default::default()
        };

        let data = local_client().read_as_base64(&photo, &fs).await.unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), b"\xff\xd8http");
    }

    #[tokio::test]
    async fn test_web_fetch_http_error_status() {
        let url = serve_once("404 Not Found", b"missing").await;

        let err = local_client().fetch(&url).await.unwrap_err();
        assert!(matches!(err, PhotoGalleryError::Http(_)));
    }

    #[tokio::test]
    async fn test_native_discards_cached_capture() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path().join("photos"), dir.path().join("cache"));
        let capture = dir.path().join("cache").join("capture-1.jpeg");
        std::fs::create_dir_all(capture.parent().unwrap()).unwrap();
        std::fs::write(&capture, b"x").unwrap();

        NativeStorage.discard_capture(&captured_file(&capture), &fs).await.unwrap();
        assert!(!capture.exists());

        // 既に無い場合や、インライン結果は何もしない
        NativeStorage.discard_capture(&captured_file(&capture), &fs).await.unwrap();
        NativeStorage.discard_capture(&CapturedPhoto::default(), &fs).await.unwrap();
    }

    #[test]
    fn test_web_record_keeps_web_path() {
        let photo = CapturedPhoto {
            web_path: Some("blob:http://localhost/1234".into()),
            ..Default::default()
        };
        let record = WebStorage::new().saved_record("1.jpeg", "file:///x/1.jpeg", "AAAA", &photo);
        assert_eq!(record.filepath, "1.jpeg");
        assert_eq!(record.webview_path, "blob:http://localhost/1234");
    }

    #[tokio::test]
    async fn test_inline_base64_wins() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path(), dir.path());
        let photo = CapturedPhoto {
            data_url: Some(uri::bytes_to_data_uri(JPEG_MIME, b"inline")),
            ..Default::default()
        };

        for storage in [Platform::Native.storage(), Platform::Web.storage()] {
            let data = storage.read_as_base64(&photo, &fs).await.unwrap();
            assert_eq!(STANDARD.decode(data).unwrap(), b"inline");
        }
    }

    #[tokio::test]
    async fn test_web_resolve_display_builds_data_uri() {
        let dir = tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path().join("photos"), dir.path().join("cache"));
        fs.write_file("1.jpeg", &STANDARD.encode(b"one"), Directory::Data).await.unwrap();

        let mut photos = PhotoList::from(vec![UserPhoto::new("1.jpeg", "blob:old")]);
        WebStorage::new().resolve_display(&mut photos, &fs).await.unwrap();

        let display = &photos.get(0).unwrap().webview_path;
        let parsed = DataUri::parse(display).unwrap();
        assert_eq!(parsed.mime, "image/jpeg");
        assert_eq!(parsed.decode().unwrap(), b"one");
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Native.to_string(), "native");
        assert_eq!(Platform::Web.storage().platform(), Platform::Web);
    }
}
