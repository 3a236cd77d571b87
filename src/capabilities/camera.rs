//! カメラ機能
//!
//! - CommandCamera: 外部撮影コマンド（fswebcam, libcamera-still 等）を実行
//! - FileCamera: 既存の画像ファイルを撮影結果として取り込む

use crate::error::{PhotoGalleryError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use photo_gallery_common::{uri, CameraOptions, CameraResultType, CapturedPhoto};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::process::Command;

/// 出力先パスのプレースホルダ
pub const OUTPUT_PLACEHOLDER: &str = "{output}";
/// 品質のプレースホルダ
pub const QUALITY_PLACEHOLDER: &str = "{quality}";
/// 撮影結果の形式
const PHOTO_FORMAT: &str = "jpeg";

#[async_trait]
pub trait Camera: Send + Sync {
    async fn get_photo(&self, options: &CameraOptions) -> Result<CapturedPhoto>;
}

#[async_trait]
impl<T: Camera + ?Sized> Camera for Arc<T> {
    async fn get_photo(&self, options: &CameraOptions) -> Result<CapturedPhoto> {
        (**self).get_photo(options).await
    }
}

/// 外部コマンドで撮影するカメラ
///
/// 引数中の `{output}` は保存先パス、`{quality}` は品質に置換される。
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    capture_dir: PathBuf,
}

impl CommandCamera {
    /// 引数に `{output}` が無ければ末尾に足す
    pub fn new(program: impl Into<String>, mut args: Vec<String>, capture_dir: impl Into<PathBuf>) -> Self {
        if !args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            args.push(OUTPUT_PLACEHOLDER.to_string());
        }
        Self {
            program: program.into(),
            args,
            capture_dir: capture_dir.into(),
        }
    }

    /// プレースホルダを置換した引数
    pub fn render_args(&self, output: &Path, quality: u8) -> Vec<String> {
        let output = output.display().to_string();
        let quality = quality.to_string();
        self.args
            .iter()
            .map(|a| {
                a.replace(OUTPUT_PLACEHOLDER, &output)
                    .replace(QUALITY_PLACEHOLDER, &quality)
            })
            .collect()
    }
}

#[async_trait]
impl Camera for CommandCamera {
    async fn get_photo(&self, options: &CameraOptions) -> Result<CapturedPhoto> {
        options.validate()?;
        fs::create_dir_all(&self.capture_dir).await?;

        let target = capture_path(&self.capture_dir, PHOTO_FORMAT);
        let args = self.render_args(&target, options.quality);
        tracing::debug!(program = %self.program, ?args, "撮影コマンド実行");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| PhotoGalleryError::CaptureCommand(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PhotoGalleryError::CaptureCommand(format!(
                "{} ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if !fs::try_exists(&target).await? {
            return Err(PhotoGalleryError::Camera(format!(
                "撮影コマンドが画像を出力しませんでした: {}",
                target.display()
            )));
        }

        match options.result_type {
            CameraResultType::Uri => Ok(uri_result(&target, PHOTO_FORMAT)),
            inline => {
                let bytes = fs::read(&target).await?;
                fs::remove_file(&target).await?;
                Ok(inline_result(inline, &bytes, PHOTO_FORMAT))
            }
        }
    }
}

/// 既存の画像ファイルを取り込むカメラ
#[derive(Debug, Clone)]
pub struct FileCamera {
    source: PathBuf,
    capture_dir: PathBuf,
}

impl FileCamera {
    pub fn new(source: impl Into<PathBuf>, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            capture_dir: capture_dir.into(),
        }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn get_photo(&self, options: &CameraOptions) -> Result<CapturedPhoto> {
        options.validate()?;

        let bytes = fs::read(&self.source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PhotoGalleryError::FileNotFound(self.source.display().to_string())
            } else {
                e.into()
            }
        })?;

        let format = image::guess_format(&bytes)
            .map_err(|_| PhotoGalleryError::UnsupportedImage(self.source.display().to_string()))?;

        // 保存名は常に .jpeg なので JPEG 以外は変換する
        let bytes = if format == ImageFormat::Jpeg && options.quality >= CameraOptions::MAX_QUALITY {
            bytes
        } else {
            let quality = options.quality;
            tokio::task::spawn_blocking(move || reencode_jpeg(&bytes, quality))
                .await
                .map_err(|e| PhotoGalleryError::Image(e.to_string()))??
        };
        let ext = PHOTO_FORMAT;
        tracing::debug!(source = %self.source.display(), ?format, bytes = bytes.len(), "画像取り込み");

        match options.result_type {
            CameraResultType::Uri => {
                fs::create_dir_all(&self.capture_dir).await?;
                let target = capture_path(&self.capture_dir, ext);
                fs::write(&target, &bytes).await?;
                Ok(uri_result(&target, ext))
            }
            inline => Ok(inline_result(inline, &bytes, ext)),
        }
    }
}

fn capture_path(dir: &Path, ext: &str) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    dir.join(format!("capture-{}.{}", millis, ext))
}

fn uri_result(path: &Path, format: &str) -> CapturedPhoto {
    CapturedPhoto {
        path: Some(path.display().to_string()),
        web_path: Some(uri::file_uri(path)),
        format: format.to_string(),
        ..Default::default()
    }
}

fn inline_result(result_type: CameraResultType, bytes: &[u8], format: &str) -> CapturedPhoto {
    let mut captured = CapturedPhoto {
        format: format.to_string(),
        ..Default::default()
    };
    match result_type {
        CameraResultType::DataUrl => {
            captured.data_url = Some(uri::bytes_to_data_uri(uri::JPEG_MIME, bytes));
        }
        _ => captured.base64_string = Some(STANDARD.encode(bytes)),
    }
    captured
}

fn reencode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).map_err(|e| PhotoGalleryError::Image(e.to_string()))?;
    // JPEGはアルファ非対応
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PhotoGalleryError::Image(e.to_string()))?;
    Ok(out)
}
