//! ファイルシステム機能
//!
//! データはbase64文字列でやり取りし、ディスクには生のバイト列を書く。

use crate::error::{PhotoGalleryError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use photo_gallery_common::uri;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// アプリ専用ディレクトリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directory {
    /// 保存画像用のデータディレクトリ
    Data,
    /// 撮影直後の一時ファイル用
    Cache,
}

#[async_trait]
pub trait Filesystem: Send + Sync {
    /// ファイルをbase64文字列で読む
    ///
    /// `directory` が `None` の場合、`path` は絶対パスまたは `file://` URI。
    async fn read_file(&self, path: &str, directory: Option<Directory>) -> Result<String>;

    /// base64データをデコードして書き込み、ファイルURIを返す
    async fn write_file(&self, path: &str, data: &str, directory: Directory) -> Result<String>;

    async fn delete_file(&self, path: &str, directory: Directory) -> Result<()>;
}

#[async_trait]
impl<T: Filesystem + ?Sized> Filesystem for Arc<T> {
    async fn read_file(&self, path: &str, directory: Option<Directory>) -> Result<String> {
        (**self).read_file(path, directory).await
    }

    async fn write_file(&self, path: &str, data: &str, directory: Directory) -> Result<String> {
        (**self).write_file(path, data, directory).await
    }

    async fn delete_file(&self, path: &str, directory: Directory) -> Result<()> {
        (**self).delete_file(path, directory).await
    }
}

/// ローカルディスク上のファイルシステム
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    data_dir: PathBuf,
    cache_dir: PathBuf,
}

impl LocalFilesystem {
    pub fn new(data_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: absolute(data_dir.into()),
            cache_dir: absolute(cache_dir.into()),
        }
    }

    pub fn directory_path(&self, directory: Directory) -> &Path {
        match directory {
            Directory::Data => &self.data_dir,
            Directory::Cache => &self.cache_dir,
        }
    }

    /// ディレクトリ相対パスを解決（ディレクトリ外への脱出は拒否）
    pub fn resolve(&self, path: &str, directory: Directory) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = path.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(PhotoGalleryError::InvalidPath(path.to_string()));
        }
        Ok(self.directory_path(directory).join(relative))
    }

    fn resolve_read(&self, path: &str, directory: Option<Directory>) -> Result<PathBuf> {
        match directory {
            Some(dir) => self.resolve(path, dir),
            None => {
                let target = PathBuf::from(uri::strip_file_scheme(path));
                if !target.is_absolute() {
                    return Err(PhotoGalleryError::InvalidPath(path.to_string()));
                }
                Ok(target)
            }
        }
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn read_file(&self, path: &str, directory: Option<Directory>) -> Result<String> {
        let target = self.resolve_read(path, directory)?;
        tracing::debug!(path = %target.display(), "read_file");

        let bytes = fs::read(&target).await.map_err(|e| not_found(e, &target))?;
        Ok(STANDARD.encode(bytes))
    }

    async fn write_file(&self, path: &str, data: &str, directory: Directory) -> Result<String> {
        let target = self.resolve(path, directory)?;
        let bytes = STANDARD.decode(data)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &bytes).await?;
        tracing::debug!(path = %target.display(), bytes = bytes.len(), "write_file");

        Ok(uri::file_uri(&target))
    }

    async fn delete_file(&self, path: &str, directory: Directory) -> Result<()> {
        let target = self.resolve(path, directory)?;
        fs::remove_file(&target).await.map_err(|e| not_found(e, &target))?;
        tracing::debug!(path = %target.display(), "delete_file");
        Ok(())
    }
}

fn not_found(err: std::io::Error, path: &Path) -> PhotoGalleryError {
    if err.kind() == ErrorKind::NotFound {
        PhotoGalleryError::FileNotFound(path.display().to_string())
    } else {
        err.into()
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
