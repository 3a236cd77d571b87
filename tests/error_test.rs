//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_gallery::capabilities::{Directory, Filesystem, LocalFilesystem};
use photo_gallery::PhotoGalleryError;
use tempfile::tempdir;

/// データディレクトリ外へのアクセス
#[tokio::test]
async fn test_path_traversal_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let fs = LocalFilesystem::new(dir.path().join("photos"), dir.path().join("cache"));

    let err = fs.delete_file("../preferences.json", Directory::Data).await.unwrap_err();
    assert!(matches!(err, PhotoGalleryError::InvalidPath(_)));

    let err = fs.write_file("../x.jpeg", "AAAA", Directory::Data).await.unwrap_err();
    assert!(matches!(err, PhotoGalleryError::InvalidPath(_)));
}

/// PhotoGalleryErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoGalleryError::Config("テスト設定エラー".to_string()),
        PhotoGalleryError::Camera("permission denied".to_string()),
        PhotoGalleryError::CaptureCommand("fswebcam: not found".to_string()),
        PhotoGalleryError::MissingCapturePath,
        PhotoGalleryError::UnsupportedImage("a.txt".to_string()),
        PhotoGalleryError::InvalidPath("../x".to_string()),
        PhotoGalleryError::FileNotFound("1.jpeg".to_string()),
        PhotoGalleryError::Fetch("http://x".to_string()),
        PhotoGalleryError::StaleSelection(3),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingCaptureCommandエラーのメッセージ確認
#[test]
fn test_missing_capture_command_message() {
    let err = PhotoGalleryError::MissingCaptureCommand;
    let display = format!("{}", err);

    assert!(display.contains("撮影コマンド"));
    assert!(display.contains("photo-gallery config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoGalleryError = io_err.into();

    assert!(matches!(err, PhotoGalleryError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoGalleryError = json_err.into();

    assert!(matches!(err, PhotoGalleryError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = photo_gallery_common::Error::IndexOutOfRange { index: 2, len: 1 };
    let err: PhotoGalleryError = common_err.into();

    assert!(matches!(err, PhotoGalleryError::Common(_)));
    assert_eq!(format!("{}", err), "Index out of range: 2 (len 1)");
}
