use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoGalleryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("撮影コマンドが設定されていません。`photo-gallery config --set-capture-command CMD` で設定するか、`add --from FILE` を使ってください")]
    MissingCaptureCommand,

    #[error("撮影エラー: {0}")]
    Camera(String),

    #[error("撮影コマンド実行エラー: {0}")]
    CaptureCommand(String),

    #[error("撮影結果にファイルパスがありません")]
    MissingCapturePath,

    #[error("対応していない画像形式: {0}")]
    UnsupportedImage(String),

    #[error("画像処理エラー: {0}")]
    Image(String),

    #[error("不正なパス: {0}")]
    InvalidPath(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像の取得に失敗: {0}")]
    Fetch(String),

    #[error("選択された写真が位置 {0} の写真と一致しません")]
    StaleSelection(usize),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] photo_gallery_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Base64デコードエラー: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotoGalleryError>;
