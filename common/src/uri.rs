//! ファイルURI・WebView URL・data URIの変換

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// `file://` スキーム
pub const FILE_SCHEME: &str = "file://";

/// WebViewからローカルファイルを読むためのURLプレフィックス
pub const WEBVIEW_FILE_PREFIX: &str = "http://localhost/_capacitor_file_";

/// 保存画像のMIMEタイプ
pub const JPEG_MIME: &str = "image/jpeg";

/// パスの最後の `/` 以降を返す
pub fn file_name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// ファイルURIをWebViewで読み込めるURLへ変換
///
/// `file:///abs/x.jpeg` → `http://localhost/_capacitor_file_/abs/x.jpeg`。
/// ファイルURIでなければそのまま返す。
pub fn convert_file_src(uri: &str) -> String {
    match uri.strip_prefix(FILE_SCHEME) {
        Some(path) => format!("{}{}", WEBVIEW_FILE_PREFIX, path),
        None => uri.to_string(),
    }
}

/// 絶対パスからファイルURIを作る
pub fn file_uri(path: &std::path::Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("{}{}", FILE_SCHEME, path)
    } else {
        // Windowsのドライブレター
        format!("{}/{}", FILE_SCHEME, path)
    }
}

/// ファイルURIならパス部分、そうでなければ入力をそのまま返す
pub fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME).unwrap_or(uri)
}

/// base64データからdata URIを作る
pub fn to_data_uri(mime: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime, base64_data)
}

/// バイト列からdata URIを作る
pub fn bytes_to_data_uri(mime: &str, bytes: &[u8]) -> String {
    to_data_uri(mime, &STANDARD.encode(bytes))
}

/// data URIの中身
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime: &'a str,
    pub base64_data: &'a str,
}

impl<'a> DataUri<'a> {
    /// `data:<mime>;base64,<data>` を分解し、base64部分を検証する
    pub fn parse(uri: &'a str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUri(truncate(uri)))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUri(truncate(uri)))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidDataUri(truncate(uri)))?;

        STANDARD.decode(data)?;

        Ok(Self {
            mime,
            base64_data: data,
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.base64_data)?)
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}
