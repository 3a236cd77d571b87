//! ギャラリー画面のコントローラ
//!
//! 描画そのものはフロントエンドに任せ、ここでは
//! - 初期化時の読み込み
//! - 撮影ボタン
//! - サムネイル選択時の削除/キャンセルメニュー
//! を扱う。

use crate::error::Result;
use crate::service::PhotoService;
use async_trait::async_trait;
use photo_gallery_common::{PhotoList, UserPhoto};
use std::sync::Arc;

/// ボタンの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Destructive,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSheetButton {
    pub text: String,
    pub role: ButtonRole,
    pub icon: String,
}

/// 選択肢メニュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSheet {
    pub header: String,
    pub buttons: Vec<ActionSheetButton>,
}

impl ActionSheet {
    /// 写真タップ時のメニュー: Delete / Cancel
    pub fn photo_actions() -> Self {
        Self {
            header: "Photos".into(),
            buttons: vec![
                ActionSheetButton {
                    text: "Delete".into(),
                    role: ButtonRole::Destructive,
                    icon: "trash".into(),
                },
                ActionSheetButton {
                    text: "Cancel".into(),
                    role: ButtonRole::Cancel,
                    icon: "close".into(),
                },
            ],
        }
    }

    /// 押されたボタンの役割（範囲外・未選択はキャンセル扱い）
    pub fn role_of(&self, choice: Option<usize>) -> ButtonRole {
        choice
            .and_then(|i| self.buttons.get(i))
            .map(|b| b.role)
            .unwrap_or(ButtonRole::Cancel)
    }
}

/// メニューを表示し、押されたボタンの位置を返す
///
/// 閉じられた場合は `None`。
#[async_trait]
pub trait ActionSheetPresenter: Send + Sync {
    async fn present(&self, sheet: &ActionSheet) -> Result<Option<usize>>;
}

#[async_trait]
impl<T: ActionSheetPresenter + ?Sized> ActionSheetPresenter for Arc<T> {
    async fn present(&self, sheet: &ActionSheet) -> Result<Option<usize>> {
        (**self).present(sheet).await
    }
}

/// メニュー操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoAction {
    Deleted,
    Cancelled,
}

/// 一覧の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRow {
    pub index: usize,
    pub filepath: String,
    pub webview_path: String,
}

pub struct GalleryPage {
    service: PhotoService,
    presenter: Arc<dyn ActionSheetPresenter>,
}

impl GalleryPage {
    pub fn new(service: PhotoService, presenter: Arc<dyn ActionSheetPresenter>) -> Self {
        Self { service, presenter }
    }

    pub fn service(&self) -> &PhotoService {
        &self.service
    }

    pub fn photos(&self) -> &PhotoList {
        self.service.photos()
    }

    /// 画面初期化
    pub async fn on_init(&mut self) -> Result<()> {
        self.service.load_saved().await?;
        Ok(())
    }

    /// 撮影ボタン
    pub async fn add_photo_to_gallery(&mut self) -> Result<UserPhoto> {
        self.service.add_new_to_gallery().await
    }

    /// サムネイル選択時のメニュー
    pub async fn show_action_sheet(&mut self, photo: &UserPhoto, position: usize) -> Result<PhotoAction> {
        let sheet = ActionSheet::photo_actions();
        let choice = self.presenter.present(&sheet).await?;

        match sheet.role_of(choice) {
            ButtonRole::Destructive => {
                self.service.delete_picture(photo, position).await?;
                Ok(PhotoAction::Deleted)
            }
            ButtonRole::Cancel => Ok(PhotoAction::Cancelled),
        }
    }

    /// 一覧の表示用データ
    pub fn render(&self) -> Vec<PhotoRow> {
        self.service
            .photos()
            .iter()
            .enumerate()
            .map(|(index, photo)| PhotoRow {
                index,
                filepath: photo.filepath.clone(),
                webview_path: photo.webview_path.clone(),
            })
            .collect()
    }
}
