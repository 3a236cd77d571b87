//! 端末での対話入力
//!
//! メニューは dialoguer の Select で表示する。

use crate::error::{PhotoGalleryError, Result};
use crate::page::{ActionSheet, ActionSheetPresenter, PhotoRow};
use async_trait::async_trait;
use dialoguer::Select;

/// ActionSheetを端末の選択肢として表示
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPresenter;

#[async_trait]
impl ActionSheetPresenter for DialoguerPresenter {
    async fn present(&self, sheet: &ActionSheet) -> Result<Option<usize>> {
        let header = sheet.header.clone();
        let items: Vec<String> = sheet.buttons.iter().map(|b| b.text.clone()).collect();
        let default = items.len().saturating_sub(1);

        tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt(header)
                .items(&items)
                .default(default)
                .interact_opt()
                .map_err(|e| PhotoGalleryError::Prompt(e.to_string()))
        })
        .await
        .map_err(|e| PhotoGalleryError::Prompt(e.to_string()))?
    }
}

/// 一覧画面での選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryChoice {
    /// 撮影
    TakePhoto,
    /// 写真を選択
    Photo(usize),
    /// 終了
    Quit,
}

/// 一覧を表示して次の操作を選ばせる
pub fn select_gallery_item(rows: &[PhotoRow]) -> Result<GalleryChoice> {
    let mut items = vec!["📷 写真を撮る".to_string()];
    items.extend(rows.iter().map(|r| format!("[{}] {}", r.index, r.filepath)));
    items.push("終了".to_string());

    let choice = Select::new()
        .with_prompt(format!("ギャラリー ({}枚)", rows.len()))
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| PhotoGalleryError::Prompt(e.to_string()))?;

    Ok(gallery_choice(choice, rows.len()))
}

fn gallery_choice(choice: Option<usize>, photo_count: usize) -> GalleryChoice {
    match choice {
        Some(0) => GalleryChoice::TakePhoto,
        Some(i) if i <= photo_count => GalleryChoice::Photo(i - 1),
        _ => GalleryChoice::Quit,
    }
}
