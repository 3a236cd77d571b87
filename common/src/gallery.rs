//! 保存済み写真の順序付きリスト
//!
//! 新しい写真が先頭。永続化は常にリスト全体のJSON配列。

use crate::error::{Error, Result};
use crate::types::UserPhoto;

/// 写真リスト（新しい順）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoList {
    photos: Vec<UserPhoto>,
}

impl PhotoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 永続化された値から復元する
    ///
    /// 値が無い・壊れている場合は空のリスト。
    pub fn from_json(value: Option<&str>) -> Self {
        Self::try_from_json(value).unwrap_or_default()
    }

    /// 永続化された値から復元する（パース失敗はエラー）
    pub fn try_from_json(value: Option<&str>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        // "null" も空扱い
        let photos: Option<Vec<UserPhoto>> = serde_json::from_str(value)?;
        Ok(Self {
            photos: photos.unwrap_or_default(),
        })
    }

    /// JSON配列へシリアライズ
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.photos)?)
    }

    /// 先頭に追加
    pub fn add_front(&mut self, photo: UserPhoto) {
        self.photos.insert(0, photo);
    }

    /// 指定位置のレコードを取り除いて返す
    pub fn remove_at(&mut self, index: usize) -> Result<UserPhoto> {
        if index >= self.photos.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.photos.len(),
            });
        }
        Ok(self.photos.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&UserPhoto> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserPhoto> {
        self.photos.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, UserPhoto> {
        self.photos.iter_mut()
    }

    pub fn as_slice(&self) -> &[UserPhoto] {
        &self.photos
    }
}

impl From<Vec<UserPhoto>> for PhotoList {
    fn from(photos: Vec<UserPhoto>) -> Self {
        Self { photos }
    }
}

impl<'a> IntoIterator for &'a PhotoList {
    type Item = &'a UserPhoto;
    type IntoIter = std::slice::Iter<'a, UserPhoto>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}
