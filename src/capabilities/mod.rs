//! ホスト機能（カメラ・ファイルシステム・キーバリューストア）
//!
//! サービスはこれらを `Arc<dyn Trait>` として受け取る。

pub mod camera;
pub mod filesystem;
pub mod preferences;

pub use camera::{Camera, CommandCamera, FileCamera};
pub use filesystem::{Directory, Filesystem, LocalFilesystem};
pub use preferences::{FilePreferences, KeyValueStore, MemoryPreferences};
