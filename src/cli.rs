use crate::platform::Platform;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-gallery")]
#[command(about = "写真を撮影・保存・一覧・削除するギャラリーツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 実行環境 (native/web)（省略時は設定ファイルの値）
    #[arg(long, global = true)]
    pub platform: Option<Platform>,

    /// データディレクトリ（省略時は設定ファイル・環境変数・OS既定の順）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// 何も残さない（一時ディレクトリを使い、終了時に削除）
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を撮影してギャラリーに追加
    Add {
        /// 撮影の代わりに画像ファイルを取り込む
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// JPEG品質 (0-100)
        #[arg(short, long)]
        quality: Option<u8>,
    },

    /// 保存済みの写真を一覧表示
    List {
        /// 保存されているJSONをそのまま出力
        #[arg(long)]
        json: bool,
    },

    /// 写真を削除
    Delete {
        /// 一覧の番号（0が最新）
        #[arg(required = true)]
        index: usize,

        /// 確認メニューを表示しない
        #[arg(short, long)]
        yes: bool,
    },

    /// 対話式ギャラリー
    Gallery,

    /// 設定を表示/編集
    Config {
        /// 撮影コマンドのプログラムを設定
        #[arg(long)]
        set_capture_command: Option<String>,

        /// 撮影コマンドの引数（複数指定可。`{output}` が保存先、`{quality}` が品質に置換される）
        #[arg(long = "set-capture-arg", allow_hyphen_values = true)]
        set_capture_args: Vec<String>,

        /// 実行環境を設定
        #[arg(long)]
        set_platform: Option<Platform>,

        /// データディレクトリを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 既定のJPEG品質を設定
        #[arg(long)]
        set_quality: Option<u8>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
