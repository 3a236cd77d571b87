use anyhow::Context;
use clap::Parser;
use photo_gallery::app::AppContext;
use photo_gallery::capabilities::KeyValueStore;
use photo_gallery::cli::{Cli, Commands};
use photo_gallery::config::Config;
use photo_gallery::page::{GalleryPage, PhotoAction, PhotoRow};
use photo_gallery::platform::Platform;
use photo_gallery::prompt::{self, DialoguerPresenter, GalleryChoice};
use photo_gallery_common::PHOTO_STORAGE_KEY;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { command, verbose, platform, data_dir, ephemeral } = Cli::parse();
    init_logging(verbose);

    let config = Config::load().context("設定の読み込みに失敗")?;
    let resolve = |config| AppContext::resolve(config, platform, data_dir, ephemeral);

    match command {
        Commands::Config {
            set_capture_command,
            set_capture_args,
            set_platform,
            set_data_dir,
            set_quality,
            show,
        } => {
            let changes = ConfigChanges {
                capture_command: set_capture_command,
                capture_args: set_capture_args,
                platform: set_platform,
                data_dir: set_data_dir,
                quality: set_quality,
            };
            configure(config, changes, show)?;
        }
        Commands::Add { from, quality } => add(resolve(config)?, from, quality).await?,
        Commands::List { json } => list(resolve(config)?, json).await?,
        Commands::Delete { index, yes } => delete(resolve(config)?, index, yes).await?,
        Commands::Gallery => gallery(resolve(config)?).await?,
    }

    Ok(())
}

struct ConfigChanges {
    capture_command: Option<String>,
    capture_args: Vec<String>,
    platform: Option<Platform>,
    data_dir: Option<PathBuf>,
    quality: Option<u8>,
}

fn configure(mut config: Config, changes: ConfigChanges, show: bool) -> anyhow::Result<()> {
    let changed = changes.capture_command.is_some()
        || !changes.capture_args.is_empty()
        || changes.platform.is_some()
        || changes.data_dir.is_some()
        || changes.quality.is_some();

    if let Some(program) = changes.capture_command {
        config.set_capture_command(program)?;
    }
    if !changes.capture_args.is_empty() {
        config.set_capture_args(changes.capture_args);
    }
    if let Some(platform) = changes.platform {
        config.platform = platform;
    }
    if let Some(dir) = changes.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(quality) = changes.quality {
        config.set_quality(quality)?;
    }
    if changed {
        config.save()?;
        println!("✔ 設定を保存しました");
    }

    if show || !changed {
        println!("設定:");
        println!("  実行環境: {}", config.platform);
        println!("  データディレクトリ: {}", config.data_root()?.display());
        println!("  撮影コマンド: {}", config.capture_command.as_deref().unwrap_or("未設定"));
        println!("  撮影コマンド引数: {:?}", config.capture_args);
        println!("  品質: {}", config.quality);
    }
    Ok(())
}

async fn add(ctx: AppContext, from: Option<PathBuf>, quality: Option<u8>) -> anyhow::Result<()> {
    let camera = ctx.camera(from.as_deref())?;
    let mut page = GalleryPage::new(ctx.service(camera, quality)?, Arc::new(DialoguerPresenter));
    page.on_init().await.context("写真リストの読み込みに失敗")?;

    println!("📷 撮影中...");
    let photo = page.add_photo_to_gallery().await.context("写真の追加に失敗")?;
    println!("✔ 保存しました: {}", photo.filepath);
    println!("  表示パス: {}", photo.webview_path);
    Ok(())
}

async fn list(ctx: AppContext, json: bool) -> anyhow::Result<()> {
    if json {
        let value = ctx.store().get(PHOTO_STORAGE_KEY).await?;
        println!("{}", value.unwrap_or_else(|| "[]".into()));
        return Ok(());
    }

    let camera = ctx.camera(None)?;
    let mut page = GalleryPage::new(ctx.service(camera, None)?, Arc::new(DialoguerPresenter));
    page.on_init().await.context("写真リストの読み込みに失敗")?;
    print_rows(&page.render());
    Ok(())
}

async fn delete(ctx: AppContext, index: usize, yes: bool) -> anyhow::Result<()> {
    let camera = ctx.camera(None)?;
    let mut service = ctx.service(camera, None)?;
    service.load_saved().await.context("写真リストの読み込みに失敗")?;

    let photo = service
        .photos()
        .get(index)
        .cloned()
        .with_context(|| format!("番号 {} の写真はありません（{}枚）", index, service.photos().len()))?;

    if yes {
        service.delete_picture(&photo, index).await?;
        println!("✔ 削除しました: {}", photo.filepath);
    } else {
        let mut page = GalleryPage::new(service, Arc::new(DialoguerPresenter));
        report_action(page.show_action_sheet(&photo, index).await?, &photo.filepath);
    }
    Ok(())
}

async fn gallery(ctx: AppContext) -> anyhow::Result<()> {
    let camera = ctx.camera(None)?;
    let mut page = GalleryPage::new(ctx.service(camera, None)?, Arc::new(DialoguerPresenter));
    page.on_init().await.context("写真リストの読み込みに失敗")?;

    loop {
        let rows = page.render();
        match prompt::select_gallery_item(&rows)? {
            GalleryChoice::TakePhoto => match page.add_photo_to_gallery().await {
                Ok(photo) => println!("✔ 保存しました: {}", photo.filepath),
                Err(e) => println!("✘ {}", e),
            },
            GalleryChoice::Photo(index) => {
                let Some(photo) = page.photos().get(index).cloned() else {
                    continue;
                };
                match page.show_action_sheet(&photo, index).await {
                    Ok(action) => report_action(action, &photo.filepath),
                    Err(e) => println!("✘ {}", e),
                }
            }
            GalleryChoice::Quit => break,
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_rows(rows: &[PhotoRow]) {
    if rows.is_empty() {
        println!("保存された写真はありません");
        return;
    }
    println!("{}枚の写真:", rows.len());
    for row in rows {
        println!("  [{}] {}", row.index, row.filepath);
        println!("      {}", truncate(&row.webview_path, 80));
    }
}

fn report_action(action: PhotoAction, filepath: &str) {
    match action {
        PhotoAction::Deleted => println!("✔ 削除しました: {}", filepath),
        PhotoAction::Cancelled => println!("キャンセルしました"),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max).collect::<String>())
    }
}
