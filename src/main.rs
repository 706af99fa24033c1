//! Vidgrab - Desktop Video Downloader
//!
//! A cross-platform desktop app that downloads videos from YouTube, Instagram
//! and other sites through yt-dlp, converts them to MP4 via ffmpeg, and shows
//! live progress in a simple GUI.

use anyhow::Result;
use clap::Parser;
use iced::Application;
use std::sync::Arc;
use vidgrab::coordinator::request::RequestOptions;
use vidgrab::coordinator::{DownloadCoordinator, SessionStart};
use vidgrab::extractor::{Extractor, YtDlpExtractor};
use vidgrab::gui;
use vidgrab::utils::AppSettings;

#[derive(Parser)]
struct Args {
    /// Test download with provided URL
    #[arg(long)]
    test_download: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Check for yt-dlp and ffmpeg
    check_dependencies();

    if let Some(url) = args.test_download {
        // Run headless test inside a temporary Tokio runtime
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async move {
            test_download_cli(url).await;
        });
        return Ok(());
    }

    // Start the GUI application (synchronous entrypoint)
    gui::VidgrabApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(720.0, 820.0),
            min_size: Some(iced::Size::new(640.0, 700.0)),
            ..Default::default()
        },
        antialiasing: true,
        ..Default::default()
    })?;

    Ok(())
}

fn check_dependencies() {
    match YtDlpExtractor::new() {
        Ok(extractor) => {
            println!("yt-dlp found at: {}", extractor.ytdlp_path().display());

            match extractor.conversion_binary() {
                Some(path) => println!("ffmpeg found at: {}", path.display()),
                None => {
                    // ffmpeg missing - warn but don't exit, allow app to launch
                    eprintln!("WARNING: ffmpeg not found in common locations");
                    eprintln!("The app will run, but downloads will be rejected.");
                    eprintln!("Please install ffmpeg:");
                    eprintln!("  brew install ffmpeg");
                    eprintln!("  or: apt install ffmpeg");
                    eprintln!("  or visit: https://ffmpeg.org/download.html");
                }
            }
        }
        Err(_) => {
            // yt-dlp not found - warn but don't exit, allow app to launch
            // User will see the error in the GUI status line
            eprintln!("WARNING: yt-dlp not found in common locations");
            eprintln!("The app will run, but video extraction will fail.");
            eprintln!("Please install yt-dlp:");
            eprintln!("  pip install yt-dlp");
            eprintln!("  or: brew install yt-dlp");
            eprintln!("  or visit: https://github.com/yt-dlp/yt-dlp");
        }
    }
}

async fn test_download_cli(url: String) {
    println!("Testing download: {}", url);

    // Initialize extractor
    let extractor: Arc<dyn Extractor> = match YtDlpExtractor::new() {
        Ok(e) => Arc::new(e),
        Err(e) => {
            eprintln!("Failed to initialize extractor: {}", e);
            return;
        }
    };

    let mut coordinator = DownloadCoordinator::new(extractor);

    // Fetch metadata first so the test exercises both operations
    println!("Fetching video info...");
    match coordinator.fetch_metadata(&url).await {
        Ok(info) => {
            println!("Title: {}", info.title);
            if let Some(uploader) = &info.uploader {
                println!("Uploader: {}", uploader);
            }
            println!("Duration: {}", info.duration_display());
        }
        Err(e) => {
            eprintln!("Failed to fetch video info: {}", e);
            return;
        }
    }

    let settings = AppSettings::load();
    let options = RequestOptions {
        quality: settings.quality,
        include_subtitles: settings.include_subtitles,
        include_thumbnail: settings.include_thumbnail,
        output_dir: settings.download_dir.clone(),
    };

    println!("Starting download...");
    let SessionStart {
        session_id,
        mut progress,
        outcome,
    } = match coordinator.start(&url, options) {
        Ok(start) => start,
        Err(e) => {
            eprintln!("Download rejected: {}", e);
            return;
        }
    };

    println!("Download session {}", session_id);

    while let Some(update) = progress.recv().await {
        match update.speed {
            Some(speed) => println!(
                "[{}] {:.1}% @ {:.2} MB/s",
                update.stage.label(),
                update.percent,
                speed / 1024.0 / 1024.0
            ),
            None => println!("[{}] {:.1}%", update.stage.label(), update.percent),
        }
    }

    match outcome.await {
        Ok(Ok(())) => println!("Download completed successfully!"),
        Ok(Err(e)) => eprintln!("Download failed: {}", e),
        Err(_) => eprintln!("Download worker stopped unexpectedly"),
    }
}
