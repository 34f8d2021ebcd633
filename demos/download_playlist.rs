//! Playlist download example
//!
//! This example demonstrates the core functionality of playlist-dl:
//! - Building a configuration
//! - Wiring the bundled playlist source and media provider
//! - Subscribing to events
//! - Running a playlist to a final report
//!
//! Usage: download_playlist <playlist-reference> [output-dir]

use std::sync::Arc;

use playlist_dl::config::{Config, DownloadConfig, SourceConfig};
use playlist_dl::{
    CliMediaProvider, Event, HttpPlaylistSource, PlaylistDownloader, run_with_interrupt,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let reference = match args.next() {
        Some(reference) => reference,
        None => {
            eprintln!("usage: download_playlist <playlist-reference> [output-dir]");
            std::process::exit(2);
        }
    };
    let output_dir = args.next().unwrap_or_else(|| "downloads".to_string());

    // Build configuration
    let config = Config {
        download: DownloadConfig {
            output_dir: output_dir.into(),
            ..Default::default()
        },
        source: SourceConfig {
            api_base_url: "https://api.example.com/v1".to_string(),
            bearer_token: std::env::var("PLAYLIST_API_TOKEN").ok(),
            ..Default::default()
        },
        ..Default::default()
    };

    // Wire the bundled capabilities
    let source = Arc::new(HttpPlaylistSource::new(&config.source)?);
    let provider = Arc::new(CliMediaProvider::from_config(&config.tools)?);

    let pipeline = PlaylistDownloader::new(config, source, provider)?;

    // Subscribe to events for progress lines
    let mut events = pipeline.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::PlaylistResolved {
                    name,
                    owner,
                    total_tracks,
                } => {
                    println!("Playlist: {name} by {owner} ({total_tracks} tracks)");
                }
                Event::TrackStarted {
                    index,
                    total,
                    label,
                } => {
                    println!("[{}/{}] {}", index + 1, total, label);
                }
                Event::TrackCompleted { path, .. } => {
                    println!("  downloaded -> {}", path.display());
                }
                Event::TrackFailed { reason, .. } => {
                    println!("  failed: {reason}");
                }
                _ => {}
            }
        }
    });

    // Run, reporting interruption and top-level errors instead of crashing
    match run_with_interrupt(&pipeline, &reference).await {
        Ok(report) => {
            println!();
            println!("Successful: {}", report.successful);
            println!("Failed:     {}", report.failed);
            println!("Saved to:   {}", report.output_dir.display());
        }
        Err(e) => {
            eprintln!("run ended early: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
