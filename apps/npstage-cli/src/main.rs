mod cli;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use npstage_host::{
    COMPLETION_POLL_INTERVAL, ContentInstance, HeadlessWindowHost, ManualTicker, PlaybackEvent,
    PluginSession,
};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let plugin_path = cli
        .plugin
        .clone()
        .unwrap_or_else(|| PathBuf::from("./libflashplayer.so"));

    let session = PluginSession::open(&plugin_path)
        .with_context(|| format!("load plugin {}", plugin_path.display()))?;
    println!("npstage ({})", session.description());

    let stopped = Arc::new(AtomicBool::new(false));
    let stopped_flag = Arc::clone(&stopped);
    let instance = ContentInstance::new(
        Arc::clone(&session),
        &cli.content,
        Some(Box::new(move |event| {
            if event == PlaybackEvent::Stopped {
                stopped_flag.store(true, Ordering::Relaxed);
            }
        })),
    )
    .with_context(|| format!("load content {}", cli.content.display()))?;

    let window = HeadlessWindowHost::new(cli.width, cli.height);
    let ticker = ManualTicker::new();
    instance
        .play(&window, &ticker, cli.loop_playback)
        .with_context(|| format!("play {}", cli.content.display()))?;
    println!(
        "File '{}' started (playing={})",
        cli.content.display(),
        instance.is_playing()
    );

    // Cooperative main loop: pump the completion poll until the plugin
    // reports playback finished. Looping content never finishes on its own.
    while !stopped.load(Ordering::Relaxed) {
        ticker.pump();
        thread::sleep(COMPLETION_POLL_INTERVAL);
    }

    instance.stop();
    println!("File '{}' stopped", cli.content.display());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
