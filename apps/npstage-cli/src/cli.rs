use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "npstage")]
#[command(about = "Play a media file through a hosted NPAPI plugin")]
pub struct Cli {
    /// Content file to play.
    pub content: PathBuf,

    /// Plugin binary; defaults to ./libflashplayer.so.
    pub plugin: Option<PathBuf>,

    /// Drawing surface width.
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Drawing surface height.
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Ask the plugin to loop playback (disables completion detection).
    #[arg(long = "loop", default_value_t = false)]
    pub loop_playback: bool,
}
