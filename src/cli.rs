use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "diskr", version, about = "Browse and download files from Yandex Disk")]
pub struct Args {
    /// OAuth token to connect with (not saved unless you press `S`)
    #[arg(long)]
    pub token: Option<String>,

    /// Remote directory to open first
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Local directory downloads are written to
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Keep downloaded zip archives packed
    #[arg(long)]
    pub no_decompress: bool,

    /// Use this directory instead of the platform config directory
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}
