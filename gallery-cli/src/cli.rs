//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use core_runtime::logging::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gallery-sync")]
#[command(about = "Sync Google Drive style folders into the website gallery")]
#[command(version)]
pub struct Cli {
    /// Path to the Drive credentials JSON file
    #[arg(
        long,
        env = "GALLERY_CREDENTIALS",
        default_value = "credentials/drive.json"
    )]
    pub credentials: PathBuf,

    /// ID of the Drive folder whose children are the style folders
    #[arg(long = "root-folder", env = "GOOGLE_DRIVE_FOLDER_ID", default_value = "")]
    pub root_folder: String,

    /// Website root directory
    #[arg(long, default_value = ".")]
    pub site_root: PathBuf,

    /// Manifest file path (default: <site-root>/gallery_data.json)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Index document path (default: <site-root>/index.html)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Sync images and manifest only; leave the index document untouched
    #[arg(long)]
    pub skip_html: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
