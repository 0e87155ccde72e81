use std::path::PathBuf;

use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "image-updater-rs",
    about = "Download newly published RHEL cloud images from the Red Hat image catalog"
)]
pub struct Cli {
    /// Location of config file in JSON format
    #[arg(short = 'c', long, default_value = "/etc/image_updater_config.json")]
    pub config: PathBuf,

    /// Report what would be downloaded without writing files or state
    #[arg(long)]
    pub dry_run: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
