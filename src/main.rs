use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use parley::Platform;
use parley::core::config;
use parley::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat with keyboard and emoji input")]
struct Args {
    /// Platform conventions to follow (overrides config and PARLEY_PLATFORM)
    #[arg(short, long, value_enum)]
    platform: Option<Platform>,

    /// Config file to use instead of ~/.parley/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to parley.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let resolved = config::load_config(args.config.as_deref())
        .and_then(|file_config| config::resolve(&file_config, args.platform))
        .map_err(|e| {
            log::error!("Startup aborted: {}", e);
            std::io::Error::other(e)
        })?;

    log::info!(
        "Parley starting up on {:?} with {} seed messages",
        resolved.platform,
        resolved.seed_messages.len()
    );

    tui::run(resolved)
}
