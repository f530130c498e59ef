//! Desktop viewer for a diorama room file.

mod config;
mod room;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use diorama_engine::logging::init_logging;
use diorama_engine::window::Runtime;

use config::ViewerConfig;
use room::RoomHost;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Room description (JSON array of placed objects, or `{ "objects": [...] }`)
    room: PathBuf,

    /// Optional viewer settings (JSON)
    config: Option<PathBuf>,

    /// Log filter, overriding the settings file and RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if args.log.is_some() {
        config.log = args.log;
    }

    init_logging(config.logging());

    let host = RoomHost::open(args.room)?;
    Runtime::run(config.runtime(), config.gpu(), config.scene(), host).context("viewer exited with error")
}
