//! CLI entry point for building and inspecting tile levels

use clap::Parser;
use tilegrid::io::cli::{Cli, LevelTool};

fn main() -> tilegrid::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the verbosity flags
    let filter = env_logger::Env::default().default_filter_or(cli.log_filter());
    let _ = env_logger::Builder::from_env(filter)
        .format_timestamp_secs()
        .try_init();

    let mut tool = LevelTool::new(cli);
    tool.run()
}
