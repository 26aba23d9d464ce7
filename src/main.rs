use anyhow::{Context, Result};
use clap::Parser;
use launcher_icon_gen::icon_gen;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "launcher-icon-gen",
    about = "Draw the launcher icon and write it for every Android density"
)]
struct Args {
    /// Android resource directory the mipmap folders are written into.
    #[clap(short, long, value_name = "DIR", default_value = "app/src/main/res")]
    output: PathBuf,

    /// JSON file with a custom density table ([{"folder": ..., "size": ...}]).
    #[clap(long, value_name = "FILE")]
    densities: Option<PathBuf>,

    /// Custom PNG icon sizes to generate. When set, only these sizes are generated.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    png: Option<Vec<u32>>,

    /// Generate only the square icon variant
    #[clap(long, conflicts_with = "round_only")]
    square_only: bool,

    /// Generate only the circle-masked icon variant
    #[clap(long)]
    round_only: bool,

    /// Print debug diagnostics
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialise logger")?;

    icon_gen::generate_icons(icon_gen::Args {
        output: args.output,
        densities: args.densities,
        png: args.png,
        square_only: args.square_only,
        round_only: args.round_only,
    })
}
